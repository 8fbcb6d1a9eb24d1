// Copyright 2025 Pulvetech
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fetch-then-render state for the resource lists.
//!
//! Each resource (certifications, drones, statistics) owns one [`ListState`]
//! that a completed fetch transitions. A failed fetch is terminal for that
//! cycle: it becomes an error render and is never propagated further.
//! Service order is preserved verbatim; nothing is re-sorted client-side.

use log::{error, info};
use pulvetech_api::{ApiError, StatisticMetric};

/// Empty-state and error messages, as shown on the original site.
pub const CERTIFICATIONS_EMPTY: &str =
    "Nenhuma certificação cadastrada ainda.\nClique em \"Adicionar Certificação\" para começar.";
pub const CERTIFICATIONS_ERROR: &str =
    "Erro ao carregar certificações. Verifique se o servidor está rodando.";
pub const DRONES_EMPTY: &str = "Nenhum drone cadastrado.";
pub const DRONES_ERROR: &str = "Erro ao carregar drones. Verifique se o servidor está rodando.";
pub const STATISTICS_ERROR: &str = "Erro ao carregar estatísticas.";

/// Metric names rendered in the home "stats" strip, in fetch order.
pub const HOME_METRICS: [&str; 4] = [
    "total_drones",
    "certified_pilots",
    "hectares_served",
    "years_experience",
];

/// Metric names filled positionally into the four quality slots.
pub const QUALITY_METRICS: [&str; 4] = ["precision", "economy", "coverage", "time_reduction"];

/// Render state of one resource list.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListState<T> {
    /// First fetch still in flight; nothing rendered yet.
    #[default]
    Loading,
    /// Last fetch succeeded; items in service order (may be empty).
    Ready(Vec<T>),
    /// Last fetch failed; the message replaces the previous render.
    Failed(String),
}

impl<T> ListState<T> {
    /// Apply the outcome of one sync cycle.
    ///
    /// Errors are logged and absorbed here; the caller never sees them.
    pub fn apply_fetch(
        &mut self,
        resource: &str,
        error_text: &str,
        result: Result<Vec<T>, ApiError>,
    ) {
        *self = match result {
            Ok(items) => {
                info!("{}: {} item(s) carregado(s)", resource, items.len());
                ListState::Ready(items)
            }
            Err(err) => {
                error!("Erro ao carregar {resource}: {err}");
                ListState::Failed(error_text.to_string())
            }
        };
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }
}

/// A pre-existing quality display slot; the value only changes when a
/// matching metric fills it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualitySlot {
    pub title: &'static str,
    pub value: String,
    pub description: &'static str,
}

/// The four fixed quality cards from the "Parâmetros de Qualidade" section.
#[must_use]
pub fn default_quality_slots() -> [QualitySlot; 4] {
    [
        QualitySlot {
            title: "Precisão",
            value: "--".to_string(),
            description: "Taxa de acerto na aplicação",
        },
        QualitySlot {
            title: "Economia",
            value: "--".to_string(),
            description: "Redução no uso de defensivos",
        },
        QualitySlot {
            title: "Cobertura",
            value: "--".to_string(),
            description: "Uniformidade de cobertura",
        },
        QualitySlot {
            title: "Redução de Tempo",
            value: "--".to_string(),
            description: "Comparado à aplicação tradicional",
        },
    ]
}

/// Metrics belonging to the home stats strip, in fetch order.
#[must_use]
pub fn home_statistics(metrics: &[StatisticMetric]) -> Vec<StatisticMetric> {
    metrics
        .iter()
        .filter(|m| HOME_METRICS.contains(&m.metric_name.as_str()))
        .cloned()
        .collect()
}

/// Fill the quality slots positionally: the Nth matching metric (in fetch
/// order) lands in the Nth slot. Trailing slots without a match keep their
/// current value. Metrics outside both name sets are dropped entirely.
pub fn fill_quality_slots(slots: &mut [QualitySlot; 4], metrics: &[StatisticMetric]) {
    let matching = metrics
        .iter()
        .filter(|m| QUALITY_METRICS.contains(&m.metric_name.as_str()));

    for (slot, metric) in slots.iter_mut().zip(matching) {
        slot.value = metric.display_value();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulvetech_api::models::MetricValue;

    fn metric(name: &str, value: f64, unit: &str) -> StatisticMetric {
        StatisticMetric {
            metric_name: name.to_string(),
            metric_value: MetricValue::Number(value),
            metric_unit: unit.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_apply_fetch_empty_is_ready() {
        let mut state: ListState<i32> = ListState::Loading;
        state.apply_fetch("certifications", CERTIFICATIONS_ERROR, Ok(vec![]));
        assert_eq!(state, ListState::Ready(vec![]));
    }

    #[test]
    fn test_apply_fetch_failure_renders_error_and_does_not_propagate() {
        let mut state: ListState<i32> = ListState::Ready(vec![1, 2]);
        state.apply_fetch(
            "certifications",
            CERTIFICATIONS_ERROR,
            Err(ApiError::Status { status: 500 }),
        );
        // Source behavior: the error render replaces the previous one.
        assert_eq!(state, ListState::Failed(CERTIFICATIONS_ERROR.to_string()));
    }

    #[test]
    fn test_apply_fetch_preserves_service_order() {
        let mut state: ListState<i32> = ListState::Loading;
        state.apply_fetch("drones", DRONES_ERROR, Ok(vec![3, 1, 2]));
        assert_eq!(state, ListState::Ready(vec![3, 1, 2]));
    }

    #[test]
    fn test_partitioning_home_quality_and_dropped() {
        let metrics = vec![
            metric("total_drones", 12.0, ""),
            metric("precision", 95.0, "%"),
            metric("unknown_metric", 1.0, ""),
        ];

        let home = home_statistics(&metrics);
        assert_eq!(home.len(), 1);
        assert_eq!(home[0].metric_name, "total_drones");

        let mut slots = default_quality_slots();
        fill_quality_slots(&mut slots, &metrics);
        assert_eq!(slots[0].value, "95%");
        // Trailing slots keep their previous value.
        assert_eq!(slots[1].value, "--");
        assert_eq!(slots[3].value, "--");
    }

    #[test]
    fn test_quality_slots_fill_positionally_in_fetch_order() {
        let metrics = vec![
            metric("economy", 30.0, "%"),
            metric("years_experience", 5.0, ""),
            metric("precision", 95.0, "%"),
            metric("time_reduction", 60.0, "%"),
        ];

        let mut slots = default_quality_slots();
        fill_quality_slots(&mut slots, &metrics);

        // Positional, not name-based: first match fills slot 1, and so on.
        assert_eq!(slots[0].value, "30%");
        assert_eq!(slots[1].value, "95%");
        assert_eq!(slots[2].value, "60%");
        assert_eq!(slots[3].value, "--");
    }

    #[test]
    fn test_home_statistics_keep_fetch_order() {
        let metrics = vec![
            metric("hectares_served", 15000.0, ""),
            metric("total_drones", 12.0, ""),
        ];

        let home = home_statistics(&metrics);
        let names: Vec<&str> = home.iter().map(|m| m.metric_name.as_str()).collect();
        assert_eq!(names, ["hectares_served", "total_drones"]);
    }
}
