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

//! Application-quality parameter chart data and facet filtering.
//!
//! The dataset is fixed: one series per drone model (T20P, T40, T50), nine
//! points each, spanning three Delta T ranges and three wind-speed ranges.
//! Filtering is pure; the UI layer hands the filtered series to the scatter
//! plot untouched. A series that ends up empty is kept so its legend entry
//! survives any filter combination.

use egui::Color32;

/// Chart axis bounds: wind speed in km/h on x, application height in m on y.
pub const X_MIN: f64 = 0.0;
pub const X_MAX: f64 = 15.0;
pub const Y_MIN: f64 = 2.0;
pub const Y_MAX: f64 = 7.0;

/// Delta T facet (°C range between dry and wet bulb).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeltaTRange {
    #[default]
    All,
    R2_4,
    R4_6,
    R6_8,
}

impl DeltaTRange {
    pub const ALL: [Self; 4] = [Self::All, Self::R2_4, Self::R4_6, Self::R6_8];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Todos",
            Self::R2_4 => "2-4",
            Self::R4_6 => "4-6",
            Self::R6_8 => "6-8",
        }
    }
}

/// Wind-speed facet (km/h range).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindRange {
    #[default]
    All,
    R3_5,
    R6_9,
    R10_12,
}

impl WindRange {
    pub const ALL: [Self; 4] = [Self::All, Self::R3_5, Self::R6_9, Self::R10_12];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Todos",
            Self::R3_5 => "3-5",
            Self::R6_9 => "6-9",
            Self::R10_12 => "10-12",
        }
    }
}

/// One measured application parameter point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterPoint {
    /// Wind-speed bucket midpoint (km/h).
    pub x: f64,
    /// Application-height bucket midpoint (m).
    pub y: f64,
    pub delta_t: DeltaTRange,
    pub wind: WindRange,
    /// Effective swath width (m).
    pub value: f64,
}

/// One per drone model; identity (label, color) survives filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: Color32,
    pub points: Vec<ParameterPoint>,
}

fn model_series(label: &'static str, color: Color32, values: [f64; 9]) -> Series {
    use DeltaTRange::{R2_4, R4_6, R6_8};
    use WindRange::{R10_12, R3_5, R6_9};

    // Same (x, y, wind) grid for every Delta T band; only the swath differs.
    let grid = [(3.5, 5.5, R3_5), (7.5, 4.5, R6_9), (11.0, 3.5, R10_12)];
    let bands = [R2_4, R4_6, R6_8];

    let points = bands
        .iter()
        .enumerate()
        .flat_map(|(band_idx, &delta_t)| {
            grid.iter().enumerate().map(move |(col, &(x, y, wind))| ParameterPoint {
                x,
                y,
                delta_t,
                wind,
                value: values[band_idx * 3 + col],
            })
        })
        .collect();

    Series {
        label,
        color,
        points,
    }
}

/// The full fixed dataset: three models, nine points each.
#[must_use]
pub fn parameter_datasets() -> Vec<Series> {
    vec![
        model_series(
            "T20P",
            Color32::from_rgb(0x4C, 0xAF, 0x50),
            [7.0, 6.5, 6.0, 7.5, 7.0, 6.5, 8.0, 7.5, 7.0],
        ),
        model_series(
            "T40",
            Color32::from_rgb(0x9C, 0x27, 0xB0),
            [10.0, 9.0, 8.0, 10.5, 9.5, 8.5, 11.0, 10.0, 9.0],
        ),
        model_series(
            "T50",
            Color32::from_rgb(0xF4, 0x43, 0x36),
            [11.0, 10.0, 9.0, 11.5, 10.5, 9.5, 12.0, 11.0, 10.0],
        ),
    ]
}

/// Apply both facet filters (logical AND); `All` matches everything.
///
/// Every input series appears in the output, possibly with no points.
#[must_use]
pub fn filter_datasets(series: &[Series], delta_t: DeltaTRange, wind: WindRange) -> Vec<Series> {
    series
        .iter()
        .map(|s| Series {
            label: s.label,
            color: s.color,
            points: s
                .points
                .iter()
                .copied()
                .filter(|p| {
                    (delta_t == DeltaTRange::All || p.delta_t == delta_t)
                        && (wind == WindRange::All || p.wind == wind)
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_dataset_is_complete() {
        let series = parameter_datasets();
        assert_eq!(series.len(), 3);

        let filtered = filter_datasets(&series, DeltaTRange::All, WindRange::All);
        assert_eq!(filtered, series);
        assert_eq!(filtered.iter().map(|s| s.points.len()).sum::<usize>(), 27);
    }

    #[test]
    fn test_single_combination_keeps_one_point_per_series() {
        let series = parameter_datasets();
        let filtered = filter_datasets(&series, DeltaTRange::R2_4, WindRange::R6_9);

        assert_eq!(filtered.len(), 3);
        for s in &filtered {
            assert_eq!(s.points.len(), 1);
            let p = s.points[0];
            assert_eq!(p.delta_t, DeltaTRange::R2_4);
            assert_eq!(p.wind, WindRange::R6_9);
            assert_eq!((p.x, p.y), (7.5, 4.5));
        }

        // Values straight from the measurement table.
        assert_eq!(filtered[0].points[0].value, 6.5);
        assert_eq!(filtered[1].points[0].value, 9.0);
        assert_eq!(filtered[2].points[0].value, 10.0);
    }

    #[test]
    fn test_every_combination_is_total() {
        let series = parameter_datasets();
        for delta_t in DeltaTRange::ALL {
            for wind in WindRange::ALL {
                let filtered = filter_datasets(&series, delta_t, wind);
                // Series identity always survives, even when empty.
                assert_eq!(filtered.len(), 3);
                assert_eq!(filtered[0].label, "T20P");
                assert_eq!(filtered[2].label, "T50");
            }
        }
    }

    #[test]
    fn test_one_facet_filters_independently() {
        let series = parameter_datasets();

        let by_wind = filter_datasets(&series, DeltaTRange::All, WindRange::R3_5);
        assert!(by_wind.iter().all(|s| s.points.len() == 3));
        assert!(by_wind
            .iter()
            .flat_map(|s| &s.points)
            .all(|p| p.wind == WindRange::R3_5));

        let by_delta = filter_datasets(&series, DeltaTRange::R6_8, WindRange::All);
        assert!(by_delta.iter().all(|s| s.points.len() == 3));
    }
}
