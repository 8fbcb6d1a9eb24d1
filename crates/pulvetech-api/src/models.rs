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

//! Wire models for the DronesPulvetech service.
//!
//! All records are plain serde types mirroring the JSON bodies the service
//! exchanges. Validation status is computed server-side and only displayed
//! here; unknown wire values degrade to [`ValidationStatus::Unknown`] instead
//! of failing deserialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Server-computed validity of a pilot certification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    ExpiringSoon,
    Expired,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ValidationStatus {
    /// User-facing label (pt-BR). Unknown statuses display as valid, matching
    /// the service's own fallback.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ExpiringSoon => "Expira em breve",
            Self::Expired => "Expirado",
            Self::Valid | Self::Unknown => "Válido",
        }
    }
}

/// A pilot certification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub id: i64,
    pub pilot_name: String,
    pub cert_type: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub validation_status: ValidationStatus,
}

/// Payload for creating a certification. The status is assigned server-side.
#[derive(Debug, Clone, Serialize)]
pub struct NewCertification {
    pub pilot_name: String,
    pub cert_type: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub file_path: Option<String>,
}

/// A spraying drone in the fleet. Read-only for clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    pub id: i64,
    pub name: String,
    pub model: String,
    /// Tank capacity in liters.
    pub capacity: f64,
    /// Flight autonomy in minutes.
    pub autonomy: f64,
    /// Coverage per flight in hectares.
    pub area_per_flight: f64,
    pub application_type: String,
    #[serde(default)]
    pub image_path: Option<String>,
    /// Free-form technical specifications (label -> value), iterated in key
    /// order so renders are stable.
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
}

/// A statistic value; the service stores these as either numbers or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{n}"),
            MetricValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One named service statistic, e.g. `total_drones` or `precision`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticMetric {
    pub metric_name: String,
    pub metric_value: MetricValue,
    #[serde(default)]
    pub metric_unit: String,
    #[serde(default)]
    pub description: String,
}

impl StatisticMetric {
    /// Value with its unit appended, the way the site displays it.
    #[must_use]
    pub fn display_value(&self) -> String {
        format!("{}{}", self.metric_value, self.metric_unit)
    }
}

/// A service quote request submitted through the contact form. Write-only.
#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub property_name: String,
    pub area_hectares: String,
    pub application_type: String,
    pub observations: String,
}

/// Response from the file upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// Server-side path of the stored file.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certification_deserializes_known_status() {
        let json = r#"{
            "id": 7,
            "pilot_name": "Maria Souza",
            "cert_type": "ANAC - Classe 3",
            "issue_date": "2024-03-01",
            "expiry_date": "2026-03-01",
            "file_path": "/uploads/cert-7.pdf",
            "validation_status": "expiring_soon"
        }"#;

        let cert: Certification = serde_json::from_str(json).unwrap();
        assert_eq!(cert.validation_status, ValidationStatus::ExpiringSoon);
        assert_eq!(cert.validation_status.label(), "Expira em breve");
        assert_eq!(cert.issue_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_certification_tolerates_unknown_status_and_missing_file() {
        let json = r#"{
            "id": 1,
            "pilot_name": "João Lima",
            "cert_type": "MAPA",
            "issue_date": "2023-01-10",
            "expiry_date": "2025-01-10",
            "validation_status": "under_review"
        }"#;

        let cert: Certification = serde_json::from_str(json).unwrap();
        assert_eq!(cert.validation_status, ValidationStatus::Unknown);
        assert_eq!(cert.validation_status.label(), "Válido");
        assert!(cert.file_path.is_none());
    }

    #[test]
    fn test_drone_defaults_empty_specifications() {
        let json = r#"{
            "id": 2,
            "name": "Agras T40",
            "model": "T40",
            "capacity": 40,
            "autonomy": 25,
            "area_per_flight": 21.3,
            "application_type": "Pulverização e espalhamento"
        }"#;

        let drone: Drone = serde_json::from_str(json).unwrap();
        assert!(drone.specifications.is_empty());
        assert!(drone.image_path.is_none());
        assert_eq!(drone.capacity, 40.0);
    }

    #[test]
    fn test_drone_specifications_iterate_in_key_order() {
        let json = r#"{
            "id": 3,
            "name": "Agras T50",
            "model": "T50",
            "capacity": 50,
            "autonomy": 30,
            "area_per_flight": 25.0,
            "application_type": "Pulverização",
            "specifications": {"peso": "52 kg", "bicos": "16", "alcance": "2 km"}
        }"#;

        let drone: Drone = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = drone.specifications.keys().map(String::as_str).collect();
        assert_eq!(keys, ["alcance", "bicos", "peso"]);
    }

    #[test]
    fn test_metric_value_accepts_number_and_text() {
        let m: StatisticMetric = serde_json::from_str(
            r#"{"metric_name":"precision","metric_value":95,"metric_unit":"%","description":"Precisão de aplicação"}"#,
        )
        .unwrap();
        assert_eq!(m.display_value(), "95%");

        let m: StatisticMetric = serde_json::from_str(
            r#"{"metric_name":"hectares_served","metric_value":"15000+","metric_unit":"","description":"Hectares atendidos"}"#,
        )
        .unwrap();
        assert_eq!(m.display_value(), "15000+");
    }

    #[test]
    fn test_new_certification_serializes_null_file_path() {
        let new = NewCertification {
            pilot_name: "Ana".to_string(),
            cert_type: "ANAC".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            file_path: None,
        };

        let json = serde_json::to_value(&new).unwrap();
        assert!(json.get("file_path").unwrap().is_null());
    }
}
