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

//! Application configuration management.
//!
//! Persistent configuration in TOML format via confy: API base URL,
//! connection-probe interval and UI preferences. The base URL is the only
//! environment-dependent setting the core has.

use serde::{Deserialize, Serialize};

/// Default base URL of the DronesPulvetech service API
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Base URL of the service API (path `/api` included)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Seconds between connection probes against the API
    #[serde(default = "default_connection_check_interval")]
    pub connection_check_interval_secs: u64,

    /// Certifications panel expanded state
    #[serde(default = "default_true")]
    pub certifications_expanded: bool,

    /// Diagnostics window visible on startup
    #[serde(default)]
    pub show_diagnostics: bool,
}

// Default value functions for serde
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_connection_check_interval() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            connection_check_interval_secs: default_connection_check_interval(),
            certifications_expanded: true,
            show_diagnostics: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load("pulvetech-desktop", "config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store("pulvetech-desktop", "config", self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path("pulvetech-desktop", "config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.connection_check_interval_secs, 30);
        assert!(config.certifications_expanded);
        assert!(!config.show_diagnostics);
    }

    #[test]
    fn test_partial_config_keeps_overrides() {
        let config: AppConfig =
            toml::from_str("api_base_url = \"https://pulvetech.example/api\"").unwrap();
        assert_eq!(config.api_base_url, "https://pulvetech.example/api");
        assert_eq!(config.connection_check_interval_secs, 30);
    }
}
