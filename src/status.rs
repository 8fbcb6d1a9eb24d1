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

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Reachability of the service API, driven by the periodic probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No probe has completed yet.
    Unknown,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

/// Diagnostic message with timestamp
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub timestamp: DateTime<Utc>,
    pub level: DiagnosticLevel,
    pub message: String,
}

/// System status: API reachability plus a capped diagnostics ring.
#[derive(Debug)]
pub struct SystemStatus {
    pub connection_status: ConnectionStatus,
    pub last_check: Option<DateTime<Utc>>,

    // Diagnostic messages (keep last 50)
    pub diagnostics: VecDeque<DiagnosticMessage>,
    max_diagnostics: usize,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemStatus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection_status: ConnectionStatus::Unknown,
            last_check: None,
            diagnostics: VecDeque::with_capacity(50),
            max_diagnostics: 50,
        }
    }

    /// Record the outcome of one connection probe. A transition lands in the
    /// diagnostics ring; repeated identical outcomes do not.
    pub fn record_probe(&mut self, reachable: bool) {
        let new_status = if reachable {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        };

        if new_status != self.connection_status {
            match new_status {
                ConnectionStatus::Connected => {
                    self.add_diagnostic(DiagnosticLevel::Info, "Conectado ao servidor".to_string());
                }
                ConnectionStatus::Disconnected => {
                    self.add_diagnostic(
                        DiagnosticLevel::Warning,
                        "Servidor indisponível".to_string(),
                    );
                }
                ConnectionStatus::Unknown => {}
            }
        }

        self.connection_status = new_status;
        self.last_check = Some(Utc::now());
    }

    /// Add a diagnostic message
    pub fn add_diagnostic(&mut self, level: DiagnosticLevel, message: String) {
        self.diagnostics.push_back(DiagnosticMessage {
            timestamp: Utc::now(),
            level,
            message,
        });

        // Keep only the last N messages
        while self.diagnostics.len() > self.max_diagnostics {
            self.diagnostics.pop_front();
        }
    }
}

/// Thread-safe wrapper for SystemStatus
pub type SharedSystemStatus = Arc<Mutex<SystemStatus>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_transitions_are_recorded_once() {
        let mut status = SystemStatus::new();
        status.record_probe(true);
        status.record_probe(true);
        status.record_probe(false);

        assert_eq!(status.connection_status, ConnectionStatus::Disconnected);
        // One diagnostic per transition, not per probe.
        assert_eq!(status.diagnostics.len(), 2);
        assert!(status.last_check.is_some());
    }

    #[test]
    fn test_diagnostics_ring_is_capped() {
        let mut status = SystemStatus::new();
        for i in 0..60 {
            status.add_diagnostic(DiagnosticLevel::Info, format!("msg {i}"));
        }
        assert_eq!(status.diagnostics.len(), 50);
        assert_eq!(status.diagnostics.front().unwrap().message, "msg 10");
    }
}
