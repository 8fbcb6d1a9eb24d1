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

//! Transient user-facing messages (toasts).
//!
//! Showing a new message clears the previous one, so at most one toast is
//! visible at a time; it dismisses itself after five seconds.

use std::time::{Duration, Instant};

const DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub kind: MessageKind,
    shown_at: Instant,
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    current: Option<Notification>,
}

impl NotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any visible message with a new one and restart the timer.
    pub fn show(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.current = Some(Notification {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.show(text, MessageKind::Success);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(text, MessageKind::Error);
    }

    /// Drop the message once its five seconds are up; call once per frame.
    pub fn prune(&mut self) {
        if let Some(n) = &self.current {
            if n.shown_at.elapsed() >= DISMISS_AFTER {
                self.current = None;
            }
        }
    }

    #[must_use]
    pub fn visible(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_replaces_previous_message() {
        let mut center = NotificationCenter::new();
        center.success("Certificação adicionada com sucesso!");
        center.error("Erro ao enviar solicitação");

        let visible = center.visible().unwrap();
        assert_eq!(visible.kind, MessageKind::Error);
        assert_eq!(visible.text, "Erro ao enviar solicitação");
    }

    #[test]
    fn test_prune_keeps_fresh_messages() {
        let mut center = NotificationCenter::new();
        center.success("ok");
        center.prune();
        assert!(center.visible().is_some());
    }

    #[test]
    fn test_prune_drops_expired_messages() {
        let mut center = NotificationCenter::new();
        center.show("antiga", MessageKind::Success);
        // Backdate the message past its lifetime.
        if let Some(n) = center.current.as_mut() {
            n.shown_at = Instant::now() - DISMISS_AFTER - Duration::from_millis(1);
        }
        center.prune();
        assert!(center.visible().is_none());
    }
}
