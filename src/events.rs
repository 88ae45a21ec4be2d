//! Typed event union for the broadcast pipeline.
//!
//! The original piece wired these as string-keyed topics; here the kinds and
//! payloads are one enum so emitters and subscribers agree at compile time.
//!
//! Serialized form carries a `type` tag and camelCase fields:
//!
//! ```json
//! { "type": "warning_ready", "messageId": "…", "messageText": "…", "warningCount": 1 }
//! ```

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::generator::WeatherReport;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BroadcastEvent {
    /// A report (or injected warning) finished playing. Fired by the playback
    /// collaborator; the injector treats the payload as opaque.
    ReportComplete {
        report: WeatherReport,
    },

    /// Focus was lost. Fires once per unbroken loss episode.
    FocusLost {
        #[serde(rename = "lostAt")]
        lost_at: DateTime<Utc>,
    },

    /// A debounced restore committed.
    FocusRestored {
        #[serde(rename = "unfocusedDurationMs")]
        unfocused_duration_ms: i64,
        #[serde(rename = "warningsPlayed")]
        warnings_played: u32,
    },

    /// The injector wants this message spliced into the next playback slot.
    /// Playback must sequence it exactly like a normal report.
    WarningReady {
        #[serde(rename = "messageId")]
        message_id: Uuid,
        #[serde(rename = "messageText")]
        message_text: String,
        #[serde(rename = "warningCount")]
        warning_count: u32,
    },
}

impl BroadcastEvent {
    /// Stable wire name, shared by every transport.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::ReportComplete { .. } => "report:complete",
            Self::FocusLost { .. } => "focus:lost",
            Self::FocusRestored { .. } => "focus:restored",
            Self::WarningReady { .. } => "warning:ready",
        }
    }
}

/// In-process publish/subscribe over a broadcast channel. Emitting with no
/// live subscribers is not an error.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BroadcastEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: BroadcastEvent) {
        let name = event.event_name();
        if self.tx.send(event).is_err() {
            debug!("event {} dropped: no subscribers", name);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
