use std::sync::{Arc, Mutex};

use log::info;
use rand::rngs::StdRng;
use rand::Rng;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::WarningConfig;
use crate::events::{BroadcastEvent, EventBus};
use crate::focus::FocusMonitor;
use crate::playback::Playback;
use crate::vocabulary::WARNING_MESSAGES;

/// Decides, at each report-completion boundary, whether a supplementary
/// warning should be spliced into the next playback slot. Never pre-empts
/// in-progress content: the only insertion point is the boundary itself.
pub struct WarningInjector {
    monitor: FocusMonitor,
    playback: Arc<dyn Playback>,
    bus: EventBus,
    clock: Arc<dyn Clock>,
    threshold_ms: i64,
    rng: Mutex<StdRng>,
}

impl WarningInjector {
    pub fn new(
        config: &WarningConfig,
        monitor: FocusMonitor,
        playback: Arc<dyn Playback>,
        bus: EventBus,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self {
            monitor,
            playback,
            bus,
            clock,
            threshold_ms: config.threshold_ms,
            rng: Mutex::new(rng),
        }
    }

    /// Boundary check. Returns whether a warning was emitted, which the
    /// session logs but otherwise ignores.
    pub fn on_report_complete(&self) -> bool {
        let snapshot = self.monitor.snapshot();
        if snapshot.is_visible {
            return false;
        }
        if !self.playback.is_playing() {
            return false;
        }
        let Some(reference) = snapshot.warning_reference() else {
            return false;
        };

        // Strictly greater: exactly the threshold must not trigger.
        let elapsed_ms = (self.clock.now() - reference).num_milliseconds();
        if elapsed_ms <= self.threshold_ms {
            return false;
        }

        let message_text = {
            let mut rng = self.rng.lock().unwrap();
            WARNING_MESSAGES[rng.gen_range(0..WARNING_MESSAGES.len())]
        };

        // Advance state before emitting: if the warning dies downstream we
        // treat it as sent rather than retrying at every boundary.
        self.monitor.record_warning_sent();
        let warning_count = self.monitor.snapshot().warning_count;

        info!(
            "injecting warning {} after {}ms unfocused",
            warning_count, elapsed_ms
        );
        self.bus.emit(BroadcastEvent::WarningReady {
            message_id: Uuid::new_v4(),
            message_text: message_text.to_string(),
            warning_count,
        });
        true
    }
}
