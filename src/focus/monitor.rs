use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;
use crate::config::FocusConfig;
use crate::events::{BroadcastEvent, EventBus};

use super::state::FocusState;

struct MonitorInner {
    state: FocusState,
    /// Deadline for committing a pending Hidden -> Visible restore.
    /// Cancellation is forgetting this value.
    pending_restore_at: Option<DateTime<Utc>>,
}

/// Debounced Visible <-> Hidden state machine over raw visibility signals.
///
/// Loss of focus commits immediately; a restore must survive a quiet period
/// before it commits, so rapid tab-flicker neither resets the inactivity
/// timer nor spams restore notifications. The commit itself rides the
/// bookkeeping tick and compares wall-clock timestamps, which keeps the
/// machine correct under timer throttling.
#[derive(Clone)]
pub struct FocusMonitor {
    inner: Arc<Mutex<MonitorInner>>,
    clock: Arc<dyn Clock>,
    bus: EventBus,
    debounce_ms: i64,
}

impl FocusMonitor {
    pub fn new(config: &FocusConfig, clock: Arc<dyn Clock>, bus: EventBus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MonitorInner {
                state: FocusState::new(),
                pending_restore_at: None,
            })),
            clock,
            bus,
            debounce_ms: config.debounce_ms,
        }
    }

    /// Raw visibility signal from the environment.
    pub fn handle_visibility(&self, visible: bool) {
        let now = self.clock.now();
        let lost = {
            let mut inner = self.inner.lock().unwrap();
            if visible {
                if !inner.state.is_visible && inner.pending_restore_at.is_none() {
                    inner.pending_restore_at =
                        Some(now + Duration::milliseconds(self.debounce_ms));
                }
                false
            } else {
                // A hidden signal inside the debounce window cancels the
                // pending restore without touching the episode timestamps.
                inner.pending_restore_at = None;
                if inner.state.is_visible {
                    inner.state.mark_hidden(now);
                    true
                } else {
                    false
                }
            }
        };

        if lost {
            self.bus.emit(BroadcastEvent::FocusLost { lost_at: now });
        }
    }

    /// Bookkeeping tick: commits a pending restore whose quiet period has
    /// elapsed. A late tick only delays the commit; the reported duration is
    /// measured from the original loss timestamp either way.
    pub fn tick(&self) {
        let now = self.clock.now();
        let restored = {
            let mut inner = self.inner.lock().unwrap();
            match inner.pending_restore_at {
                Some(deadline) if now >= deadline => {
                    let unfocused_duration_ms = inner
                        .state
                        .focus_lost_at
                        .map(|lost_at| (now - lost_at).num_milliseconds())
                        .unwrap_or(0);
                    let warnings_played = inner.state.warning_count;
                    inner.pending_restore_at = None;
                    inner.state.clear_episode();
                    Some((unfocused_duration_ms, warnings_played))
                }
                _ => None,
            }
        };

        if let Some((unfocused_duration_ms, warnings_played)) = restored {
            self.bus.emit(BroadcastEvent::FocusRestored {
                unfocused_duration_ms,
                warnings_played,
            });
        }
    }

    /// Read-only copy of the current state.
    pub fn snapshot(&self) -> FocusState {
        self.inner.lock().unwrap().state.clone()
    }

    pub fn record_warning_sent(&self) {
        let now = self.clock.now();
        let mut inner = self.inner.lock().unwrap();
        inner.state.last_warning_at = Some(now);
        inner.state.warning_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_support::ManualClock;
    use chrono::TimeZone;
    use tokio::sync::broadcast::error::TryRecvError;

    fn setup() -> (
        FocusMonitor,
        Arc<ManualClock>,
        tokio::sync::broadcast::Receiver<BroadcastEvent>,
    ) {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let clock = ManualClock::starting_at(start);
        let bus = EventBus::default();
        let rx = bus.subscribe();
        let monitor = FocusMonitor::new(&FocusConfig::default(), clock.clone(), bus);
        (monitor, clock, rx)
    }

    fn drain_restores(rx: &mut tokio::sync::broadcast::Receiver<BroadcastEvent>) -> Vec<(i64, u32)> {
        let mut restores = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(BroadcastEvent::FocusRestored {
                    unfocused_duration_ms,
                    warnings_played,
                }) => restores.push((unfocused_duration_ms, warnings_played)),
                Ok(_) => continue,
                Err(TryRecvError::Empty) => return restores,
                Err(err) => panic!("bus receiver failed: {:?}", err),
            }
        }
    }

    #[test]
    fn losing_focus_commits_immediately_and_once() {
        let (monitor, clock, mut rx) = setup();

        monitor.handle_visibility(false);
        let first_lost_at = monitor.snapshot().focus_lost_at.unwrap();

        clock.advance_ms(5_000);
        monitor.handle_visibility(false);

        let snapshot = monitor.snapshot();
        assert!(!snapshot.is_visible);
        assert_eq!(snapshot.focus_lost_at, Some(first_lost_at));

        let lost_events = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|e| matches!(e, BroadcastEvent::FocusLost { .. }))
            .count();
        assert_eq!(lost_events, 1);
    }

    #[test]
    fn flicker_within_debounce_window_never_restores() {
        let (monitor, clock, mut rx) = setup();

        // Scenario: hidden at t=0, visible at t=500, hidden again at t=700.
        monitor.handle_visibility(false);
        let lost_at = monitor.snapshot().focus_lost_at.unwrap();

        clock.advance_ms(500);
        monitor.handle_visibility(true);
        clock.advance_ms(200);
        monitor.handle_visibility(false);

        // Tick well past where the original debounce would have elapsed.
        clock.advance_ms(5_000);
        monitor.tick();

        assert!(drain_restores(&mut rx).is_empty());
        let snapshot = monitor.snapshot();
        assert!(!snapshot.is_visible);
        assert_eq!(snapshot.focus_lost_at, Some(lost_at));
    }

    #[test]
    fn uninterrupted_debounce_commits_with_duration_and_count() {
        let (monitor, clock, mut rx) = setup();

        monitor.handle_visibility(false);
        clock.advance_ms(90_000);
        monitor.record_warning_sent();

        clock.advance_ms(10_000);
        monitor.handle_visibility(true);

        // Just short of the deadline: nothing commits.
        clock.advance_ms(999);
        monitor.tick();
        assert!(drain_restores(&mut rx).is_empty());

        clock.advance_ms(1);
        monitor.tick();

        let restores = drain_restores(&mut rx);
        assert_eq!(restores, vec![(101_000, 1)]);

        let snapshot = monitor.snapshot();
        assert!(snapshot.is_visible);
        assert_eq!(snapshot.focus_lost_at, None);
        assert_eq!(snapshot.last_warning_at, None);
        assert_eq!(snapshot.warning_count, 0);
    }

    #[test]
    fn repeated_visible_signals_keep_the_original_deadline() {
        let (monitor, clock, mut rx) = setup();

        monitor.handle_visibility(false);
        clock.advance_ms(500);
        monitor.handle_visibility(true); // deadline at t=1500
        clock.advance_ms(500);
        monitor.handle_visibility(true); // must not push the deadline out

        clock.advance_ms(500); // t=1500
        monitor.tick();
        assert_eq!(drain_restores(&mut rx).len(), 1);
    }

    #[test]
    fn tick_without_pending_restore_is_a_no_op() {
        let (monitor, clock, mut rx) = setup();
        monitor.tick();
        clock.advance_ms(10_000);
        monitor.tick();
        assert!(drain_restores(&mut rx).is_empty());
        assert!(monitor.snapshot().is_visible);
    }

    #[test]
    fn record_warning_sent_tracks_reference_and_count() {
        let (monitor, clock, _rx) = setup();

        monitor.handle_visibility(false);
        let lost_at = monitor.snapshot().focus_lost_at.unwrap();
        assert_eq!(monitor.snapshot().warning_reference(), Some(lost_at));

        clock.advance_ms(61_000);
        monitor.record_warning_sent();

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.warning_count, 1);
        assert_eq!(snapshot.warning_reference(), snapshot.last_warning_at);
        assert_ne!(snapshot.warning_reference(), Some(lost_at));
    }
}
