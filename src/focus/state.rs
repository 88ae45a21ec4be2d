use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of the debounced focus state. Mutated only by the monitor;
/// everyone else receives clones.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusState {
    pub is_visible: bool,
    /// Set exactly once per unbroken loss-of-focus episode; cleared only by a
    /// committed (debounced) restore.
    pub focus_lost_at: Option<DateTime<Utc>>,
    pub last_warning_at: Option<DateTime<Utc>>,
    pub warning_count: u32,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            is_visible: true,
            focus_lost_at: None,
            last_warning_at: None,
            warning_count: 0,
        }
    }
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The timestamp the injector measures against: the last warning if one
    /// was sent this episode, otherwise the moment focus was lost.
    pub fn warning_reference(&self) -> Option<DateTime<Utc>> {
        self.last_warning_at.or(self.focus_lost_at)
    }

    pub(crate) fn mark_hidden(&mut self, now: DateTime<Utc>) {
        self.is_visible = false;
        self.focus_lost_at = Some(now);
        self.last_warning_at = None;
        self.warning_count = 0;
    }

    pub(crate) fn clear_episode(&mut self) {
        *self = Self::default();
    }
}
