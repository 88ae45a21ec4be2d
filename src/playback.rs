use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::events::{BroadcastEvent, EventBus};
use crate::generator::WeatherReport;

/// The playback collaborator as the injector sees it: a single read-only
/// state question. Everything else about playback stays on the other side of
/// this boundary.
pub trait Playback: Send + Sync {
    /// Whether the engine is actively broadcasting (not stopped or paused).
    fn is_playing(&self) -> bool;
}

/// Console implementation: prints each report and paces on text length as a
/// stand-in for speech duration, then reports completion on the bus.
#[derive(Clone)]
pub struct ConsolePlayback {
    bus: EventBus,
    playing: Arc<AtomicBool>,
    pace_ms_per_char: u64,
}

impl ConsolePlayback {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            playing: Arc::new(AtomicBool::new(false)),
            pace_ms_per_char: 40,
        }
    }

    pub fn start(&self) {
        self.playing.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }

    /// Play one report to completion, then announce the boundary.
    pub async fn speak_report(&self, report: WeatherReport) {
        println!("{}", report.text);
        self.pace(&report.text).await;
        self.bus.emit(BroadcastEvent::ReportComplete { report });
    }

    /// Injected warnings sequence exactly like reports: play to completion,
    /// then normal content resumes.
    pub async fn speak_warning(&self, text: &str) {
        info!("playing injected warning");
        println!("{}", text);
        self.pace(text).await;
    }

    async fn pace(&self, text: &str) {
        let ms = text.len() as u64 * self.pace_ms_per_char;
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

impl Playback for ConsolePlayback {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}
