use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::buffer::ReportBuffer;
use crate::clock::Clock;
use crate::config::BroadcastConfig;
use crate::events::{BroadcastEvent, EventBus};
use crate::focus::FocusMonitor;
use crate::generator::{ReportGenerator, WeatherReport};
use crate::injector::WarningInjector;
use crate::playback::Playback;

/// One broadcast's worth of wiring: generator -> buffer -> playback, with the
/// focus monitor and warning injector listening at the boundaries. Built once
/// at startup and passed by reference; no global singletons, so tests get a
/// fresh instance each.
pub struct BroadcastSession {
    bus: EventBus,
    buffer: Arc<Mutex<ReportBuffer>>,
    generator: Arc<Mutex<ReportGenerator>>,
    monitor: FocusMonitor,
    injector: Arc<WarningInjector>,
    config: BroadcastConfig,
    cancel: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl BroadcastSession {
    pub fn new(
        config: BroadcastConfig,
        playback: Arc<dyn Playback>,
        clock: Arc<dyn Clock>,
        bus: EventBus,
    ) -> Result<Self> {
        let buffer = ReportBuffer::new(config.buffer.min_size, config.buffer.max_size)?;
        let generator =
            ReportGenerator::new(config.generator.clone(), StdRng::from_entropy());
        let monitor = FocusMonitor::new(&config.focus, clock.clone(), bus.clone());
        let injector = WarningInjector::new(
            &config.warning,
            monitor.clone(),
            playback,
            bus.clone(),
            clock,
            StdRng::from_entropy(),
        );

        Ok(Self {
            bus,
            buffer: Arc::new(Mutex::new(buffer)),
            generator: Arc::new(Mutex::new(generator)),
            monitor,
            injector: Arc::new(injector),
            config,
            cancel: CancellationToken::new(),
            workers: Mutex::new(Vec::new()),
        })
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn monitor(&self) -> &FocusMonitor {
        &self.monitor
    }

    /// Spawn the worker tasks. `visibility` carries raw visibility signals;
    /// without one the monitor stays Visible forever and the warning feature
    /// is off. Degraded, not broken.
    pub async fn start(&self, visibility: Option<watch::Receiver<bool>>) {
        let mut workers = self.workers.lock().await;

        workers.push(self.spawn_filler());
        workers.push(self.spawn_monitor_ticker());
        workers.push(self.spawn_injection_loop());

        match visibility {
            Some(rx) => workers.push(self.spawn_visibility_forwarder(rx)),
            None => warn!("no visibility source attached; inactivity warnings disabled"),
        }

        info!("broadcast session started");
    }

    /// Hand the oldest buffered report to the caller (the playback side).
    pub async fn next_report(&self) -> Option<WeatherReport> {
        self.buffer.lock().await.pop()
    }

    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let mut workers = self.workers.lock().await;
        for handle in workers.drain(..) {
            handle.abort();
        }
        info!("broadcast session stopped");
    }

    /// Tops the buffer back up to capacity whenever it dips below the
    /// refill threshold.
    fn spawn_filler(&self) -> JoinHandle<()> {
        let buffer = self.buffer.clone();
        let generator = self.generator.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let mut interval = time::interval(time::Duration::from_millis(250));
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let mut buffer = buffer.lock().await;
                if !buffer.needs_refill() {
                    continue;
                }
                let mut generator = generator.lock().await;
                while buffer.has_capacity() {
                    match generator.generate() {
                        Ok(report) => {
                            buffer.push(report);
                        }
                        Err(err) => {
                            // A generation failure is a programming defect;
                            // surface it loudly and stop retrying this round.
                            error!("report generation failed: {}", err);
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Bookkeeping tick for the monitor's debounce deadline.
    fn spawn_monitor_ticker(&self) -> JoinHandle<()> {
        let monitor = self.monitor.clone();
        let cancel = self.cancel.clone();
        let tick = time::Duration::from_millis(self.config.focus.tick_interval_ms);

        tokio::spawn(async move {
            let mut interval = time::interval(tick);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => monitor.tick(),
                }
            }
        })
    }

    /// Runs the injector check at every report-completion boundary.
    fn spawn_injection_loop(&self) -> JoinHandle<()> {
        let injector = self.injector.clone();
        let cancel = self.cancel.clone();
        let mut events = self.bus.subscribe();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = events.recv() => match event {
                        Ok(BroadcastEvent::ReportComplete { .. }) => {
                            injector.on_report_complete();
                        }
                        Ok(_) => {}
                        Err(err) => {
                            warn!("injection loop lost the event bus: {}", err);
                            break;
                        }
                    }
                }
            }
        })
    }

    fn spawn_visibility_forwarder(&self, mut rx: watch::Receiver<bool>) -> JoinHandle<()> {
        let monitor = self.monitor.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break; // sender gone; stay in whatever state we had
                        }
                        let visible = *rx.borrow();
                        monitor.handle_visibility(visible);
                    }
                }
            }
        })
    }
}
