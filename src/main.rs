use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::{signal, time};

use longwave::clock::system_clock;
use longwave::config::BroadcastConfig;
use longwave::events::{BroadcastEvent, EventBus};
use longwave::playback::ConsolePlayback;
use longwave::session::BroadcastSession;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Longwave starting up...");

    let config = match std::env::var("LONGWAVE_CONFIG") {
        Ok(path) => BroadcastConfig::load(&PathBuf::from(path))?,
        Err(_) => BroadcastConfig::default(),
    };

    let bus = EventBus::default();
    let playback = Arc::new(ConsolePlayback::new(bus.clone()));
    let session = Arc::new(BroadcastSession::new(
        config,
        playback.clone(),
        system_clock(),
        bus.clone(),
    )?);

    // Console stand-in for the visibility signal: "hide" and "show" on stdin.
    let (vis_tx, vis_rx) = watch::channel(true);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match line.trim() {
                "hide" => {
                    let _ = vis_tx.send(false);
                }
                "show" => {
                    let _ = vis_tx.send(true);
                }
                _ => {}
            }
        }
    });

    session.start(Some(vis_rx)).await;
    playback.start();

    let broadcast = {
        let session = session.clone();
        let playback = playback.clone();
        let mut events = bus.subscribe();
        async move {
            loop {
                // Splice in any warning that became ready at the last boundary.
                while let Ok(event) = events.try_recv() {
                    if let BroadcastEvent::WarningReady { message_text, .. } = event {
                        playback.speak_warning(&message_text).await;
                    }
                }

                match session.next_report().await {
                    Some(report) => {
                        playback.speak_report(report).await;
                        // Give the boundary check a beat to land before the next pull.
                        time::sleep(Duration::from_millis(20)).await;
                    }
                    None => time::sleep(Duration::from_millis(200)).await,
                }
            }
        }
    };

    tokio::select! {
        _ = broadcast => {}
        _ = signal::ctrl_c() => info!("shutting down"),
    }

    playback.stop();
    session.shutdown().await;
    Ok(())
}
