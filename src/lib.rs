pub mod buffer;
pub mod clock;
pub mod config;
pub mod events;
pub mod focus;
pub mod generator;
pub mod injector;
pub mod playback;
pub mod session;
pub mod tts;
pub mod vocabulary;

pub use buffer::ReportBuffer;
pub use config::BroadcastConfig;
pub use events::{BroadcastEvent, EventBus};
pub use focus::{FocusMonitor, FocusState};
pub use generator::{ReportGenerator, WeatherReport};
pub use injector::WarningInjector;
pub use playback::{ConsolePlayback, Playback};
pub use session::BroadcastSession;
