pub mod monitor;
pub mod state;

pub use monitor::FocusMonitor;
pub use state::FocusState;
