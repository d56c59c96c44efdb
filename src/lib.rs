// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds the CLI and terminal setup.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod cues;
pub mod engine;
pub mod error;
pub mod logging;
pub mod preset;
pub mod runtime;
pub mod ui;

pub use engine::{IntervalTimer, TimerSession, TimerStatus};
pub use error::TimerError;
pub use preset::Preset;
