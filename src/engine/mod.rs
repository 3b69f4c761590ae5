//! Seam between score generation and the synthesis engine.
//!
//! The engine itself (orchestra compilation, audio rendering, device I/O)
//! lives behind [`EngineHost`] and [`Engine`]. [`Session`] owns one engine
//! instance and only lets calls through in lifecycle order:
//!
//! initialize → create → set option → compile → load score → start →
//! perform block* → stop → cleanup
//!
//! [`DryRunHost`] is the built-in engine: it follows the same contract and
//! timing without producing sound.

mod dry_run;
mod session;

pub use dry_run::{DryRunEngine, DryRunHost};
pub use session::{Session, Stage, run_performance};

use std::ops::BitOr;

/// Process-wide initialization flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitFlags(u32);

impl InitFlags {
    pub const NONE: InitFlags = InitFlags(0);
    /// Leave the host program's signal handlers alone.
    pub const NO_SIGNAL_HANDLER: InitFlags = InitFlags(1);
    /// Do not register an exit handler.
    pub const NO_ATEXIT: InitFlags = InitFlags(2);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: InitFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for InitFlags {
    type Output = InitFlags;

    fn bitor(self, rhs: InitFlags) -> InitFlags {
        InitFlags(self.0 | rhs.0)
    }
}

/// Outcome of one performance step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perform {
    Continue,
    Done,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("engine initialization failed (status {0})")]
    Init(i32),
    #[error("engine instance could not be created: {0}")]
    Create(String),
    #[error("option {option:?} rejected (status {status})")]
    Option { option: String, status: i32 },
    #[error("orchestra failed to compile (status {status}): {message}")]
    Compile { status: i32, message: String },
    #[error("score failed to load (status {status}): {message}")]
    LoadScore { status: i32, message: String },
    #[error("engine failed to start (status {0})")]
    Start(i32),
    #[error("performance step failed (status {0})")]
    Perform(i32),
    #[error("engine cleanup failed (status {0})")]
    Cleanup(i32),
    #[error("cannot {operation} while session is {stage}")]
    Lifecycle {
        operation: &'static str,
        stage: Stage,
    },
}

/// Library-level entry point of an engine: global setup and instance
/// creation.
pub trait EngineHost {
    type Instance: Engine;

    /// One-time global setup. Must succeed before `create` is called.
    fn initialize(&mut self, flags: InitFlags) -> Result<(), EngineError>;

    fn create(&mut self) -> Result<Self::Instance, EngineError>;
}

/// One engine instance. Callers go through [`Session`], which enforces the
/// call order; implementations may assume it.
pub trait Engine {
    fn set_option(&mut self, option: &str) -> Result<(), EngineError>;

    /// Compiles instrument-definition text. The text is opaque to this crate.
    fn compile_orchestra(&mut self, orchestra: &str) -> Result<(), EngineError>;

    fn read_score(&mut self, score: &str) -> Result<(), EngineError>;

    fn start(&mut self) -> Result<(), EngineError>;

    /// Processes one block of audio; blocks in real-time mode.
    fn perform_block(&mut self) -> Result<Perform, EngineError>;

    fn stop(&mut self);

    /// Releases everything the instance allocated since creation, leaving it
    /// reusable.
    fn cleanup(&mut self) -> Result<(), EngineError>;
}
