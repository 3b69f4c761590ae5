use super::{Engine, EngineError, EngineHost, InitFlags, Perform};
use crate::score::ScoreText;
use std::fmt;
use tracing::{debug, info, warn};

/// Where a session is in the engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    Configured,
    Compiled,
    Loaded,
    Running,
    Finished,
    Stopped,
    CleanedUp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Created => "created",
            Stage::Configured => "configured",
            Stage::Compiled => "compiled",
            Stage::Loaded => "loaded",
            Stage::Running => "running",
            Stage::Finished => "finished",
            Stage::Stopped => "stopped",
            Stage::CleanedUp => "cleaned up",
        };
        f.write_str(name)
    }
}

/// Owns one engine instance for a single performance.
///
/// Each operation is only forwarded from the stages it is valid in; anything
/// else returns [`EngineError::Lifecycle`] without touching the engine.
/// Dropping a session that was not closed stops and cleans up the engine.
pub struct Session<E: Engine> {
    engine: E,
    stage: Stage,
    blocks: u64,
}

impl<E: Engine> Session<E> {
    /// Runs the host's global initialization and creates an instance.
    pub fn open<H>(host: &mut H, flags: InitFlags) -> Result<Self, EngineError>
    where
        H: EngineHost<Instance = E>,
    {
        host.initialize(flags)?;
        let engine = host.create()?;
        info!(flags = flags.bits(), "engine instance created");
        Ok(Self {
            engine,
            stage: Stage::Created,
            blocks: 0,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Blocks performed so far.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    fn require_stage(&self, operation: &'static str, allowed: &[Stage]) -> Result<(), EngineError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(EngineError::Lifecycle {
                operation,
                stage: self.stage,
            })
        }
    }

    pub fn set_option(&mut self, option: &str) -> Result<(), EngineError> {
        self.require_stage("set an option", &[Stage::Created])?;
        self.engine.set_option(option)?;
        info!(option, "engine option set");
        self.stage = Stage::Configured;
        Ok(())
    }

    pub fn compile(&mut self, orchestra: &str) -> Result<(), EngineError> {
        self.require_stage("compile an orchestra", &[Stage::Created, Stage::Configured])?;
        self.engine.compile_orchestra(orchestra)?;
        info!(bytes = orchestra.len(), "orchestra compiled");
        self.stage = Stage::Compiled;
        Ok(())
    }

    /// Hands a score to the engine. May be called again to append more.
    pub fn load(&mut self, score: &ScoreText) -> Result<(), EngineError> {
        self.require_stage("load a score", &[Stage::Compiled, Stage::Loaded])?;
        self.engine.read_score(score.as_str())?;
        info!(lines = score.line_count(), "score loaded");
        self.stage = Stage::Loaded;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), EngineError> {
        self.require_stage("start", &[Stage::Loaded])?;
        self.engine.start()?;
        info!("performance started");
        self.stage = Stage::Running;
        Ok(())
    }

    /// One performance step.
    pub fn step(&mut self) -> Result<Perform, EngineError> {
        self.require_stage("perform", &[Stage::Running])?;
        let result = self.engine.perform_block()?;
        if result == Perform::Done {
            debug!(blocks = self.blocks, "engine reported end of performance");
            self.stage = Stage::Finished;
        } else {
            self.blocks += 1;
        }
        Ok(result)
    }

    /// Steps until the engine reports completion and returns the number of
    /// blocks performed.
    pub fn perform(&mut self) -> Result<u64, EngineError> {
        while self.step()? == Perform::Continue {}
        info!(blocks = self.blocks, "performance complete");
        Ok(self.blocks)
    }

    pub fn stop(&mut self) -> Result<(), EngineError> {
        self.require_stage("stop", &[Stage::Running, Stage::Finished])?;
        self.engine.stop();
        info!("performance stopped");
        self.stage = Stage::Stopped;
        Ok(())
    }

    /// Stops the engine if it is still performing, then cleans it up.
    pub fn close(mut self) -> Result<(), EngineError> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<(), EngineError> {
        if matches!(self.stage, Stage::Running | Stage::Finished) {
            self.stop()?;
        }
        if self.stage != Stage::CleanedUp {
            // Stage moves first so a failed cleanup is not retried on drop.
            self.stage = Stage::CleanedUp;
            self.engine.cleanup()?;
            info!("engine cleaned up");
        }
        Ok(())
    }
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        if self.stage == Stage::CleanedUp {
            return;
        }
        warn!(stage = %self.stage, "session dropped without close, tearing down engine");
        if let Err(e) = self.teardown() {
            warn!(error = %e, "engine teardown failed");
        }
    }
}

/// Drives one complete performance: open, configure, compile, load, start,
/// perform until done, stop, clean up. Any error aborts before (or during)
/// the performance loop and the engine is still torn down.
pub fn run_performance<H: EngineHost>(
    host: &mut H,
    flags: InitFlags,
    option: &str,
    orchestra: &str,
    score: &ScoreText,
) -> Result<u64, EngineError> {
    let mut session = Session::open(host, flags)?;
    session.set_option(option)?;
    session.compile(orchestra)?;
    session.load(score)?;
    session.start()?;
    let blocks = session.perform()?;
    session.close()?;
    Ok(blocks)
}
