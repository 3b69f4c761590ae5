use super::{Engine, EngineError, EngineHost, InitFlags, Perform};
use crate::events::INSTRUMENT_STATEMENT;
use std::time::Duration;
use tracing::{debug, info};

/// Status reported for every dry-run failure.
const DRY_RUN_STATUS: i32 = -1;

/// Built-in engine that honors the lifecycle and block timing of a real
/// engine but renders no audio.
///
/// With a real-time output option (`-odac`) each block sleeps for its
/// duration, so a performance takes as long as the score; any other output
/// option runs the blocks back to back.
pub struct DryRunHost {
    sample_rate: u32,
    block_size: u32,
    initialized: Option<InitFlags>,
}

impl DryRunHost {
    pub fn new(sample_rate: u32, block_size: u32) -> Self {
        Self {
            sample_rate,
            block_size,
            initialized: None,
        }
    }
}

impl EngineHost for DryRunHost {
    type Instance = DryRunEngine;

    fn initialize(&mut self, flags: InitFlags) -> Result<(), EngineError> {
        if self.initialized.is_none() {
            debug!(flags = flags.bits(), "dry-run engine initialized");
            self.initialized = Some(flags);
        }
        Ok(())
    }

    fn create(&mut self) -> Result<DryRunEngine, EngineError> {
        if self.initialized.is_none() {
            return Err(EngineError::Create(
                "initialize must be called before create".to_string(),
            ));
        }
        if self.sample_rate == 0 || self.block_size == 0 {
            return Err(EngineError::Create(format!(
                "invalid timing: sample rate {} with block size {}",
                self.sample_rate, self.block_size
            )));
        }
        Ok(DryRunEngine::new(self.sample_rate, self.block_size))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ScheduledNote {
    instrument: u32,
    start: f64,
    duration: f64,
    line: String,
}

pub struct DryRunEngine {
    sample_rate: u32,
    block_size: u32,
    realtime: bool,
    compiled: bool,
    notes: Vec<ScheduledNote>,
    next_note: usize,
    total_blocks: u64,
    current_block: u64,
}

impl DryRunEngine {
    fn new(sample_rate: u32, block_size: u32) -> Self {
        Self {
            sample_rate,
            block_size,
            realtime: false,
            compiled: false,
            notes: Vec::new(),
            next_note: 0,
            total_blocks: 0,
            current_block: 0,
        }
    }

    pub fn is_realtime(&self) -> bool {
        self.realtime
    }

    /// Blocks the loaded score lasts; valid after `start`.
    pub fn total_blocks(&self) -> u64 {
        self.total_blocks
    }

    pub fn notes_loaded(&self) -> usize {
        self.notes.len()
    }

    fn block_seconds(&self) -> f64 {
        self.block_size as f64 / self.sample_rate as f64
    }

    /// Latest note end in seconds.
    pub fn end_time(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| n.start + n.duration)
            .fold(0.0, f64::max)
    }
}

fn load_error(line_number: usize, line: &str, reason: &str) -> EngineError {
    EngineError::LoadScore {
        status: DRY_RUN_STATUS,
        message: format!("line {}: {} ({:?})", line_number, reason, line),
    }
}

/// Reads the note statements of a score. Blank lines and `;` comments are
/// skipped, `e` ends the score early.
fn parse_score(score: &str) -> Result<Vec<ScheduledNote>, EngineError> {
    let mut notes = Vec::new();
    for (i, raw) in score.lines().enumerate() {
        let line_number = i + 1;
        let line = raw.split(';').next().unwrap_or("").trim();
        let Some(statement) = line.chars().next() else {
            continue;
        };
        match statement {
            'e' => break,
            INSTRUMENT_STATEMENT => {}
            _ => return Err(load_error(line_number, raw, "unsupported statement")),
        }

        let fields: Vec<&str> = line[statement.len_utf8()..].split_whitespace().collect();
        if fields.len() < 3 {
            return Err(load_error(line_number, raw, "expected at least p1 p2 p3"));
        }
        let instrument: u32 = fields[0]
            .parse()
            .map_err(|_| load_error(line_number, raw, "bad instrument number"))?;
        let start: f64 = fields[1]
            .parse()
            .map_err(|_| load_error(line_number, raw, "bad start time"))?;
        let duration: f64 = fields[2]
            .parse()
            .map_err(|_| load_error(line_number, raw, "bad duration"))?;
        if !(start >= 0.0 && duration >= 0.0) || !(start + duration).is_finite() {
            return Err(load_error(line_number, raw, "negative or non-finite timing"));
        }

        notes.push(ScheduledNote {
            instrument,
            start,
            duration,
            line: line.to_string(),
        });
    }
    Ok(notes)
}

impl Engine for DryRunEngine {
    fn set_option(&mut self, option: &str) -> Result<(), EngineError> {
        match option {
            "-odac" => self.realtime = true,
            "-n" | "--nosound" => self.realtime = false,
            o if o.starts_with("-o") && o.len() > 2 => self.realtime = false,
            o if o.starts_with('-') => {}
            _ => {
                return Err(EngineError::Option {
                    option: option.to_string(),
                    status: DRY_RUN_STATUS,
                });
            }
        }
        Ok(())
    }

    fn compile_orchestra(&mut self, orchestra: &str) -> Result<(), EngineError> {
        if orchestra.trim().is_empty() {
            return Err(EngineError::Compile {
                status: DRY_RUN_STATUS,
                message: "empty orchestra".to_string(),
            });
        }
        self.compiled = true;
        Ok(())
    }

    fn read_score(&mut self, score: &str) -> Result<(), EngineError> {
        let mut notes = parse_score(score)?;
        debug!(notes = notes.len(), "dry-run score read");
        self.notes.append(&mut notes);
        Ok(())
    }

    fn start(&mut self) -> Result<(), EngineError> {
        if !self.compiled {
            return Err(EngineError::Start(DRY_RUN_STATUS));
        }
        // Notes fire in start-time order regardless of score line order.
        self.notes.sort_by(|a, b| a.start.total_cmp(&b.start));
        self.next_note = 0;
        self.current_block = 0;
        self.total_blocks =
            (self.end_time() * self.sample_rate as f64 / self.block_size as f64).ceil() as u64;
        info!(
            notes = self.notes.len(),
            end_time = self.end_time(),
            blocks = self.total_blocks,
            realtime = self.realtime,
            "dry-run performance starting"
        );
        Ok(())
    }

    fn perform_block(&mut self) -> Result<Perform, EngineError> {
        if self.current_block >= self.total_blocks {
            return Ok(Perform::Done);
        }

        let block_end = (self.current_block + 1) as f64 * self.block_seconds();
        while let Some(note) = self.notes.get(self.next_note) {
            if note.start >= block_end {
                break;
            }
            debug!(
                instrument = note.instrument,
                start = note.start,
                duration = note.duration,
                block = self.current_block,
                "{}",
                note.line
            );
            self.next_note += 1;
        }

        self.current_block += 1;
        if self.realtime {
            std::thread::sleep(Duration::from_secs_f64(self.block_seconds()));
        }
        Ok(Perform::Continue)
    }

    fn stop(&mut self) {
        info!(
            notes_played = self.next_note,
            blocks = self.current_block,
            "dry-run performance stopped"
        );
    }

    fn cleanup(&mut self) -> Result<(), EngineError> {
        let sample_rate = self.sample_rate;
        let block_size = self.block_size;
        *self = DryRunEngine::new(sample_rate, block_size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(sample_rate: u32, block_size: u32) -> DryRunEngine {
        let mut host = DryRunHost::new(sample_rate, block_size);
        host.initialize(InitFlags::NONE).unwrap();
        host.create().unwrap()
    }

    fn run_to_end(engine: &mut DryRunEngine) -> u64 {
        let mut blocks = 0;
        while engine.perform_block().unwrap() == Perform::Continue {
            blocks += 1;
        }
        blocks
    }

    #[test]
    fn test_create_requires_initialize() {
        let mut host = DryRunHost::new(44100, 32);
        assert!(matches!(host.create(), Err(EngineError::Create(_))));
        host.initialize(InitFlags::NO_ATEXIT).unwrap();
        assert!(host.create().is_ok());
    }

    #[test]
    fn test_zero_block_size_is_rejected() {
        let mut host = DryRunHost::new(44100, 0);
        host.initialize(InitFlags::NONE).unwrap();
        assert!(matches!(host.create(), Err(EngineError::Create(_))));
    }

    #[test]
    fn test_block_count_covers_score_end() {
        let mut engine = engine(100, 10);
        engine.set_option("-n").unwrap();
        engine.compile_orchestra("instr 1\nendin\n").unwrap();
        engine
            .read_score("i1 0 0.25 0.5 8.00\ni1 3 0.25 0.5 8.12\n")
            .unwrap();
        engine.start().unwrap();
        // 3.25 s at 0.1 s per block
        assert_eq!(engine.total_blocks(), 33);
        assert_eq!(run_to_end(&mut engine), 33);
        assert_eq!(engine.next_note, 2);
    }

    #[test]
    fn test_static_line_without_newline_is_read() {
        let mut engine = engine(100, 10);
        engine.compile_orchestra("instr 1\nendin\n").unwrap();
        engine.read_score("i1 0 1 0.5 8.00").unwrap();
        engine.start().unwrap();
        assert_eq!(engine.notes_loaded(), 1);
        assert_eq!(engine.end_time(), 1.0);
        assert_eq!(run_to_end(&mut engine), 10);
    }

    #[test]
    fn test_comments_blank_lines_and_end_statement() {
        let notes = parse_score("; header\n\ni1 0 1 ; trailing\ne\ni1 9 1\n").unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].line, "i1 0 1");
    }

    #[test]
    fn test_malformed_lines_fail_to_load() {
        for bad in ["i1 0", "ix 0 1", "i1 zero 1", "i1 0 -1", "f1 0 16 10 1"] {
            assert!(
                matches!(parse_score(bad), Err(EngineError::LoadScore { status: -1, .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_empty_score_finishes_immediately() {
        let mut engine = engine(44100, 32);
        engine.compile_orchestra("instr 1\nendin\n").unwrap();
        engine.read_score("").unwrap();
        engine.start().unwrap();
        assert_eq!(engine.perform_block(), Ok(Perform::Done));
    }

    #[test]
    fn test_options() {
        let mut engine = engine(44100, 32);
        engine.set_option("-odac").unwrap();
        assert!(engine.is_realtime());
        engine.set_option("-otest.wav").unwrap();
        assert!(!engine.is_realtime());
        engine.set_option("-d").unwrap();
        assert!(matches!(
            engine.set_option("odac"),
            Err(EngineError::Option { .. })
        ));
    }

    #[test]
    fn test_empty_orchestra_fails_to_compile() {
        let mut engine = engine(44100, 32);
        assert!(matches!(
            engine.compile_orchestra("  \n"),
            Err(EngineError::Compile { .. })
        ));
        assert_eq!(engine.start(), Err(EngineError::Start(-1)));
    }

    #[test]
    fn test_full_performance_of_templated_score() {
        use crate::engine::run_performance;
        use crate::generators::templated_score;
        use crate::orchestra::OrchestraConfig;

        let orchestra = OrchestraConfig::default();
        let mut host = DryRunHost::new(orchestra.sample_rate, orchestra.block_size);
        let blocks = run_performance(
            &mut host,
            InitFlags::NO_ATEXIT | InitFlags::NO_SIGNAL_HANDLER,
            "-n",
            &orchestra.render(),
            &templated_score(),
        );
        // Last note ends at 3.25 s: 3.25 * 44100 / 32 rounded up.
        assert_eq!(blocks, Ok(4479));
    }

    #[test]
    fn test_bad_score_aborts_before_performing() {
        use crate::engine::run_performance;
        use crate::score::ScoreText;

        let mut host = DryRunHost::new(44100, 32);
        let result = run_performance(
            &mut host,
            InitFlags::NONE,
            "-n",
            "instr 1\nendin\n",
            &ScoreText::from("i1 0 0.25 0.5 8 00\nq\n"),
        );
        assert!(matches!(result, Err(EngineError::LoadScore { .. })));
    }

    #[test]
    fn test_cleanup_resets_instance() {
        let mut engine = engine(100, 10);
        engine.set_option("-odac").unwrap();
        engine.compile_orchestra("instr 1\nendin\n").unwrap();
        engine.read_score("i1 0 1 0.5 8.00\n").unwrap();
        engine.cleanup().unwrap();
        assert_eq!(engine.notes_loaded(), 0);
        assert!(!engine.is_realtime());
        assert_eq!(engine.start(), Err(EngineError::Start(-1)));
    }
}
