// scoregen: build a score with one of three strategies and perform it.
//
// Usage:
//   scoregen [--score static|templated|structured] [--seed N]
//     [--config scoregen.ron] [--option FLAG] [--emit]
//
// --emit prints the generated score and exits without performing.

use rand::SeedableRng;
use rand::rngs::StdRng;
use scoregen::{Config, DryRunHost, InitFlags, RandomPitches, Strategy, run_performance};
use std::error::Error;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "scoregen.ron";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let config_path = flag_value(&args, "--config").unwrap_or(DEFAULT_CONFIG);
    let mut config = Config::load_or_default(Path::new(config_path))?;
    let emit_only = apply_flags(&mut config, &args)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut picker = RandomPitches(rng);
    let score = config.score.generate(config.event_count, &mut picker)?;

    if emit_only {
        print!("{}", score);
        return Ok(());
    }

    info!(
        strategy = config.score.name(),
        lines = score.line_count(),
        "score generated"
    );

    let orchestra = config.orchestra.render();
    let mut host = DryRunHost::new(config.orchestra.sample_rate, config.orchestra.block_size);
    let blocks = run_performance(
        &mut host,
        InitFlags::NO_ATEXIT | InitFlags::NO_SIGNAL_HANDLER,
        &config.engine_option,
        &orchestra,
        &score,
    )?;
    info!(blocks, "done");

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|v| v.as_str())
}

/// Overrides `config` with any command-line flags and validates the result.
/// Returns whether `--emit` was given.
fn apply_flags(config: &mut Config, args: &[String]) -> Result<bool, Box<dyn Error>> {
    if let Some(name) = flag_value(args, "--score") {
        config.score = name.parse::<Strategy>()?;
    }
    if let Some(seed) = flag_value(args, "--seed") {
        config.seed = Some(seed.parse::<u64>()?);
    }
    if let Some(option) = flag_value(args, "--option") {
        config.engine_option = option.to_string();
    }
    config.validate()?;
    Ok(args.iter().any(|a| a == "--emit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("scoregen")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = Config::default();
        let emit = apply_flags(&mut config, &args(&[])).unwrap();
        assert!(!emit);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config {
            seed: Some(1),
            ..Default::default()
        };
        let emit = apply_flags(
            &mut config,
            &args(&["--score", "templated", "--seed", "42", "--option", "-n", "--emit"]),
        )
        .unwrap();
        assert!(emit);
        assert_eq!(config.score, Strategy::Templated);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.engine_option, "-n");
    }

    #[test]
    fn test_bad_seed_is_an_error() {
        let mut config = Config::default();
        assert!(apply_flags(&mut config, &args(&["--seed", "abc"])).is_err());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_bad_strategy_is_an_error() {
        let mut config = Config::default();
        assert!(apply_flags(&mut config, &args(&["--score", "random"])).is_err());
    }

    #[test]
    fn test_overrides_are_validated() {
        let mut config = Config {
            event_count: 101,
            ..Default::default()
        };
        assert!(apply_flags(&mut config, &args(&["--score", "templated"])).is_err());
    }
}
