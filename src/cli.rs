//! Command-line flag parsing.

use std::env;
use std::path::PathBuf;

/// Port the projection API listens on by default.
pub const DEFAULT_PORT: u16 = 3000;
/// Preset used when no configuration source is given.
pub const DEFAULT_PRESET: &str = "default";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    /// TOML configuration file.
    pub config: Option<PathBuf>,
    /// Built-in preset name; `default` when neither source is given.
    pub preset: Option<String>,
    /// Overrides `strategy.participation_pct`.
    pub participation: Option<i64>,
    /// Overrides `chart.seed`.
    pub seed: Option<u64>,
    /// Writes the generated load curves to this CSV file.
    pub curves_out: Option<PathBuf>,
    /// Runs the interactive terminal wizard.
    pub tui: bool,
    /// Starts the projection API.
    pub serve: bool,
    pub port: u16,
    pub help: bool,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a message describing the first invalid argument.
pub fn parse_args() -> Result<CliOptions, String> {
    parse_args_from(env::args().skip(1))
}

/// Parses `args` (without the program name).
///
/// # Errors
///
/// Returns a message for unknown flags, missing or malformed values,
/// repeated flags and `--config` combined with `--preset`.
pub fn parse_args_from<I, S>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut opts = CliOptions {
        config: None,
        preset: None,
        participation: None,
        seed: None,
        curves_out: None,
        tui: false,
        serve: false,
        port: DEFAULT_PORT,
        help: false,
    };

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" => {
                let path = args.next_or_err(&mut i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                let name = args.next_or_err(&mut i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--participation" => {
                let raw = args.next_or_err(&mut i, "missing value for --participation (expected an integer)")?;
                let value = raw
                    .parse::<i64>()
                    .map_err(|_| format!("--participation value \"{raw}\" is not a valid integer"))?;
                opts.participation = Some(value);
            }
            "--seed" => {
                let raw = args.next_or_err(&mut i, "missing value for --seed (expected a u64)")?;
                let value = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                opts.seed = Some(value);
            }
            "--curves-out" => {
                let path = args.next_or_err(&mut i, "missing value for --curves-out (expected a file path)")?;
                if opts.curves_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--curves-out provided more than once".to_string());
                }
            }
            "--port" => {
                let raw = args.next_or_err(&mut i, "missing value for --port (expected a u16)")?;
                opts.port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--tui" => opts.tui = true,
            "--serve" => opts.serve = true,
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if opts.tui && opts.serve {
        return Err("arguments `--tui` and `--serve` are mutually exclusive".to_string());
    }
    if opts.config.is_none() && opts.preset.is_none() {
        opts.preset = Some(DEFAULT_PRESET.to_string());
    }

    Ok(opts)
}

impl CliOptions {
    /// Preset to load when no `--config` file is given.
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or(DEFAULT_PRESET)
    }
}

trait SliceArgExt {
    /// Advances `index` to the flag's value and returns it.
    fn next_or_err(&self, index: &mut usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: &mut usize, err: &str) -> Result<&str, String> {
        *index += 1;
        self.get(*index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("colab-planner: community energy strategy wizard");
    eprintln!();
    eprintln!("Usage: colab-planner [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (default, ev_heavy, solar_rich)");
    eprintln!("  --participation <int>    Override DR participation (percent)");
    eprintln!("  --seed <u64>             Seed the load curve jitter");
    eprintln!("  --curves-out <path>      Export generated load curves to CSV");
    eprintln!("  --tui                    Run the interactive terminal wizard");
    eprintln!("  --serve                  Start the projection API");
    eprintln!("  --port <u16>             API port (default: {DEFAULT_PORT})");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Without --tui or --serve the projection report is printed and the program exits.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_default_preset() {
        let opts = parse_args_from(Vec::<String>::new()).unwrap();
        assert_eq!(opts.preset.as_deref(), Some("default"));
        assert_eq!(opts.preset_name(), DEFAULT_PRESET);
        assert!(opts.config.is_none());
        assert_eq!(opts.port, DEFAULT_PORT);
        assert!(!opts.tui && !opts.serve && !opts.help);
    }

    #[test]
    fn supports_config_flag() {
        let opts = parse_args_from(["--config", "planner.toml"]).unwrap();
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("planner.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn parses_overrides() {
        let opts = parse_args_from([
            "--preset",
            "ev_heavy",
            "--participation",
            "55",
            "--seed",
            "9",
            "--curves-out",
            "curves.csv",
            "--serve",
            "--port",
            "8081",
        ])
        .unwrap();
        assert_eq!(opts.preset.as_deref(), Some("ev_heavy"));
        assert_eq!(opts.participation, Some(55));
        assert_eq!(opts.seed, Some(9));
        assert!(opts.serve);
        assert_eq!(opts.port, 8081);
    }

    #[test]
    fn rejects_config_with_preset() {
        let err = parse_args_from(["--config", "a.toml", "--preset", "default"]).unwrap_err();
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_args_from(["--seed", "-1"]).is_err());
        assert!(parse_args_from(["--port", "70000"]).is_err());
        assert!(parse_args_from(["--participation"]).is_err());
        assert!(parse_args_from(["--bogus"]).is_err());
        assert!(parse_args_from(["--tui", "--serve"]).is_err());
    }
}
