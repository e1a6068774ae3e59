use std::{env, path::Path};

use log::LevelFilter;
use near_next_derive::{CliOptions, CliValue, KvDisplay};

use crate::{
    Error, Result,
    constants::DEFAULT_WINDOW,
    itinerary::WindowSize,
};

/// Runtime options for every command.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct ItineraryOptions {
    /// Task to run: `itinerary`, `encode`, `list`, or `report`.
    #[cli(long = "command", parse_with = "Command::parse")]
    pub command: Command,
    /// Input file: binary records, or CSV text for `encode`.
    #[cli(long = "input")]
    #[kv(fmt = "debug")]
    pub input: String,
    /// Output file. `list` and `report` write to stdout when empty.
    #[cli(long = "output")]
    #[kv(fmt = "debug")]
    pub output: String,
    /// Search window size `w`; the window spans `w / 2` records each way.
    #[cli(long = "window")]
    pub window: usize,
    /// Candidate search strategy.
    #[cli(long = "search-mode", parse_with = "SearchMode::parse")]
    pub search_mode: SearchMode,
    /// Array index of the first stop.
    #[cli(long = "start")]
    pub start: usize,
    /// Count the leg back to the start in the reported total.
    #[cli(long = "close-tour", flag)]
    pub close_tour: bool,
    /// Maximum lines printed by `list`; 0 prints everything.
    #[cli(long = "limit")]
    pub limit: usize,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(long = "log-timestamp", flag)]
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    #[kv(fmt = "debug")]
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "command")]
pub enum Command {
    Itinerary,
    Encode,
    List,
    Report,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "search-mode")]
pub enum SearchMode {
    Window,
    #[cli(alias = "brute")]
    BruteForce,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for ItineraryOptions {
    fn default() -> Self {
        Self {
            command: Command::Itinerary,
            input: String::new(),
            output: String::new(),
            window: DEFAULT_WINDOW,
            search_mode: SearchMode::Window,
            start: 0,
            close_tour: false,
            limit: 0,
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
        }
    }
}

impl ItineraryOptions {
    /// Parses and validates the process arguments.
    pub fn from_args() -> Result<Self> {
        let options = Self::parse_from_iter(env::args().skip(1))?;
        options.validate()?;
        Ok(options)
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        Ok(options)
    }

    /// Checks everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.input_path().is_none() {
            return Err(Error::invalid_input(format!(
                "--input is required for --command={}",
                self.command
            )));
        }
        match self.command {
            Command::Itinerary => {
                if self.output_path().is_none() {
                    return Err(Error::invalid_input(
                        "--output is required for --command=itinerary",
                    ));
                }
                if self.search_mode == SearchMode::Window {
                    self.window_size()?;
                }
            }
            Command::Encode => {
                if self.output_path().is_none() {
                    return Err(Error::invalid_input("--output is required for --command=encode"));
                }
            }
            Command::List | Command::Report => {}
        }
        Ok(())
    }

    pub fn window_size(&self) -> Result<WindowSize> {
        WindowSize::new(self.window)
    }

    pub fn usage() -> String {
        format!(
            concat!(
                "Usage:\n",
                "  near-next [options] --input points.bin --output route.bin\n",
                "  near-next --command encode --input points.csv --output points.bin\n",
                "  near-next --command list --input points.bin [--limit 20]\n",
                "  near-next --command report --input route.bin\n\n",
                "Options:\n",
                "  --command <{}>\n",
                "  --input <path>\n",
                "  --output <path>\n",
                "  --window <usize>          ({}..={}, default {})\n",
                "  --search-mode <{}>\n",
                "  --start <usize>\n",
                "  --close-tour[=<bool>]\n",
                "  --no-close-tour\n",
                "  --limit <usize>\n",
                "  --log-level <{}>\n",
                "  --log-format <{}>\n",
                "  --log-timestamp[=<bool>]\n",
                "  --no-log-timestamp\n",
                "  --log-output <path>\n",
                "  --help\n",
            ),
            Command::expected(),
            crate::constants::MIN_WINDOW,
            crate::constants::MAX_WINDOW,
            DEFAULT_WINDOW,
            SearchMode::expected(),
            LogLevel::expected(),
            LogFormat::expected(),
        )
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_empty_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_empty_path(&self.output)
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_empty_path(&self.log_output)
    }
}

/// Empty or `-` selects the standard stream.
fn non_empty_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}
