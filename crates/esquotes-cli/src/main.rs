use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use esquotes_core::{
    Command, Config, ConfigError, ConvertError, QuoteStyle, apply_edits, debug_targets, offset_at,
};
use owo_colors::OwoColorize;
use rayon::prelude::*;
use similar::{ChangeTag, TextDiff};
use thiserror::Error;

mod logger;

const CONFIG_FILE: &str = "esquotes.toml";

/// Convert JavaScript and TypeScript strings between quote styles
#[derive(Parser, Debug)]
#[command(name = "esquotes", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Subcommands,

    /// Configuration file (defaults to ./esquotes.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log to stderr (-v for warnings, -vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Subcommands {
    /// Turn the quoted string at the cursor into a template string
    ToTemplate(ConvertArgs),
    /// Turn the template string at the cursor into a quoted string
    ToNormal {
        #[command(flatten)]
        convert: ConvertArgs,

        /// Quote to convert to, overriding the configuration file
        #[arg(long, value_enum)]
        quote: Option<QuoteStyle>,
    },
    /// Swap single and double quotes on the string at the cursor
    Toggle(ConvertArgs),
    /// Print the string targets found in files
    Targets {
        /// Glob patterns of files to inspect (reads from stdin if none provided)
        patterns: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// File to convert (reads from stdin if not provided)
    #[arg(conflicts_with = "stdin")]
    file: Option<PathBuf>,

    /// 1-based line of the cursor
    #[arg(long)]
    line: usize,

    /// 1-based column of the cursor, in characters
    #[arg(long)]
    column: usize,

    /// Read from stdin, write to stdout
    #[arg(long)]
    stdin: bool,

    /// Check whether the conversion would change anything without writing
    #[arg(long)]
    check: bool,

    /// Print a unified diff instead of writing
    #[arg(long, conflicts_with = "check")]
    diff: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(&cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            ExitCode::from(2)
        }
    }
}

/// Run the selected subcommand. Returns whether `--check` found changes.
fn run(cli: &Cli) -> Result<bool, Error> {
    let mut config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Subcommands::ToTemplate(args) => convert(Command::ToTemplate, args, &config),
        Subcommands::ToNormal { convert: args, quote } => {
            if let Some(quote) = quote {
                config.default_quote = *quote;
            }
            convert(Command::ToNormal, args, &config)
        }
        Subcommands::Toggle(args) => convert(Command::Toggle, args, &config),
        Subcommands::Targets { patterns } => targets(patterns, &config),
    }
}

/// Load `path`, or `esquotes.toml` in the working directory if it exists.
fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    let (path, required) = path.map_or_else(|| (Path::new(CONFIG_FILE), false), |path| (path, true));

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if !required && e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no {CONFIG_FILE} found, using defaults");
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(Error::Io {
                label: path.display().to_string(),
                source,
            });
        }
    };

    let config: Config = toml::from_str(&text).map_err(|source| Error::ConfigSyntax {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate().map_err(|source| Error::ConfigInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded configuration from {}", path.display());

    Ok(config)
}

fn convert(command: Command, args: &ConvertArgs, config: &Config) -> Result<bool, Error> {
    let (label, source) = match &args.file {
        Some(path) => {
            if !config.supports_path(path) {
                return Err(Error::UnsupportedLanguage(path.clone()));
            }
            (path.display().to_string(), read_file(path)?)
        }
        None => ("stdin".to_string(), read_stdin()?),
    };

    let converted = convert_source(command, &source, args, config).map_err(|source| {
        Error::Convert {
            label: label.clone(),
            source,
        }
    })?;
    let would_change = source != converted;

    if args.check {
        if would_change {
            eprintln!("{label}: would convert");
        }
        return Ok(would_change);
    }

    if args.diff {
        print_diff(&label, &source, &converted).map_err(stdout_error)?;
    } else if let Some(path) = &args.file {
        if would_change {
            fs::write(path, &converted).map_err(|source| Error::Io {
                label: label.clone(),
                source,
            })?;
        }
    } else {
        io::stdout()
            .write_all(converted.as_bytes())
            .map_err(stdout_error)?;
    }

    Ok(false)
}

fn convert_source(
    command: Command,
    source: &str,
    args: &ConvertArgs,
    config: &Config,
) -> Result<String, ConvertError> {
    let offset = offset_at(source, args.line, args.column)?;
    let edits = command.run(source, offset, config)?;
    Ok(apply_edits(source, &edits))
}

fn print_diff(label: &str, before: &str, after: &str) -> io::Result<()> {
    let diff = TextDiff::from_lines(before, after);
    let mut out = io::stdout().lock();

    writeln!(out, "{}", format!("--- {label}").red())?;
    writeln!(out, "{}", format!("+++ {label}").green())?;
    for hunk in diff.unified_diff().iter_hunks() {
        writeln!(out, "{}", hunk.header().cyan())?;
        for change in hunk.iter_changes() {
            let text = change.value().trim_end_matches(['\r', '\n']);
            match change.tag() {
                ChangeTag::Delete => writeln!(out, "{}", format!("-{text}").red())?,
                ChangeTag::Insert => writeln!(out, "{}", format!("+{text}").green())?,
                ChangeTag::Equal => writeln!(out, " {text}")?,
            }
        }
    }

    Ok(())
}

fn targets(patterns: &[String], config: &Config) -> Result<bool, Error> {
    if patterns.is_empty() {
        let source = read_stdin()?;
        print!("{}", debug_targets(&source));
        return Ok(false);
    }

    let mut paths = Vec::new();
    for pattern in patterns {
        let before = paths.len();
        for entry in glob::glob(pattern)? {
            let path = entry?;
            if config.supports_path(&path) {
                paths.push(path);
            } else {
                log::debug!("skipping {}: language not supported", path.display());
            }
        }
        if paths.len() == before {
            log::warn!("pattern {pattern:?} matched no supported files");
        }
    }

    let reports: Vec<(&PathBuf, Result<String, Error>)> = paths
        .par_iter()
        .map(|path| (path, read_file(path).map(|source| debug_targets(&source))))
        .collect();

    let mut failed = 0;
    let mut out = io::stdout().lock();
    for (path, report) in reports {
        match report {
            Ok(report) => {
                writeln!(out, "{}", format!("==> {} <==", path.display()).bold())
                    .map_err(stdout_error)?;
                writeln!(out, "{report}").map_err(stdout_error)?;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red().bold());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(Error::Incomplete { failed });
    }
    Ok(false)
}

fn read_file(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        label: path.display().to_string(),
        source,
    })
}

fn stdout_error(source: io::Error) -> Error {
    Error::Io {
        label: "stdout".to_string(),
        source,
    }
}

fn read_stdin() -> Result<String, Error> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .map_err(|source| Error::Io {
            label: "stdin".to_string(),
            source,
        })?;
    Ok(source)
}

#[derive(Debug, Error)]
enum Error {
    #[error("{label}: {source}")]
    Io {
        label: String,
        #[source]
        source: io::Error,
    },

    #[error("{}: invalid configuration: {source}", path.display())]
    ConfigSyntax {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: invalid configuration: {source}", path.display())]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("{label}: {source}")]
    Convert {
        label: String,
        #[source]
        source: ConvertError,
    },

    #[error("{}: language not supported", .0.display())]
    UnsupportedLanguage(PathBuf),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    #[error("{failed} file(s) could not be read")]
    Incomplete { failed: usize },
}
