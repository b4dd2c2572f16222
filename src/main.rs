// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};

use tmxalign::app_config::{self, Config};
use tmxalign::{Controller, Severity};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for tmxalign
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// tmxalign - bilingual localization files to TMX
///
/// Pairs per-language JSON resource files and aligns their values into
/// TMX 1.4 translation memories.
#[derive(Parser, Debug)]
#[command(name = "tmxalign")]
#[command(version)]
#[command(about = "Align localization files into TMX translation memories")]
#[command(long_about = "tmxalign groups per-language JSON resource files, aligns their values by key path and writes one TMX file per language pair.

EXAMPLES:
    tmxalign locales/                          # Align every pair under locales/
    tmxalign -o memories/ locales/             # Write TMX files into memories/
    tmxalign --segment locales/                # Split values into sentences
    tmxalign -s en-GB locales/                 # Prefer en-GB as source language
    tmxalign --combine locales/                # One file per language pair
    tmxalign --preview locales/                # Show the first records of each file
    tmxalign completions bash > tmxalign.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in tmxalign.json by default. You can specify a
    different config file with --config. If the config file doesn't exist, a
    default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing the localization files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Output directory (defaults to the input directory)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Split values into sentence-level records
    #[arg(long)]
    segment: bool,

    /// Preferred source language code (e.g., 'en', 'en-GB', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Merge pairs sharing source and target language into one file
    #[arg(long)]
    combine: bool,

    /// Prefix of the generated file names
    #[arg(long)]
    prefix: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "tmxalign.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Print the first records of each memory in {1}...{/1} notation
    #[arg(long)]
    preview: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The level is lowered or raised once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "tmxalign", &mut std::io::stdout());
            Ok(())
        }
        None => run_align(cli),
    }
}

fn run_align(options: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_dir = options.input_dir.clone().ok_or_else(|| {
        anyhow!("INPUT_DIR is required when no subcommand is specified")
    })?;

    let config = load_config(&options)?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let output_dir = options.output.clone().unwrap_or_else(|| input_dir.clone());
    let controller = Controller::with_config(config)?;
    let output = controller.run_folder(&input_dir, &output_dir, options.force_overwrite)?;

    for diagnostic in &output.diagnostics {
        match diagnostic.severity() {
            Severity::Error => error!("{}", diagnostic),
            Severity::Warning => warn!("{}", diagnostic),
        }
    }

    if options.preview {
        for file in &output.files {
            println!("== {} ({} -> {})", file.file_name, file.source_language, file.target_language);
            for (i, line) in controller.preview(file, 5).iter().enumerate() {
                let marker = if i % 2 == 0 { file.source_language.as_str() } else { file.target_language.as_str() };
                println!("  [{}] {}", marker, line);
            }
        }
    }

    let records: usize = output.files.iter().map(|f| f.record_count).sum();
    info!(
        "Finished: {} file(s), {} record(s), {} warning(s), {} error(s)",
        output.files.len(),
        records,
        output.diagnostics.len() - output.error_count(),
        output.error_count()
    );

    Ok(())
}

fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Command line options override the file
    if options.segment {
        config.alignment.segmentation = true;
    }
    if options.combine {
        config.alignment.combine_by_target_language = true;
    }
    if let Some(source_lang) = &options.source_language {
        config.alignment.preferred_source_language = Some(source_lang.clone());
    }
    if let Some(prefix) = &options.prefix {
        config.output.file_prefix = prefix.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
