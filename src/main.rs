// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::app_config::Config;
use crate::pipeline::{BackendSelection, Controller, RunOptions};

mod app_config;
mod backends;
mod document;
mod errors;
mod events;
mod file_utils;
mod ocr;
mod orchestrator;
mod pipeline;
mod rate_governor;
mod segmenter;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// OCR a Tamil PDF and optionally translate it (default command)
    Process(ProcessArgs),

    /// Generate shell completions for tamil-pdf-ocr
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input PDF file path
    #[arg(value_name = "PDF_FILE")]
    pdf_file: PathBuf,

    /// Output text file path (optional)
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: Option<PathBuf>,

    /// Start page number (1-indexed)
    #[arg(long)]
    start: Option<u32>,

    /// End page number (1-indexed)
    #[arg(long)]
    end: Option<u32>,

    /// Translate Tamil text to English
    #[arg(short, long)]
    translate: bool,

    /// Use the Google Cloud Translation API (default with --translate)
    #[arg(long, group = "backend")]
    cloud: bool,

    /// Use the Gemini LLM API
    #[arg(long, group = "backend")]
    llm: bool,

    /// Use local translation engines (Argos, local MarianMT, LibreTranslate)
    #[arg(long, group = "backend")]
    local: bool,

    /// Model name for the Gemini backend
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// tamil-pdf-ocr - Tamil PDF OCR with optional English translation
///
/// Converts scanned Tamil PDFs to Unicode text via OCR and optionally
/// translates the result to English with one of several backends.
#[derive(Parser, Debug)]
#[command(name = "tamil-pdf-ocr")]
#[command(version = "1.0.0")]
#[command(about = "OCR Tamil PDF to Unicode text with optional English translation")]
#[command(long_about = "tamil-pdf-ocr rasterizes a Tamil PDF, extracts Unicode text with \
Tesseract, and can translate the result to English.

EXAMPLES:
    tamil-pdf-ocr book.pdf                          # OCR only (Tamil Unicode)
    tamil-pdf-ocr book.pdf --translate              # OCR + cloud translation
    tamil-pdf-ocr book.pdf --translate --llm        # OCR + Gemini translation
    tamil-pdf-ocr book.pdf --translate --local      # OCR + local/offline translation
    tamil-pdf-ocr book.pdf --start 1 --end 5 -t     # Process specific pages
    tamil-pdf-ocr book.pdf output.txt -t --local    # Custom output file
    tamil-pdf-ocr completions bash > tpo.bash       # Generate bash completions

REQUIREMENTS:
    OCR needs poppler-utils (pdftoppm) and tesseract with the Tamil
    language pack installed.

    cloud  - Google Cloud Translation API (GOOGLE_TRANSLATE_API_KEY)
    llm    - Gemini API (GEMINI_API_KEY); whole-document or chunked mode
    local  - argos-translate CLI, a locally served MarianMT model, or a
             LibreTranslate instance; the first available engine wins")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input PDF file path
    #[arg(value_name = "PDF_FILE")]
    pdf_file: Option<PathBuf>,

    /// Output text file path (optional)
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: Option<PathBuf>,

    /// Start page number (1-indexed)
    #[arg(long)]
    start: Option<u32>,

    /// End page number (1-indexed)
    #[arg(long)]
    end: Option<u32>,

    /// Translate Tamil text to English
    #[arg(short, long)]
    translate: bool,

    /// Use the Google Cloud Translation API (default with --translate)
    #[arg(long, group = "backend")]
    cloud: bool,

    /// Use the Gemini LLM API
    #[arg(long, group = "backend")]
    llm: bool,

    /// Use local translation engines (Argos, local MarianMT, LibreTranslate)
    #[arg(long, group = "backend")]
    local: bool,

    /// Model name for the Gemini backend
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default;
    // the level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "tamil-pdf-ocr", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Process(args)) => run_process(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let pdf_file = cli
                .pdf_file
                .ok_or_else(|| anyhow!("PDF_FILE is required when no subcommand is specified"))?;

            let args = ProcessArgs {
                pdf_file,
                output_file: cli.output_file,
                start: cli.start,
                end: cli.end,
                translate: cli.translate,
                cloud: cli.cloud,
                llm: cli.llm,
                local: cli.local,
                model: cli.model,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_process(args).await
        }
    }
}

async fn run_process(args: ProcessArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &args.log_level {
        let config_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_level));
    }

    if (args.cloud || args.llm || args.local) && !args.translate {
        return Err(anyhow!(
            "Backend selection flags require --translate"
        ));
    }

    let mut config = Config::load(Some(args.config_path.as_ref()))
        .context("Failed to load configuration")?;

    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if args.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let backend = if args.local {
        BackendSelection::Local
    } else if args.llm {
        BackendSelection::Llm
    } else {
        BackendSelection::Cloud
    };

    let options = RunOptions {
        pdf_path: args.pdf_file,
        output_path: args.output_file,
        start_page: args.start,
        end_page: args.end,
        translate: args.translate,
        backend,
    };

    let controller = Controller::with_config(config);
    match controller.run(&options).await {
        Ok(report) => {
            info!("Processing completed successfully!");
            if let Some(english) = &report.english_path {
                info!(
                    "Tamil PDF -> English translation ({}) saved to: {}",
                    backend,
                    english.display()
                );
            } else {
                info!("Tamil Unicode text saved to: {}", report.tamil_path.display());
            }
            Ok(())
        }
        Err(e) => {
            // One clear diagnostic line, then a non-zero exit
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
