//! sheetpeek CLI - Excel workbook previewer
//!
//! Prints the name and first rows of every sheet in a workbook.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use sheetpeek::render::{JsonFormat, OutputFormat, RenderOptions};
use sheetpeek::{PreviewConfig, SheetState, DEFAULT_PREVIEW_ROWS};
use std::io::{self, Write};
use std::path::PathBuf;

/// Preview the sheets of an Excel workbook
#[derive(Parser)]
#[command(
    name = "sheetpeek",
    author = "iyulab",
    version,
    about = "Preview the sheets of an Excel workbook",
    long_about = "sheetpeek - Quick look at Excel workbooks.\n\n\
                  Prints every sheet name followed by its first rows, laid out like a \
                  pandas DataFrame."
)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first rows of every sheet
    #[command(visible_alias = "head")]
    Preview {
        /// Workbook path (a leading ~ is expanded)
        input: PathBuf,

        /// Data rows shown per sheet
        #[arg(short = 'n', long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,

        /// Output JSON instead of text tables
        #[arg(long)]
        json: bool,

        /// Output compact JSON (no indentation)
        #[arg(long, requires = "json")]
        compact: bool,

        /// Print text exactly as stored, without NFC normalization
        #[arg(long)]
        no_normalize: bool,
    },

    /// List sheet names in workbook order
    Sheets {
        /// Workbook path
        input: PathBuf,
    },

    /// Show workbook information and metadata
    Info {
        /// Workbook path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Preview {
            input,
            rows,
            json,
            compact,
            no_normalize,
        } => {
            let format = match (json, compact) {
                (false, _) => OutputFormat::Text,
                (true, true) => OutputFormat::Json(JsonFormat::Compact),
                (true, false) => OutputFormat::Json(JsonFormat::Pretty),
            };
            let config = PreviewConfig::new(input).with_rows(rows).with_render_options(
                RenderOptions::new()
                    .with_format(format)
                    .with_normalize_text(!no_normalize),
            );

            let pb = create_spinner("Reading workbook...");
            let previews = sheetpeek::load_previews(&config);
            pb.finish_and_clear();

            let output = sheetpeek::render::render(&previews?, &config.render)?;
            write_output(&output)?;
        }

        Commands::Sheets { input } => {
            let workbook = sheetpeek::open_workbook(&input)?;

            let mut out = String::new();
            for info in workbook.sheet_infos() {
                out.push_str(&info.name);
                match info.state {
                    SheetState::Visible => {}
                    SheetState::Hidden => out.push_str(&format!(" {}", "(hidden)".dimmed())),
                    SheetState::VeryHidden => {
                        out.push_str(&format!(" {}", "(very hidden)".dimmed()))
                    }
                }
                out.push('\n');
            }
            write_output(&out)?;
        }

        Commands::Info { input } => {
            let path = sheetpeek::path::resolve_home(&input)?;

            let pb = create_spinner("Analyzing workbook...");
            let opened = sheetpeek::detect_format_from_path(&path)
                .and_then(|format| Ok((format, sheetpeek::Workbook::open(&path)?)));
            pb.finish_and_clear();
            let (format, workbook) = opened?;
            let metadata = workbook.metadata();

            println!("{}", "Workbook Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), format);
            println!("{}: {}", "Sheets".bold(), workbook.sheet_count());
            if workbook.is_1904() {
                println!("{}: 1904", "Date System".bold());
            }

            if let Some(ref title) = metadata.title {
                println!("{}: {}", "Title".bold(), title);
            }
            if let Some(ref author) = metadata.author {
                println!("{}: {}", "Author".bold(), author);
            }
            if let Some(ref editor) = metadata.last_modified_by {
                println!("{}: {}", "Last Modified By".bold(), editor);
            }
            if let Some(ref created) = metadata.created {
                println!("{}: {}", "Created".bold(), created);
            }
            if let Some(ref modified) = metadata.modified {
                println!("{}: {}", "Modified".bold(), modified);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "sheetpeek".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Preview the first rows of every sheet in an Excel workbook");
    println!();
    println!("Supported formats: XLSX, XLSM");
    println!("Repository: https://github.com/iyulab/sheetpeek");
}

/// Spinner on stderr; indicatif hides it when stderr is not a terminal.
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(content: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(content.as_bytes())?;
    handle.flush()
}
