use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use codedoc::config::Settings;
use codedoc::{
    clean_content, export, extract_code_blocks, parse_line_numbers, render_numbered,
    select_lines, ExportFormat,
};

#[derive(Parser)]
#[command(name = "codedoc", about = "Clean docs, pick code lines, export notes")]
struct Cli {
    /// Settings file (default: ./codedoc.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert HTML or pasted docs to plain text with fenced code
    Clean {
        /// Input file ("-" or omitted for stdin)
        file: Option<PathBuf>,
    },
    /// Print selected lines of a code snippet, e.g. --range "1-3, 5"
    Lines {
        #[arg(short, long)]
        range: String,
        /// Language tag for the fenced output
        #[arg(short, long)]
        language: Option<String>,
        file: Option<PathBuf>,
    },
    /// List fenced code blocks found in a Markdown response
    Blocks {
        file: Option<PathBuf>,
        /// Emit JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Export notes as markdown, pdf, html or docx
    Export {
        #[arg(short, long)]
        format: String,
        /// Output path (default: notes.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
        file: Option<PathBuf>,
    },
    /// List supported export formats
    Formats,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    info!(settings = ?settings, "settings loaded");

    match cli.command {
        Commands::Clean { file } => {
            let content = read_input(file.as_deref())?;
            println!("{}", clean_content(&content));
        }
        Commands::Lines {
            range,
            language,
            file,
        } => {
            if let Some(lang) = language.as_deref() {
                if !settings.supports_language(lang) {
                    bail!(
                        "Unsupported language {:?} (supported: {})",
                        lang,
                        settings.supported_languages.join(", ")
                    );
                }
            }
            let code = read_input(file.as_deref())?;
            if code.len() > settings.max_code_length {
                bail!(
                    "Code is {} bytes, over the {} byte limit",
                    code.len(),
                    settings.max_code_length
                );
            }
            let numbers = parse_line_numbers(&range)?;
            let selected = select_lines(&code, &numbers);
            info!(requested = numbers.len(), found = selected.len(), "lines selected");
            println!("{}", render_numbered(&selected, language.as_deref()));
        }
        Commands::Blocks { file, json } => {
            let content = read_input(file.as_deref())?;
            let blocks = extract_code_blocks(&content);
            if json {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
            } else {
                for (i, b) in blocks.iter().enumerate() {
                    println!("{:>3} | {:<12} | {} lines", i + 1, b.language, b.code.lines().count());
                }
                println!("\n{} code blocks", blocks.len());
            }
        }
        Commands::Export {
            format,
            output,
            file,
        } => {
            let format: ExportFormat = format.parse()?;
            let notes = read_input(file.as_deref())?;
            let payload = export(&notes, format)?;
            let path = output.unwrap_or_else(|| PathBuf::from(payload.file_name()));
            std::fs::write(&path, &payload.bytes)
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!(format = %format, bytes = payload.bytes.len(), "export written");
            println!("Wrote {} ({}, {} bytes)", path.display(), format.mime_type(), payload.bytes.len());
        }
        Commands::Formats => {
            for format in ExportFormat::ALL {
                println!("{:<9} .{:<5} {}", format.tag(), format.extension(), format.mime_type());
            }
        }
    }

    Ok(())
}

/// Read a file, or stdin when the path is missing or "-".
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("Failed to read {:?}", p))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
