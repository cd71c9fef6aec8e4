//! untex CLI - TeX/LaTeX paragraph extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use untex::{JsonFormat, Untex};

#[derive(Parser)]
#[command(name = "untex")]
#[command(version)]
#[command(about = "Identify the logical paragraphs of TeX documents", long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print paragraphs as tab-separated provenance lines
    Text {
        /// Input TeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Skip macro resolution
        #[arg(long)]
        keep_macros: bool,
    },

    /// Print paragraphs as JSON
    Json {
        /// Input TeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Skip macro resolution
        #[arg(long)]
        keep_macros: bool,
    },

    /// Print the source line numbers of each paragraph
    Lines {
        /// Input TeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Skip macro resolution
        #[arg(long)]
        keep_macros: bool,
    },

    /// Resolve user-defined macros and print the result
    Resolve {
        /// Input TeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Text {
            input,
            output,
            keep_macros,
        } => {
            let mut result = identifier(keep_macros).identify(&input)?;
            write_output(output.as_deref(), &result.to_text())
        }
        Commands::Json {
            input,
            output,
            compact,
            keep_macros,
        } => {
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let mut result = identifier(keep_macros).identify(&input)?;
            let mut json = result.to_json(format)?;
            json.push('\n');
            write_output(output.as_deref(), &json)
        }
        Commands::Lines { input, keep_macros } => {
            let result = identifier(keep_macros).identify(&input)?;
            let mut paragraphs = result.into_paragraphs();
            for paragraph in &mut paragraphs {
                let lines: Vec<String> = paragraph
                    .tex_line_numbers()
                    .iter()
                    .map(u32::to_string)
                    .collect();
                println!(
                    "{}\t{}",
                    paragraph.feature().unwrap_or("text"),
                    lines.join(",")
                );
            }
            Ok(())
        }
        Commands::Resolve { input, output } => {
            let source = fs::read_to_string(&input)?;
            let resolved = untex::resolve_macros(&source)?;
            write_output(output.as_deref(), &resolved)
        }
    }
}

fn identifier(keep_macros: bool) -> Untex {
    let untex = Untex::new();
    if keep_macros {
        untex.keep_macros()
    } else {
        untex
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("writing {} bytes", content.len());
    match output {
        Some(path) => {
            fs::write(path, content)?;
            println!("{} {}", "Wrote".green(), path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
