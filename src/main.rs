//! Neugram front end - CLI

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use neugram::frontend::lexer::tokenize;
use neugram::frontend::parser::{self, printer};
use neugram::frontend::Compiler;
use neugram::util::config::load_project_config;
use neugram::util::diagnostic::{
    Diagnostic, DiagnosticEmitter, EmitterConfig, JsonEmitter, TextEmitter,
};
use neugram::util::logger::{self, LogLevel};
use neugram::{NAME, VERSION};
use serde::Serialize;
use tracing::debug;

/// Lexer, parser and type checker for Neugram source files
#[derive(Parser, Debug)]
#[command(name = "ng")]
#[command(author = "Neugram Team")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// When to color diagnostics
    #[arg(long, value_enum, default_value_t = Color::Auto, global = true)]
    color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Color {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tokens of a source file
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a source file and print the syntax tree
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Type check a source file and its native imports
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct TokenRow {
    line: u32,
    column: u16,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    literal: Option<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let project_dir = match &args.command {
        Commands::Tokens { file, .. } | Commands::Parse { file } | Commands::Check { file, .. } => {
            file.parent().map(Path::to_path_buf).unwrap_or_default()
        }
    };
    let dir = if project_dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        project_dir
    };
    let config = load_project_config(&dir).context("Failed to load ng.toml")?;
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        logger::level_from_env().unwrap_or(config.log_level)
    };
    logger::init_with_level(level);
    debug!("{} {}", NAME, VERSION);

    let use_colors = match args.color {
        Color::Always => true,
        Color::Never => false,
        Color::Auto => std::io::stderr().is_terminal(),
    };

    match args.command {
        Commands::Tokens { file, json } => {
            let source = read_source(&file)?;
            let filename = file.display().to_string();
            let (tokens, errors) = tokenize(&filename, &source);
            let rows: Vec<TokenRow> = tokens
                .iter()
                .map(|t| TokenRow {
                    line: t.pos.line,
                    column: t.pos.column,
                    kind: t.kind.to_string(),
                    literal: t.literal.as_ref().map(ToString::to_string),
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in &rows {
                    match &row.literal {
                        Some(lit) => println!("{}:{}\t{}\t{}", row.line, row.column, row.kind, lit),
                        None => println!("{}:{}\t{}", row.line, row.column, row.kind),
                    }
                }
            }
            Ok(report(&errors, &source, false, use_colors))
        }
        Commands::Parse { file } => {
            let source = read_source(&file)?;
            let (ast, errors) = parser::parse(&file.display().to_string(), &source);
            print!("{}", printer::print_file(&ast));
            Ok(report(&errors, &source, false, use_colors))
        }
        Commands::Check { file, json } => {
            let source = read_source(&file)?;
            let mut compiler = Compiler::new().with_config(config);
            match compiler.check_file(&file) {
                Ok(_) => {
                    if json {
                        println!("[]");
                    } else {
                        eprintln!("{}: ok", file.display());
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => Ok(report(&err.errors().diagnostics, &source, json, use_colors)),
            }
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Print diagnostics; failure when there are any
fn report(
    diagnostics: &[Diagnostic],
    source: &str,
    json: bool,
    use_colors: bool,
) -> ExitCode {
    if json {
        println!("{}", JsonEmitter::pretty().emit(diagnostics));
    } else if !diagnostics.is_empty() {
        let emitter = TextEmitter::with_config(EmitterConfig {
            use_colors,
            ..EmitterConfig::default()
        })
        .with_source(source);
        eprint!("{}", emitter.emit(diagnostics));
    }
    if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
