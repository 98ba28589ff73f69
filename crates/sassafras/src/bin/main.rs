use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use sassafras::{Charset, Config, Dialect, SourceFile};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum EmitFormat {
    Tree,
    Tokens,
    Errors,
}

#[derive(Parser, Debug)]
#[command(name = "sassafras")]
#[clap(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse stylesheets and print their trees, tokens or errors
    Parse {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Overrides the dialect taken from the file extension
        #[arg(long)]
        dialect: Option<Dialect>,

        /// Overrides charset detection
        #[arg(long)]
        charset: Option<Charset>,

        #[arg(long, value_enum, default_value_t = EmitFormat::Errors)]
        emit: EmitFormat,

        /// Path to sassafras.toml; searched from the working directory if omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the lines of a file that contain tab characters
    Lines { file: PathBuf },
}

struct Report {
    output: String,
    failed: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Command::Parse { files, dialect, charset, emit, config } => {
            let config = load_config(config.as_deref())?;
            let reports: Vec<Report> = files
                .par_iter()
                .map(|path| parse_file(path, dialect, charset, emit, &config))
                .collect();
            let mut failed = false;
            for report in reports {
                print!("{}", report.output);
                failed |= report.failed;
            }
            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Command::Lines { file } => {
            let source = SourceFile::load(&file, None, None)?;
            for (number, line) in source.lines().filter(|(_, line)| line.contains('\t')) {
                println!("{}:{number}: {line}", file.display());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path).with_context(|| format!("loading {}", path.display())),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(Config::discover(&cwd)?.unwrap_or_default())
        }
    }
}

fn parse_file(
    path: &Path,
    dialect: Option<Dialect>,
    charset: Option<Charset>,
    emit: EmitFormat,
    config: &Config,
) -> Report {
    let dialect = dialect.or_else(|| config.dialect_for(path));
    let source = match SourceFile::load(path, charset.or(config.charset), dialect) {
        Ok(source) => source,
        Err(error) => {
            return Report {
                output: format!("error: {error}\n"),
                failed: true,
            }
        }
    };
    let parse = source.parse();
    let mut output = String::new();
    match emit {
        EmitFormat::Tree => output.push_str(&parse.debug_tree()),
        EmitFormat::Tokens => {
            let (tokens, _) = sassafras::tokenize(source.text(), source.dialect());
            for token in &tokens {
                let _ = writeln!(output, "{} {:?} {:?}", token.position, token.kind, token.text);
            }
        }
        EmitFormat::Errors => {}
    }
    for error in parse.errors() {
        let _ = writeln!(output, "{}:{}: {}", path.display(), error.position(), error.message());
    }
    Report {
        output,
        failed: !parse.ok(),
    }
}
