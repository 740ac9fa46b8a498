use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::parser::Parser;
use rox::scanner::{tokenize, Scanner};
use rox::session::{RunOutcome, Session};

const EXIT_USAGE: i32 = 64;
const EXIT_STATIC_ERROR: i32 = 65;

#[derive(ClapParser, Debug)]
#[command(version, about = "Rox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to rox.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print one JSON object per token instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Parses a program from a file and prints its syntax tree
    Parse { filename: PathBuf },

    /// Runs a program from a file, or starts a prompt when none is given
    Run { filename: Option<PathBuf> },
}

/// Reads a source file through a read-only memory map.
fn read_source(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    let len = file
        .metadata()
        .context(format!("Failed to stat file {:?}", filename))?
        .len();

    // Zero-length files cannot be mapped.
    if len == 0 {
        return Ok(String::new());
    }

    // SAFETY: the map is read-only and dropped before this function returns.
    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    // Validate in place; only the checked text is copied out.
    let source: String = std::str::from_utf8(&map)
        .context(format!("File {:?} is not valid UTF-8", filename))?
        .to_owned();

    info!("Read {} bytes from {:?}", source.len(), filename);

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("rox.log").context("Failed to create rox.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to rox.log");
    Ok(())
}

fn report(outcome: &RunOutcome) {
    for error in outcome.errors() {
        eprintln!("{}", error);
    }
}

fn run_tokenize(filename: &Path, json: bool) -> Result<i32> {
    let source = read_source(filename)?;
    let mut tokenized = true;

    for item in Scanner::new(&source) {
        match item {
            Ok(token) => {
                if json {
                    println!("{}", serde_json::to_string(&token)?);
                } else {
                    println!("{}", token);
                }
            }
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    Ok(if tokenized { 0 } else { EXIT_STATIC_ERROR })
}

fn run_parse(filename: &Path) -> Result<i32> {
    let source = read_source(filename)?;
    let (tokens, lex_errors) = tokenize(&source);

    for e in &lex_errors {
        eprintln!("{}", e);
    }

    match Parser::new(tokens).parse() {
        Ok(statements) if lex_errors.is_empty() => {
            let printer = AstPrinter;
            for stmt in &statements {
                println!("{}", printer.print_stmt(stmt));
            }
            Ok(0)
        }
        Ok(_) => Ok(EXIT_STATIC_ERROR),
        Err(errors) => {
            for e in &errors {
                eprintln!("{}", e);
            }
            Ok(EXIT_STATIC_ERROR)
        }
    }
}

fn run_file(filename: &Path) -> Result<i32> {
    let source = read_source(filename)?;
    debug!("Provided input:\n{}", source);

    let mut session = Session::new();
    let outcome = session.run(&source);
    report(&outcome);

    info!("Run finished with status {}", outcome.exit_code());
    Ok(outcome.exit_code())
}

/// Interactive prompt: one line per program, shared globals, errors never
/// end the session.
fn run_prompt() -> Result<i32> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let outcome = session.run(&line);
        report(&outcome);
    }

    println!();
    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            eprint!("{}", e);
            std::process::exit(EXIT_USAGE);
        }
        Err(e) => e.exit(),
    };

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let status = match &args.commands {
        Commands::Tokenize { filename, json } => run_tokenize(filename, *json)?,
        Commands::Parse { filename } => run_parse(filename)?,
        Commands::Run {
            filename: Some(filename),
        } => run_file(filename)?,
        Commands::Run { filename: None } => run_prompt()?,
    };

    if status != 0 {
        std::process::exit(status);
    }

    Ok(())
}
