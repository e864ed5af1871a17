use std::{fs, path::PathBuf, process, rc::Rc, time::Instant};

use clap::{ArgAction, Parser};
use psic::{
    compiler::compiler::compile, display_error, errors::errors::Error, lexer::lexer::tokenize,
    parser::parser::parse, type_checker::type_checker::type_check,
};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "psic")]
#[command(about = "Compiles a PSI program to .NET IL")]
struct Args {
    /// Path to the source file to compile
    file: PathBuf,

    /// Where to write the IL, defaults to the source file with an `.il` extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop after type checking
    #[arg(long)]
    check: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let source = fs::read_to_string(&args.file).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", args.file.display(), e);
        process::exit(1);
    });

    let il = match run(&args, source.clone()) {
        Ok(Some(il)) => il,
        Ok(None) => return,
        Err(error) => {
            display_error(&error, &source);
            process::exit(1);
        }
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.file.with_extension("il"));
    if let Err(e) = fs::write(&output, il) {
        eprintln!("Error writing file '{}': {}", output.display(), e);
        process::exit(1);
    }

    info!(output = %output.display(), "wrote IL");
}

/// Runs every phase over `source`. Returns `None` when only checking.
fn run(args: &Args, source: String) -> Result<Option<String>, Error> {
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| args.file.display().to_string());

    let start = Instant::now();
    let tokens = tokenize(source, Some(file_name.clone()))?;
    info!(elapsed = ?start.elapsed(), tokens = tokens.len(), "tokenized");

    let parse_start = Instant::now();
    let mut program = parse(tokens, Rc::new(file_name))?;
    info!(elapsed = ?parse_start.elapsed(), "parsed");

    let type_check_start = Instant::now();
    type_check(&mut program)?;
    info!(elapsed = ?type_check_start.elapsed(), "type checked");

    if args.check {
        return Ok(None);
    }

    let compile_start = Instant::now();
    let il = compile(&program)?;
    info!(elapsed = ?compile_start.elapsed(), "generated IL");
    info!(elapsed = ?start.elapsed(), "total");

    Ok(Some(il))
}
