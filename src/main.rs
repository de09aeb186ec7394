use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use computor::config::DEFAULT_MAX_DEPTH;
use computor::parse::{DisplayPostfix, to_postfix};
use computor::{Config, EvalError, Lexer, Outcome, Session};
use miette::{IntoDiagnostic, NamedSource, WrapErr};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(version, about = "An interactive calculator")]
struct Args {
    /// Evaluate function bodies once, when they are defined, ignoring the
    /// argument on every call.
    #[arg(long, global = true)]
    eager_functions: bool,

    /// How deep function calls and matrix literals may nest.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the tokens of an expression.
    Tokenize { expression: String },
    /// Print an expression in postfix order.
    Postfix { expression: String },
    /// Run a single statement.
    Eval { statement: String },
    /// Run every line of a file in one session.
    Run { filename: PathBuf },
}

fn report(error: EvalError, name: &str, source: &str) -> miette::Report {
    miette::Report::new(error).with_source_code(NamedSource::new(name, source.to_string()))
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    // RUST_LOG controls the level, warn by default
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = Config::default()
        .eager(args.eager_functions)
        .max_depth(args.max_depth);

    match args.command {
        Some(Commands::Tokenize { expression }) => {
            for token in Lexer::new(&expression) {
                let token = token.map_err(|e| report(e, "<expression>", &expression))?;
                println!("{token}");
            }
        }
        Some(Commands::Postfix { expression }) => {
            let postfix = to_postfix(Lexer::new(&expression))
                .map_err(|e| report(e, "<expression>", &expression))?;
            println!("{}", DisplayPostfix(&postfix));
        }
        Some(Commands::Eval { statement }) => {
            let mut session = Session::new(config);
            let outcome = session
                .execute(&statement)
                .map_err(|e| report(e, "<statement>", &statement))?;
            if outcome != Outcome::Quit {
                println!("{outcome}");
            }
        }
        Some(Commands::Run { filename }) => {
            let file_contents = fs::read_to_string(&filename)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading `{}` failed", filename.display()))?;
            let name = filename.display().to_string();

            let mut session = Session::new(config);
            let mut failed = false;
            for line in file_contents.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                match session.execute(line) {
                    Ok(Outcome::Quit) => break,
                    Ok(outcome) => println!("{outcome}"),
                    Err(e) => {
                        eprintln!("{:?}", report(e, &name, line));
                        failed = true;
                    }
                }
            }
            if failed {
                std::process::exit(65);
            }
        }
        None => repl(config)?,
    }
    Ok(())
}

fn repl(config: Config) -> miette::Result<()> {
    let mut session = Session::new(config);
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().into_diagnostic()?;

        line.clear();
        if stdin.read_line(&mut line).into_diagnostic()? == 0 {
            println!();
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        match session.execute(&line) {
            Ok(Outcome::Quit) => return Ok(()),
            Ok(outcome) => println!("{outcome}"),
            Err(e) => eprintln!("{:?}", report(e, "<stdin>", line.trim_end())),
        }
    }
}
