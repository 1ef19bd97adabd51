use std::path::PathBuf;

use clap::{Parser, Subcommand};
use json_mapper::{Condition, JsonMapper, Value};
use tracing::Level;

/// Read, edit and query a JSON document with dot/bracket key paths.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON document (string), or a file path when --file is given.
    input: String,
    /// Treat INPUT as a path to a JSON file.
    #[arg(long)]
    file: bool,
    /// Indent output with two spaces.
    #[arg(long)]
    pretty: bool,
    /// Write the resulting document here instead of printing it.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Log to stderr (-v debug, -vv trace).
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value at PATH.
    Find { path: String },
    /// Set PATH to VALUE (parsed as JSON, otherwise taken as a string).
    Add { path: String, value: String },
    /// Delete the value at PATH.
    Remove { path: String },
    /// List leaf paths matching a JSON condition such as '{"gt": 2}'.
    Query {
        condition: String,
        /// Start the search at this path instead of the root.
        #[arg(long, default_value = "")]
        from: String,
    },
    /// Print the whole document.
    Print,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn render(value: &Value, pretty: bool) -> String {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.unwrap_or_default()
}

fn run(args: Args) -> json_mapper::errors::Result<()> {
    let mut mapper = if args.file {
        JsonMapper::from_file(&args.input)?
    } else {
        JsonMapper::from_json(&args.input)?
    };

    match args.command {
        Command::Find { path } => {
            println!("{}", render(mapper.find(&path)?, args.pretty));
            return Ok(());
        }
        Command::Query { condition, from } => {
            let condition: Condition = condition.parse()?;
            let paths = mapper.find_all_with_condition(&from, &condition)?;
            let listed = Value::Array(paths.into_iter().map(Value::from).collect());
            println!("{}", render(&listed, args.pretty));
            return Ok(());
        }
        Command::Add { path, value } => {
            let value = serde_json::from_str::<Value>(&value).unwrap_or(Value::String(value));
            mapper.add(&path, value)?;
        }
        Command::Remove { path } => {
            mapper.remove(&path)?;
        }
        Command::Print => {}
    }

    match args.output {
        Some(out) => mapper.write_file(out, args.pretty)?,
        None => println!("{}", render(mapper.root(), args.pretty)),
    }
    Ok(())
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
