use clap::Parser;
use serde_json::Value;

use dotcall::binder::ArgumentBag;
use dotcall::object::Object;
use dotcall::{Dispatcher, CONTEXT_KEY, SPREAD_KEY};

/// Dispatch a call to a dotted-path name with JSON arguments.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Dotted-path name of the callable, e.g. `max` or `math.exp`
    name: String,
    /// Keyword arguments as a JSON object
    #[arg(long)]
    args: Option<String>,
    /// Positional arguments as a JSON array (or a single JSON value)
    #[arg(long)]
    spread: Option<String>,
    /// Resolution context as a JSON object
    #[arg(long)]
    context: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Args::parse();

    let mut bag = ArgumentBag::new();
    if let Some(raw) = cli.args.as_deref() {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => {
                for (key, value) in map {
                    bag.insert(key, Object::Data(value));
                }
            }
            Ok(_) => {
                eprintln!("--args must be a JSON object");
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Invalid JSON in --args: {e}");
                std::process::exit(1);
            }
        }
    }
    if let Some(raw) = cli.spread.as_deref() {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => {
                bag.insert(SPREAD_KEY.to_string(), Object::Data(value));
            }
            Err(e) => {
                eprintln!("Invalid JSON in --spread: {e}");
                std::process::exit(1);
            }
        }
    }
    if let Some(raw) = cli.context.as_deref() {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => {
                bag.insert(CONTEXT_KEY.to_string(), Object::Data(value));
            }
            Ok(_) => {
                eprintln!("--context must be a JSON object");
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Invalid JSON in --context: {e}");
                std::process::exit(1);
            }
        }
    }

    let dispatcher = Dispatcher::with_builtins();
    match dispatcher.call(&cli.name, bag) {
        Ok(Object::Data(value)) => match serde_json::to_string_pretty(&value) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("Failed to render result: {e}");
                std::process::exit(1);
            }
        },
        Ok(other) => println!("{other:?}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
