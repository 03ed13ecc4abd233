//! `remap` — evaluate a remapper against JSON read from stdin.
//!
//! Usage:
//!   remap <remapper-file> [context-file]
//!
//! The remapper file may be YAML or JSON. The optional context file is a
//! `ContextConfig` document. The result is printed as pretty JSON.

use remapper::{evaluate, Context, ContextConfig, Remapper, Value};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::error;

fn fail(message: impl std::fmt::Display) -> ! {
    error!("{message}");
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let remapper_path = match args.get(1) {
        Some(p) => p.clone(),
        None => fail("First argument must be a remapper file."),
    };

    let source = std::fs::read_to_string(&remapper_path).unwrap_or_else(|e| fail(format!("{remapper_path}: {e}")));
    let remapper: Remapper = if remapper_path.ends_with(".json") {
        serde_json::from_str(&source).unwrap_or_else(|e| fail(e))
    } else {
        serde_yaml::from_str(&source).unwrap_or_else(|e| fail(e))
    };

    let context = match args.get(2) {
        Some(path) => Context::from(ContextConfig::load(Path::new(path)).unwrap_or_else(|e| fail(e))),
        None => Context::default(),
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        fail(e);
    }
    let input = if buf.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str::<serde_json::Value>(&buf)
            .map(Value::from)
            .unwrap_or_else(|e| fail(e))
    };

    match evaluate(&remapper, &input, &context) {
        Ok(result) => {
            let text = serde_json::to_string_pretty(&result.into_json()).unwrap_or_else(|e| fail(e));
            if let Err(e) = writeln!(io::stdout(), "{text}") {
                fail(e);
            }
        }
        Err(e) => fail(format!("{e} (in {})", e.remapper())),
    }
}
