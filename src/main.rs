use std::io::stdout;
use std::path::PathBuf;
use std::{env, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use wisp::error::{self, Report, UsageError};
use wisp::wisp;

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".wisp_history"))
}

fn run_prompt() {
    let mut interpreter = wisp::new(Box::new(stdout()));
    let mut editor = DefaultEditor::new().expect("failed to initialize line editor");

    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                interpreter.run_line(&line);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error reading input: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

fn run_file(path: &str) {
    let mut interpreter = wisp::new(Box::new(stdout()));

    if let Err(err) = interpreter.run_file(path) {
        eprintln!("Could not read '{path}': {err}");
        process::exit(74);
    }

    if error::did_runtime_error() {
        process::exit(70);
    }
    if error::did_error() {
        process::exit(65);
    }
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => run_prompt(),
        2 => run_file(&args[1]),
        _ => {
            UsageError { message: "Usage: wisp [script]".to_string() }.report();
            process::exit(64);
        }
    }
}
