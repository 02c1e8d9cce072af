//! CLI probe for `chipnote_core`.
//!
//! # Responsibility
//! - Classify command-line tokens the way the chip input does.
//! - File them as one task, into SQLite with `--db <path>` or in memory.
//!
//! Set `CHIPNOTE_LOG_DIR` to an absolute directory to enable file logging.

use chipnote_core::{
    default_log_level, init_logging, ChipInputController, ControllerConfig, Key, MemoryTaskStore,
    MessageBus, SqliteTaskStore, SubmitOutcome, TaskForm, TaskStore,
};
use std::process::ExitCode;

const USAGE: &str = "usage: chipnote [--db <path>] <token>...";
const CLI_FORM_INPUT: &str = "chipnote-cli";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("CHIPNOTE_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut args = std::env::args().skip(1).collect::<Vec<_>>();
    let db_path = match args.iter().position(|arg| arg == "--db") {
        Some(index) if index + 1 < args.len() => {
            let path = args.remove(index + 1);
            args.remove(index);
            Some(path)
        }
        Some(_) => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
        None => None,
    };
    if args.is_empty() {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    match db_path {
        Some(path) => match SqliteTaskStore::open(&path) {
            Ok(store) => run(store, &args).await,
            Err(err) => {
                eprintln!("cannot open task database `{path}`: {err}");
                ExitCode::FAILURE
            }
        },
        None => run(MemoryTaskStore::new(), &args).await,
    }
}

async fn run<S: TaskStore>(store: S, tokens: &[String]) -> ExitCode {
    let mut controller =
        ChipInputController::new(store, MessageBus::new(), ControllerConfig::default());
    controller.init(u32::MAX).await;

    for token in tokens {
        controller.on_input(token.as_str());
        controller.on_key_down(Key::Enter, token);
    }
    for chip in controller.chip_views() {
        println!("{}\t{}\t{}", chip.category, chip.color, chip.value);
    }

    let mut form = TaskForm::new();
    form.set_input(CLI_FORM_INPUT);
    match controller.submit(&mut form).await {
        SubmitOutcome::Created(task) => match serde_json::to_string_pretty(&task) {
            Ok(json) => {
                println!("{json}");
                println!("stored tasks: {}", controller.tasks().len());
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("cannot render task: {err}");
                ExitCode::FAILURE
            }
        },
        SubmitOutcome::Failed(err) => {
            eprintln!("cannot create task: {err}");
            ExitCode::FAILURE
        }
        other => {
            eprintln!("task not created: {other:?}");
            ExitCode::FAILURE
        }
    }
}
