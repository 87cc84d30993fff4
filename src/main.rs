//! Jarvis CLI - natural-language desktop automation
//!
//! Usage:
//!   jarvis                              Interactive prompt
//!   jarvis -i "play music on spotify"   Run one instruction
//!   jarvis -i "search web" --dry-run    Print the plan only

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::AsyncBufReadExt;

use jarvis_lib::agent_engine::engine::ExecutionEngine;
use jarvis_lib::agent_engine::state::ExecutionEvent;
use jarvis_lib::config::{load_config, load_config_from, AppConfig};
use jarvis_lib::errors::ExecutionError;

#[derive(Parser)]
#[command(name = "jarvis")]
#[command(author, version, about = "Natural-language desktop automation")]
struct Cli {
    /// config.toml to use (default: next to the executable, then the working directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run a single instruction and exit
    #[arg(short, long)]
    instruction: Option<String>,

    /// Print the generated plan without executing anything
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    jarvis_lib::init_tracing(if cli.verbose { "debug" } else { "info" });

    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    let config = match &cli.config {
        Some(path) => match load_config_from(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("failed to load {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => load_config().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            AppConfig::default()
        }),
    };

    let engine = match jarvis_lib::build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(instruction) = &cli.instruction {
        return match run_once(&engine, instruction, cli.dry_run).await {
            true => ExitCode::SUCCESS,
            false => ExitCode::FAILURE,
        };
    }

    interactive(&engine, cli.dry_run).await;
    ExitCode::SUCCESS
}

async fn interactive(engine: &ExecutionEngine, dry_run: bool) {
    println!("Jarvis ready. Type an instruction, or 'quit' to exit.");
    let library = engine.planner().library();
    if !library.is_empty() {
        let phrases: Vec<&str> = library.phrases().collect();
        println!("Stock workflows: {}", phrases.join(", "));
    }
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("jarvis> ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };

        let instruction = line.trim();
        match instruction.to_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" | "q" => break,
            _ => {
                run_once(engine, instruction, dry_run).await;
            }
        }
    }
    println!("bye");
}

async fn run_once(engine: &ExecutionEngine, instruction: &str, dry_run: bool) -> bool {
    if dry_run {
        let (plan, source) = engine.plan(instruction).await;
        if plan.is_empty() {
            println!("✗ no plan for \"{instruction}\"");
            return false;
        }
        println!("plan from {source:?} ({} steps):", plan.len());
        for (i, step) in plan.iter().enumerate() {
            println!("  {}. {}", i + 1, step.summary());
        }
        return true;
    }

    let mut events = engine.events().subscribe();
    let run = engine.execute_instruction(instruction);
    tokio::pin!(run);

    let result: Result<(), ExecutionError> = loop {
        tokio::select! {
            res = &mut run => break res,
            Ok(event) = events.recv() => print_event(&event),
        }
    };
    while let Ok(event) = events.try_recv() {
        print_event(&event);
    }

    match &result {
        Ok(()) => println!("✓ done"),
        Err(e) => println!("✗ {e}"),
    }
    result.is_ok()
}

fn print_event(event: &ExecutionEvent) {
    match event {
        ExecutionEvent::PlanReady { source, steps } if !steps.is_empty() => {
            println!("plan from {source:?} ({} steps)", steps.len());
        }
        ExecutionEvent::StepStarted { index, summary, .. } => {
            println!("  [{}] {summary}", index + 1);
        }
        ExecutionEvent::StepDone { index } => println!("  ✓ step {}", index + 1),
        ExecutionEvent::StepFailed { index, reason } => {
            println!("  ✗ step {}: {reason}", index + 1)
        }
        _ => {}
    }
}
