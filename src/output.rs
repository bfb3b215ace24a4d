// ABOUTME: Output formatting for CLI feedback and the ResultSink seam.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes plus an in-memory recorder.

use serde::Serialize;
use std::error::Error as StdError;
use std::time::Instant;

use crate::deploy::Outcome;

/// Receives the narrative of a run and exactly one final outcome.
pub trait ResultSink {
    /// A step of the run worth telling the user about.
    fn progress(&mut self, message: &str);

    /// A fatal error, reported with its source chain.
    fn error(&mut self, error: &(dyn StdError + 'static));

    /// The final outcome. Called once per run.
    fn finish(&mut self, outcome: Outcome);
}

/// The error message followed by each of its sources.
pub fn error_chain(error: &(dyn StdError + 'static)) -> Vec<String> {
    let mut chain = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Instant,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: Instant::now(),
        }
    }

    fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Print a plain result line regardless of mode (used by `region`, `init`).
    pub fn result(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => emit(&JsonEvent::Result { message }),
        }
    }
}

impl ResultSink for Output {
    fn progress(&mut self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("{message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit(&JsonEvent::Progress { message }),
        }
    }

    fn error(&mut self, error: &(dyn StdError + 'static)) {
        let chain = error_chain(error);
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {}", chain[0]);
                for cause in &chain[1..] {
                    eprintln!("  caused by: {cause}");
                }
            }
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&JsonEvent::Error {
                    message: &chain[0],
                    causes: &chain[1..],
                }) {
                    eprintln!("{json}");
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        match self.mode {
            OutputMode::Normal => println!("{outcome} ({:.1}s)", self.elapsed_secs()),
            OutputMode::Quiet => println!("{outcome}"),
            OutputMode::Json => emit(&JsonEvent::Finish {
                outcome,
                duration_secs: self.elapsed_secs(),
            }),
        }
    }
}

fn emit(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Progress {
        message: &'a str,
    },
    Result {
        message: &'a str,
    },
    Error {
        message: &'a str,
        causes: &'a [String],
    },
    Finish {
        outcome: Outcome,
        duration_secs: f64,
    },
}

/// Collects the narrative in memory; useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    lines: Vec<String>,
    errors: Vec<Vec<String>>,
    outcomes: Vec<Outcome>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Each reported error as its message and source chain.
    pub fn errors(&self) -> &[Vec<String>] {
        &self.errors
    }

    /// Every outcome reported; a well-behaved run reports exactly one.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcomes.last().copied()
    }

    /// Whether any narrative line contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
            || self.errors.iter().flatten().any(|l| l.contains(needle))
    }
}

impl ResultSink for Recorder {
    fn progress(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }

    fn error(&mut self, error: &(dyn StdError + 'static)) {
        self.errors.push(error_chain(error));
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }
}
