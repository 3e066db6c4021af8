//! Human-readable progress output

use colored::Colorize;

use crate::deploy::fsm::RefreshState;
use crate::deploy::progress::ProgressSink;
use crate::errors::RefreshError;
use crate::models::outcome::{ContentSource, RunSummary, UpdateOutcome};
use crate::models::stack::StackSummary;

const RULE: &str = "--------------------------------------------------";

/// Prints one line per stack transition and a final summary to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    /// Print the banner shown before anything else
    pub fn header(&self, version: &str) {
        println!("{}", format!("=== Portainer Stack Refresher v{}", version).cyan().bold());
        println!("{}", RULE);
    }

    /// Print an error that aborted the run
    pub fn fatal(&self, err: &RefreshError) {
        eprintln!("{} {}", "[ERROR]  ".red(), err);
        if let RefreshError::AuthError(_) = err {
            eprintln!("{} Check the username/password or access token", "[ERROR]  ".red());
        }
    }
}

impl ProgressSink for ConsoleReporter {
    fn batch_started(&self, total: usize) {
        if total == 0 {
            println!("{} No stacks matched; nothing to refresh", "[INFO]   ".blue());
        } else {
            println!("{}", format!("--- Found {} stacks to refresh", total).yellow().bold());
        }
    }

    fn stack_started(&self, index: usize, total: usize, stack: &StackSummary) {
        println!(
            "{} {} (ID: {}, endpoint: {}, {})",
            format!("[{}/{}]", index + 1, total).cyan().bold(),
            stack.name.bold(),
            stack.id,
            stack.endpoint_id,
            stack.kind
        );
    }

    fn stack_transition(&self, _stack: &StackSummary, state: RefreshState) {
        let line = match state {
            RefreshState::Fetching => "fetching stack definition",
            RefreshState::Building => "building update request",
            RefreshState::Submitting => "re-pulling images and redeploying",
            RefreshState::Pending | RefreshState::Recorded => return,
        };
        println!("      {}", line.dimmed());
    }

    fn stack_warning(&self, _stack: &StackSummary, message: &str) {
        println!("      {} {}", "[WARNING]".yellow(), message);
    }

    fn stack_finished(&self, _index: usize, _total: usize, outcome: &UpdateOutcome) {
        let elapsed = format!("{:.1}s", outcome.elapsed.as_secs_f64());
        if outcome.success {
            let note = match outcome.content_source {
                Some(ContentSource::Fallback) => " (content from stack file)",
                Some(ContentSource::Missing) => " (without content)",
                _ => "",
            };
            println!(
                "      {} {} refreshed in {}{}",
                "[SUCCESS]".green(),
                outcome.stack_name.bold(),
                elapsed,
                note
            );
        } else {
            let reason = outcome
                .error
                .as_ref()
                .map(|e| e.message.as_str())
                .unwrap_or("unknown error");
            println!(
                "      {} {} failed after {}: {}",
                "[ERROR]".red(),
                outcome.stack_name.bold(),
                elapsed,
                reason
            );
        }
    }

    fn batch_finished(&self, summary: &RunSummary) {
        println!("{}", RULE);
        println!("{}", "=== Refresh summary".cyan().bold());
        println!("{} Stacks refreshed: {}", "[SUCCESS]".green(), summary.succeeded);
        if summary.has_failures() {
            println!("{} Stacks failed:    {}", "[ERROR]  ".red(), summary.failed);
            for outcome in summary.outcomes.iter().filter(|o| !o.success) {
                println!("          - {} (ID: {})", outcome.stack_name, outcome.stack_id);
            }
        } else {
            println!("{} Stacks failed:    {}", "[INFO]   ".blue(), summary.failed);
        }
        println!("{}", RULE);
    }
}
