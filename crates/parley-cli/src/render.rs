//! Terminal rendering of messages and history.

use chrono::{Local, NaiveDate};
use colored::Colorize;
use parley_application::AskOutcome;
use parley_core::history::DayGroup;
use parley_core::session::{Message, MessageRole, SessionEvent};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

pub fn message(message: &Message) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.text).green()),
        MessageRole::AssistantPlaceholder => println!("{}", "…".bright_black()),
        MessageRole::AssistantFinal => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

/// Prints assistant-side events as they happen; user input is already on screen.
pub fn event(event: &SessionEvent) {
    if let SessionEvent::MessageAppended { message: appended } = event {
        if appended.role != MessageRole::User {
            message(appended);
        }
    }
}

/// Prints events until the session's channel closes.
pub fn spawn_event_printer(mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(received) => event(&received),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[render] Skipped {} session event(s)", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

pub fn outcome_footer(outcome: &AskOutcome, persisted: bool) {
    match outcome {
        AskOutcome::Rejected { error } => println!("{}", error.to_string().yellow()),
        AskOutcome::Cancelled => println!("{}", "Cancelled.".yellow()),
        AskOutcome::Answered { .. } if !persisted => {
            println!("{}", "(not saved to history)".bright_black())
        }
        _ => {}
    }
}

pub fn day_groups(groups: &[DayGroup]) {
    if groups.is_empty() {
        println!("{}", "No history yet.".bright_black());
        return;
    }

    let today: NaiveDate = Local::now().date_naive();
    for group in groups {
        println!(
            "{} {}",
            group.label(today).bright_magenta().bold(),
            group.date.format("(%Y-%m-%d)").to_string().bright_black()
        );
        for thread in &group.threads {
            let first = thread
                .records
                .first()
                .map(|record| record.question.as_str())
                .unwrap_or_default();
            println!(
                "  {} {} {}",
                thread.thread_id.as_str().bright_black(),
                first,
                format!("({} exchange(s))", thread.records.len()).bright_black()
            );
        }
        println!();
    }
}
