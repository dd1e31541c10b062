use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use parley_application::HistoryService;
use parley_core::history::{DayGroup, HistoryKind};
use parley_core::session::ThreadId;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::AppContext;
use crate::render;

/// Slash commands and whether they take an argument.
const COMMANDS: &[(&str, bool)] = &[
    ("/new", false),
    ("/thread", true),
    ("/history", false),
    ("/quit", false),
];

/// Completion candidates for `line` (cursor at its end) and the byte offset
/// they replace from. Command names complete first, then `/thread` ids.
fn candidates(line: &str, thread_ids: &[String]) -> (usize, Vec<String>) {
    match line.split_once(' ') {
        None if line.starts_with('/') => (
            0,
            COMMANDS
                .iter()
                .filter(|(name, _)| name.starts_with(line))
                .map(|(name, takes_arg)| {
                    if *takes_arg {
                        format!("{name} ")
                    } else {
                        name.to_string()
                    }
                })
                .collect(),
        ),
        Some(("/thread", partial)) if !partial.contains(' ') => (
            "/thread ".len(),
            thread_ids
                .iter()
                .filter(|id| id.starts_with(partial))
                .cloned()
                .collect(),
        ),
        _ => (0, Vec::new()),
    }
}

/// Remaining text of the first candidate, shown greyed after the cursor.
fn hint_for(line: &str, thread_ids: &[String]) -> Option<String> {
    let (start, found) = candidates(line, thread_ids);
    let typed = &line[start..];
    found
        .into_iter()
        .next()
        .filter(|candidate| candidate.len() > typed.len())
        .map(|candidate| candidate[typed.len()..].to_string())
}

/// rustyline helper that knows the slash commands and the thread ids
/// recorded in history.
struct ChatHelper {
    thread_ids: Vec<String>,
}

impl ChatHelper {
    /// Most recent thread first, so hints suggest the latest conversation.
    fn from_history(groups: &[DayGroup]) -> Self {
        let mut thread_ids = Vec::new();
        for group in groups {
            for thread in group.threads.iter().rev() {
                thread_ids.push(thread.thread_id.as_str().to_string());
            }
        }
        Self { thread_ids }
    }

    fn remember(&mut self, thread_id: &ThreadId) {
        if !self.thread_ids.iter().any(|id| id == thread_id.as_str()) {
            self.thread_ids.insert(0, thread_id.as_str().to_string());
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, found) = candidates(&line[..pos], &self.thread_ids);
        let pairs = found
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.trim_end().to_string(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        match line.split_once(' ') {
            Some((command, argument)) => Owned(format!(
                "{} {}",
                command.bright_cyan(),
                argument.bright_black()
            )),
            None => Owned(line.bright_cyan().to_string()),
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        hint_for(line, &self.thread_ids)
    }
}

impl Validator for ChatHelper {}

/// Interactive conversation. Each answered turn is saved to the online history.
pub async fn run(ctx: &AppContext, thread: Option<String>) -> Result<()> {
    let history = HistoryService::new(ctx.history(HistoryKind::Online)?);
    let session = match thread {
        Some(id) => Some(history.open_thread(&ThreadId::from(id)).await?),
        None => None,
    };
    let mut chat = ctx.chat_service(session)?;

    for message in chat.session().messages() {
        render::message(message);
    }
    let mut printer = render::spawn_event_printer(chat.subscribe());

    let mut rl: Editor<ChatHelper, rustyline::history::DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper::from_history(&history.build().await?)));

    println!("{}", "=== Parley ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Thread {}. Type '/new' for a new thread, '/thread <id>' to resume one, '/history' to browse, or '/quit' to exit.",
            chat.session().thread_id()
        )
        .bright_black()
    );
    println!();

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        match trimmed.split_once(' ').map_or((trimmed, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("/quit" | "/exit", _) => break,
            ("/new", _) => {
                chat.start_new_thread();
                printer = render::spawn_event_printer(chat.subscribe());
                println!(
                    "{}",
                    format!("Started thread {}", chat.session().thread_id()).bright_black()
                );
            }
            ("/history", _) => render::day_groups(&history.build().await?),
            ("/thread", id) if !id.is_empty() => match history.open_thread(&ThreadId::from(id)).await {
                Ok(session) => {
                    for message in session.messages() {
                        render::message(message);
                    }
                    chat = ctx.chat_service(Some(session))?;
                    printer = render::spawn_event_printer(chat.subscribe());
                }
                Err(e) => println!("{}", e.to_string().yellow()),
            },
            _ => {
                let cancel = chat.cancel_handle().child_token();
                let trigger = cancel.clone();
                let ctrl_c = tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        trigger.cancel();
                    }
                });
                let turn = chat.ask_with_cancel(trimmed, &cancel).await;
                ctrl_c.abort();
                // Let the printer catch up before the next prompt.
                tokio::task::yield_now().await;
                render::outcome_footer(&turn.outcome, turn.persisted);
                if turn.persisted {
                    if let Some(helper) = rl.helper_mut() {
                        helper.remember(chat.session().thread_id());
                    }
                }
            }
        }
    }

    drop(chat);
    let _ = printer.await;
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<String> {
        vec!["20261019-abcd".to_string(), "20261018-ef01".to_string()]
    }

    #[test]
    fn test_command_names_complete_with_argument_space() {
        assert_eq!(candidates("/th", &ids()), (0, vec!["/thread ".to_string()]));
        assert_eq!(candidates("/q", &ids()), (0, vec!["/quit".to_string()]));
        assert_eq!(candidates("hello", &ids()), (0, vec![]));
    }

    #[test]
    fn test_thread_argument_completes_from_history_ids() {
        assert_eq!(
            candidates("/thread 202610", &ids()),
            (8, ids())
        );
        assert_eq!(
            candidates("/thread 20261018", &ids()),
            (8, vec!["20261018-ef01".to_string()])
        );
        assert_eq!(candidates("/history 2026", &ids()), (0, vec![]));
    }

    #[test]
    fn test_hint_suggests_most_recent_thread() {
        assert_eq!(hint_for("/thread ", &ids()).as_deref(), Some("20261019-abcd"));
        assert_eq!(hint_for("/hi", &ids()).as_deref(), Some("story"));
        assert_eq!(hint_for("/quit", &ids()), None);
    }

    #[test]
    fn test_remember_puts_new_thread_first_once() {
        let mut helper = ChatHelper { thread_ids: ids() };
        let thread = ThreadId::from("20261020-9999".to_string());
        helper.remember(&thread);
        helper.remember(&thread);
        assert_eq!(helper.thread_ids.len(), 3);
        assert_eq!(helper.thread_ids[0], "20261020-9999");
    }
}
