use anyhow::Result;
use colored::Colorize;
use parley_application::HistoryService;
use parley_core::history::HistoryKind;
use parley_core::session::ThreadId;

use super::AppContext;
use crate::render;

pub async fn list(ctx: &AppContext, kind: HistoryKind) -> Result<()> {
    let service = HistoryService::new(ctx.history(kind)?);
    render::day_groups(&service.build().await?);
    Ok(())
}

pub async fn show_thread(ctx: &AppContext, id: &str, kind: HistoryKind) -> Result<()> {
    let service = HistoryService::new(ctx.history(kind)?);
    let session = service.open_thread(&ThreadId::from(id)).await?;

    println!("{}", format!("Thread {}", session.thread_id()).bright_magenta().bold());
    for message in session.messages() {
        render::message(message);
    }
    Ok(())
}
