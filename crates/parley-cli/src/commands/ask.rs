use anyhow::Result;

use super::AppContext;
use crate::render;

/// Asks one question in a fresh thread. Ctrl-C abandons the pending answer.
pub async fn run(ctx: &AppContext, prompt: &str) -> Result<()> {
    let mut chat = ctx.chat_service(None)?;
    let renderer = render::spawn_event_printer(chat.subscribe());

    let cancel = chat.cancel_handle().child_token();
    let trigger = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    let turn = chat.ask_with_cancel(prompt, &cancel).await;
    ctrl_c.abort();

    // Closing the session's channel lets the printer drain and finish.
    drop(chat);
    let _ = renderer.await;
    render::outcome_footer(&turn.outcome, turn.persisted);

    if turn.outcome.final_text().is_none() {
        anyhow::bail!("No answer was produced");
    }
    Ok(())
}
