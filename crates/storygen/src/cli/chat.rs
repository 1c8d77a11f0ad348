//! Streaming chat REPL.

use std::io::Write;
use std::sync::Arc;
use storygen::{
    ChatMessage, ChatPanel, StorygenConfig, StorygenResult, Studio, StudioOptions, TurnOutcome,
};
use tracing::warn;

use super::{ConsoleInput, TerminalKeyPrompt};

/// Run the chat REPL until `/quit` or end of input.
pub async fn run_chat(config: StorygenConfig, input: ConsoleInput) -> StorygenResult<()> {
    let prompt = Arc::new(TerminalKeyPrompt::new(input.clone()));
    let studio = Studio::open(config, prompt, StudioOptions::default()).await?;
    studio.ensure_credential().await?;

    let panel = studio.chat();
    if let Some(greeting) = panel.transcript().first() {
        println!("assistant> {}", greeting.text);
    }
    println!("(Ctrl-C abandons a reply, /quit exits)");

    while let Some(line) = input.read_line("\nyou> ").await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }
        if let Err(e) = stream_turn(panel, line).await {
            warn!(error = %e, "Message not sent");
        }
    }
    Ok(())
}

/// Send one turn and echo the reply to stdout as fragments arrive.
pub async fn stream_turn(panel: &ChatPanel, text: &str) -> StorygenResult<TurnOutcome> {
    let mut updates = panel.subscribe();
    // Reply messages follow the user message about to be pushed.
    let mut cursor = ReplyCursor::new(panel.transcript().len() + 1);
    let turn = panel.send(text).await?;
    print!("assistant> ");

    let join = turn.join();
    tokio::pin!(join);
    let outcome = loop {
        tokio::select! {
            outcome = &mut join => break outcome,
            changed = updates.changed() => {
                if changed.is_err() {
                    break (&mut join).await;
                }
                let snapshot = updates.borrow_and_update().clone();
                cursor.print_new(&snapshot);
            }
            _ = tokio::signal::ctrl_c() => {
                panel.abandon();
            }
        }
    };

    cursor.print_new(&panel.transcript());
    if outcome == TurnOutcome::Abandoned {
        print!(" [abandoned]");
    }
    println!();
    Ok(outcome)
}

/// Tracks how much of the reply has been echoed.
///
/// Message text only ever grows by appending, so a byte offset into the
/// current message is always a char boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReplyCursor {
    index: usize,
    offset: usize,
}

impl ReplyCursor {
    fn new(index: usize) -> Self {
        Self { index, offset: 0 }
    }

    fn pending(&mut self, messages: &[ChatMessage]) -> String {
        let mut out = String::new();
        while let Some(message) = messages.get(self.index) {
            if self.offset < message.text.len() {
                out.push_str(&message.text[self.offset..]);
                self.offset = message.text.len();
            }
            if self.index + 1 >= messages.len() {
                break;
            }
            out.push('\n');
            self.index += 1;
            self.offset = 0;
        }
        out
    }

    fn print_new(&mut self, messages: &[ChatMessage]) {
        let text = self.pending(messages);
        if !text.is_empty() {
            print!("{}", text);
            // Best effort; a closed stdout only loses echo.
            let _ = std::io::stdout().flush();
        }
    }
}
