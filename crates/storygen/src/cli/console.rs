//! Line-oriented terminal input shared by the REPLs and the key prompt.

use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use storygen::{KeyPrompt, StorageError, StorageErrorKind, StorygenResult};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Shared reader over stdin lines.
///
/// One reader serves every prompt so buffered input is never lost between
/// the shell and the key prompt.
#[derive(Clone)]
pub struct ConsoleInput {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
        }
    }

    /// Print `prompt` and read one line. `None` at end of input.
    pub async fn read_line(&self, prompt: &str) -> StorygenResult<Option<String>> {
        print!("{}", prompt);
        std::io::stdout()
            .flush()
            .map_err(|e| StorageError::new(StorageErrorKind::FileWrite(format!("stdout: {}", e))))?;

        let line = self
            .lines
            .lock()
            .await
            .next_line()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::FileRead(format!("stdin: {}", e))))?;
        Ok(line)
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Asks for a Gemini API key on the terminal.
pub struct TerminalKeyPrompt {
    input: ConsoleInput,
}

impl TerminalKeyPrompt {
    pub fn new(input: ConsoleInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl KeyPrompt for TerminalKeyPrompt {
    async fn request_key(&self) -> StorygenResult<Option<String>> {
        println!("A Gemini API key from a paid Google Cloud project is required.");
        println!("Create one at https://aistudio.google.com/apikey");
        println!("(billing: https://ai.google.dev/gemini-api/docs/billing)");

        let line = self.input.read_line("API key (blank to cancel): ").await?;
        Ok(line
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty()))
    }
}
