//! Where shell lines come from.
//!
//! Piped input and tests read plain lines through tokio. An interactive
//! terminal gets a rustyline editor with in-session history.

use std::io;
use std::sync::mpsc;
use std::thread;

use async_trait::async_trait;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::io::{AsyncBufRead, Lines};

#[async_trait]
pub trait LineSource: Send {
    /// True when the source draws `prompt` itself.
    fn shows_prompt(&self) -> bool {
        false
    }

    /// Next input line, `None` at end of input.
    async fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> LineSource for Lines<R> {
    async fn next_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Lines::next_line(self).await
    }
}

/// Line editor running on its own thread.
///
/// The thread only calls `readline` after a prompt request arrives, so the
/// prompt is drawn after the screen for that turn.
pub struct EditorInput {
    prompts: mpsc::Sender<String>,
    lines: tokio::sync::mpsc::Receiver<io::Result<Option<String>>>,
}

impl EditorInput {
    pub fn spawn() -> Self {
        let (prompts, prompt_rx) = mpsc::channel::<String>();
        let (line_tx, lines) = tokio::sync::mpsc::channel(1);

        thread::spawn(move || {
            let mut editor = match DefaultEditor::new() {
                Ok(editor) => editor,
                Err(e) => {
                    let _ = line_tx.blocking_send(Err(io::Error::other(e.to_string())));
                    return;
                }
            };

            while let Ok(prompt) = prompt_rx.recv() {
                let result = read_one(&mut editor, &prompt);
                let finished = !matches!(result, Ok(Some(_)));
                if line_tx.blocking_send(result).is_err() || finished {
                    break;
                }
            }
        });

        Self { prompts, lines }
    }
}

fn read_one(editor: &mut DefaultEditor, prompt: &str) -> io::Result<Option<String>> {
    loop {
        match editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                return Ok(Some(line));
            }
            // Ctrl+C drops the current line only.
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(io::Error::other(e.to_string())),
        }
    }
}

#[async_trait]
impl LineSource for EditorInput {
    fn shows_prompt(&self) -> bool {
        true
    }

    async fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if self.prompts.send(prompt.to_string()).is_err() {
            return Ok(None);
        }
        Ok(self.lines.recv().await.transpose()?.flatten())
    }
}
