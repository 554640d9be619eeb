//! Interactive terminal client.
//!
//! Reads one command per line, runs the matching tracker action and
//! redraws the screen from the tracker state.

use std::io::{self, IsTerminal, Write};

use console::Term;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use jobtrack::{JobsApi, Tracker};

pub mod command;
pub mod input;
pub mod view;

use command::{Command, CommandError};
use input::{EditorInput, LineSource};

const PROMPT: &str = "> ";

/// Output target that may be able to clear itself between frames.
pub trait Screen: Write {
    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Screen for Term {
    fn clear(&mut self) -> io::Result<()> {
        self.clear_screen()
    }
}

impl Screen for Vec<u8> {}

impl<S: Screen + ?Sized> Screen for &mut S {
    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }
}

/// Runs the shell on stdin and stdout until `quit` or end of input.
/// A terminal gets line editing; piped input is read as plain lines.
pub async fn run<A: JobsApi>(tracker: Tracker<A>) -> anyhow::Result<()> {
    if io::stdin().is_terminal() {
        drive(tracker, EditorInput::spawn(), Term::stdout()).await?;
    } else {
        let lines = BufReader::new(tokio::io::stdin()).lines();
        drive(tracker, lines, Term::stdout()).await?;
    }
    Ok(())
}

/// The read-dispatch-render loop. Returns the tracker once input ends.
pub async fn drive<A, L, S>(mut tracker: Tracker<A>, mut input: L, mut screen: S) -> anyhow::Result<Tracker<A>>
where
    A: JobsApi,
    L: LineSource,
    S: Screen,
{
    // A failed first load shows up as the error line.
    let _ = tracker.load().await;

    let mut message: Option<String> = None;

    loop {
        screen.clear()?;
        screen.write_all(view::render(tracker.state()).as_bytes())?;
        if let Some(m) = message.take() {
            writeln!(screen, "\n{}", m)?;
        }
        writeln!(screen)?;
        if !input.shows_prompt() {
            write!(screen, "{}", PROMPT)?;
        }
        screen.flush()?;

        let Some(line) = input.next_line(PROMPT).await? else {
            writeln!(screen)?;
            break;
        };

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => match execute(&mut tracker, command).await {
                Ok(shown) => message = shown,
                Err(e) => message = Some(e.to_string()),
            },
            Err(CommandError::Empty) => {}
            Err(e) => message = Some(e.to_string()),
        }
    }

    Ok(tracker)
}

/// Runs one command. Returns extra text to show under the screen.
///
/// Action failures are already recorded in the tracker state, so only
/// input problems come back as errors.
async fn execute<A: JobsApi>(tracker: &mut Tracker<A>, command: Command) -> Result<Option<String>, CommandError> {
    debug!(?command, "Executing shell command");

    match command {
        Command::Edit(field, value) => {
            let _ = tracker.edit_draft(field, &value);
        }
        Command::Add => {
            let _ = tracker.submit_draft().await;
        }
        Command::Filter(filter) => tracker.set_filter(filter),
        Command::SetStatus { row, status } => {
            let id = row_id(tracker, row)?;
            let _ = tracker.set_status(&id, status).await;
        }
        Command::Delete { row } => {
            let id = row_id(tracker, row)?;
            let _ = tracker.remove(&id).await;
        }
        Command::Refresh => {
            let _ = tracker.load().await;
        }
        Command::Help => return Ok(Some(view::HELP.to_string())),
        Command::Quit => {}
    }
    Ok(None)
}

/// Resolves a 1-based row of the visible list to a record id.
fn row_id<A: JobsApi>(tracker: &Tracker<A>, row: usize) -> Result<String, CommandError> {
    tracker
        .state()
        .visible_row(row)
        .map(|job| job.id.clone())
        .ok_or(CommandError::NoSuchRow(row))
}

#[cfg(test)]
mod tests {
    use jobtrack::{Database, JobService, JobStatus, LocalJobsApi};

    use super::*;

    fn tracker() -> Tracker<LocalJobsApi> {
        let db = Database::open_in_memory().expect("Failed to create test database");
        Tracker::new(LocalJobsApi::new(JobService::new(db)))
    }

    async fn script(tracker: Tracker<LocalJobsApi>, lines: &str) -> (Tracker<LocalJobsApi>, String) {
        console::set_colors_enabled(false);
        let mut out = Vec::new();
        let tracker = drive(tracker, lines.as_bytes().lines(), &mut out).await.unwrap();
        (tracker, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_add_update_delete_session() {
        let (tracker, out) = script(
            tracker(),
            "company Acme\nrole Engineer\nadd\nset 1 Interview\n",
        )
        .await;

        let records = tracker.state().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, JobStatus::Interview);
        assert!(out.contains("Acme moved to Interview"));

        let (tracker, out) = script(tracker, "delete 1\nquit\n").await;
        assert!(tracker.state().records().is_empty());
        assert!(out.contains("No jobs found. Add one above!"));
    }

    #[tokio::test]
    async fn test_add_without_company_shows_error() {
        let (tracker, out) = script(tracker(), "role Engineer\nadd\n").await;
        assert!(tracker.state().records().is_empty());
        assert!(out.contains("error: Company and Role are required!"));
    }

    /// Stands in for the line editor: draws its own prompt.
    struct Scripted {
        lines: Vec<&'static str>,
        prompts: Vec<String>,
    }

    #[async_trait::async_trait]
    impl LineSource for Scripted {
        fn shows_prompt(&self) -> bool {
            true
        }

        async fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
            self.prompts.push(prompt.to_string());
            if self.lines.is_empty() {
                return Ok(None);
            }
            Ok(Some(self.lines.remove(0).to_string()))
        }
    }

    #[tokio::test]
    async fn test_editor_source_draws_its_own_prompt() {
        console::set_colors_enabled(false);
        let input = Scripted {
            lines: vec!["company Acme", "role Dev", "add"],
            prompts: Vec::new(),
        };
        let mut out = Vec::new();
        let tracker = drive(tracker(), input, &mut out).await.unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(tracker.state().records().len(), 1);
        assert!(!out.contains(PROMPT));
        assert!(out.contains("Added Acme (Dev)"));
    }

    #[tokio::test]
    async fn test_input_errors_are_reported() {
        let (_, out) = script(tracker(), "delete 4\nfly\nhelp\n").await;
        assert!(out.contains("No row 4 in the list"));
        assert!(out.contains("Unknown command 'fly'"));
        assert!(out.contains("set <row> <Status>  change the status of a row"));
    }
}
