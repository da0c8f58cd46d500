//! Line-oriented console I/O
//!
//! `Console` is the raw line transport the selection loop reads from and
//! renders to. `Prompt` is the user-facing message channel plus the
//! end-of-panel question. `StdConsole` implements both over any
//! `BufRead`/`Write` pair.

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use tracing::warn;

use crate::messages::{MessageLookup, keys};
use crate::types::{EndAction, Severity};

pub trait Console {
    /// Next input line without its line terminator; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn println(&mut self, line: &str) -> io::Result<()>;
}

pub trait Prompt {
    /// Fire-and-forget user message
    fn message(&mut self, severity: Severity, text: &str);

    /// Ask whether to continue, quit, or show the panel again
    fn confirm_end(&mut self, messages: &dyn MessageLookup) -> io::Result<EndAction>;
}

pub struct StdConsole<R, W> {
    reader: R,
    writer: W,
    assume_yes: bool,
}

impl StdConsole<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            assume_yes: false,
        }
    }

    /// Answer every end-of-panel question with "continue"
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Console for StdConsole<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        // Undecodable bytes become U+FFFD and fail number parsing downstream.
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn println(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}

impl<R: BufRead, W: Write> Prompt for StdConsole<R, W> {
    fn message(&mut self, severity: Severity, text: &str) {
        let line = match severity {
            Severity::Warning => format!("{}: {}", severity, text),
            Severity::Information => text.to_string(),
        };
        if let Err(e) = self.println(&line) {
            warn!("Failed to write {} message: {}", severity, e);
        }
    }

    fn confirm_end(&mut self, messages: &dyn MessageLookup) -> io::Result<EndAction> {
        if self.assume_yes {
            return Ok(EndAction::Continue);
        }
        let question = messages.get(keys::CONTINUE_QUIT_REDISPLAY);
        loop {
            self.println(&question)?;
            let Some(line) = self.read_line()? else {
                return Ok(EndAction::Quit);
            };
            if let Some(action) = line
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(EndAction::from_choice)
            {
                return Ok(action);
            }
        }
    }
}
