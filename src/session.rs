//! Read-eval-print session.
//!
//! A [`Session`] reads one line at a time, answers it with exactly one line,
//! and stops at `quit`/`exit` or end of input. It works over any reader and
//! writer so transcripts can be driven from tests.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::config::SessionConfig;
use crate::engine::KinEngine;
use crate::error::KinResult;
use crate::pattern::SentenceMatcher;
use crate::response::Response;

/// Printed when the session starts.
pub const BANNER: &str = "\
------------------------------------------------------
|Hello there! This is the Family Relationship Chatbot|
------------------------------------------------------

Feel free to tell me statements or ask questions about family relationships. I will be happy to assist you:>

If you don't want to continue anymore, just enter 'quit' or 'exit' to end the conversation.
";

/// Printed when the user quits.
pub const FAREWELL: &str = "Byebye:<";

/// What to do with one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Blank line: print nothing.
    Skip,
    /// The user asked to leave.
    Quit,
    /// Print this response.
    Answer(Response),
}

fn is_sentinel(line: &str) -> bool {
    line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit")
}

/// An interactive conversation with one engine.
pub struct Session {
    engine: KinEngine,
    matcher: SentenceMatcher,
    config: SessionConfig,
}

impl Session {
    /// Start a session over `engine`.
    pub fn new(engine: KinEngine, config: SessionConfig) -> KinResult<Self> {
        Ok(Self {
            engine,
            matcher: SentenceMatcher::new()?,
            config: config.validate()?,
        })
    }

    /// The engine answering this session.
    #[must_use]
    pub fn engine(&self) -> &KinEngine {
        &self.engine
    }

    /// Answer one line.
    pub fn respond(&self, line: &str) -> Reply {
        let line = line.trim();
        if line.is_empty() {
            return Reply::Skip;
        }
        if is_sentinel(line) {
            return Reply::Quit;
        }
        match self.matcher.parse(line) {
            Ok(request) => Reply::Answer(self.engine.dispatch(request)),
            Err(err) => {
                warn!(input = line, error = %err, "unrecognized input");
                Reply::Answer(Response::Malformed(err.kind))
            }
        }
    }

    /// Run until `quit`/`exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> io::Result<()> {
        if self.config.banner {
            writeln!(output, "{BANNER}")?;
        }

        let mut line = String::new();
        loop {
            write!(output, "{}", self.config.prompt)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                if self.config.farewell_on_eof {
                    writeln!(output, "{FAREWELL}")?;
                }
                return Ok(());
            }

            match self.respond(&line) {
                Reply::Skip => {}
                Reply::Quit => {
                    writeln!(output, "{FAREWELL}")?;
                    return Ok(());
                }
                Reply::Answer(response) => writeln!(output, "{response}")?,
            }
        }
    }
}
