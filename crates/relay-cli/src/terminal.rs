//! Line input for the interactive session.
//!
//! Standard input is read on a blocking task so the runtime is never stalled
//! and no stdin lock is held across an `.await`. Secrets typed at a terminal
//! are read in raw mode without echo.

use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, IsTerminal};

/// Source of answer lines. `None` means end of input.
#[async_trait]
pub trait LineSource: Send {
    /// Read one line without its line ending.
    async fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Read one line that must not be echoed. Defaults to [`LineSource::read_line`].
    async fn read_secret(&mut self) -> io::Result<Option<String>> {
        self.read_line().await
    }
}

#[async_trait]
impl<T: BufRead + Send> LineSource for T {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if BufRead::read_line(self, &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_ending(&line)))
    }
}

/// The process's standard input.
pub struct StdinSource;

#[async_trait]
impl LineSource for StdinSource {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        tokio::task::spawn_blocking(|| -> io::Result<Option<String>> {
            let mut line = String::new();
            if io::stdin().read_line(&mut line)? == 0 {
                return Ok(None);
            }
            Ok(Some(strip_line_ending(&line)))
        })
        .await
        .map_err(io::Error::other)?
    }

    async fn read_secret(&mut self) -> io::Result<Option<String>> {
        if !io::stdin().is_terminal() {
            return self.read_line().await;
        }
        tokio::task::spawn_blocking(read_hidden_line)
            .await
            .map_err(io::Error::other)?
    }
}

fn strip_line_ending(line: &str) -> String {
    line.trim_end_matches(['\n', '\r']).to_string()
}

/// Progress of a secret being typed key by key.
#[derive(Debug, PartialEq, Eq)]
pub enum SecretInput {
    Pending,
    Done,
    Cancelled,
}

/// Apply one key press to the secret typed so far.
pub fn apply_key(secret: &mut String, key: KeyEvent) -> SecretInput {
    if key.kind == KeyEventKind::Release {
        return SecretInput::Pending;
    }
    match key.code {
        KeyCode::Enter => SecretInput::Done,
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            SecretInput::Cancelled
        }
        KeyCode::Esc => SecretInput::Cancelled,
        KeyCode::Backspace => {
            secret.pop();
            SecretInput::Pending
        }
        KeyCode::Char(c) => {
            secret.push(c);
            SecretInput::Pending
        }
        _ => SecretInput::Pending,
    }
}

fn read_hidden_line() -> io::Result<Option<String>> {
    terminal::enable_raw_mode()?;
    let result = collect_hidden();
    terminal::disable_raw_mode()?;
    eprintln!();
    result
}

fn collect_hidden() -> io::Result<Option<String>> {
    let mut secret = String::new();
    loop {
        match event::read()? {
            Event::Key(key) => match apply_key(&mut secret, key) {
                SecretInput::Pending => {}
                SecretInput::Done => return Ok(Some(secret)),
                SecretInput::Cancelled => return Ok(None),
            },
            Event::Paste(text) => secret.push_str(text.trim_end_matches(['\n', '\r'])),
            _ => {}
        }
    }
}
