//! Interactive terminal session: API-key entry, agent menu, and per-agent loops.
//!
//! Prompts and errors go to the error stream so stdout carries only model output.

use crate::terminal::{LineSource, StdinSource};
use relay_agent::{ApiClient, Persona};
use relay_core::RelayResult;
use relay_security::Sanitizer;
use std::fmt::Display;
use std::io::{self, Write};
use tracing::debug;

/// Words that leave an agent loop and return to the menu (case-insensitive).
pub const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "back"];

const EXIT_LABEL: &str = "Exit";

/// Line-oriented terminal over arbitrary streams.
pub struct Console<R, W, E> {
    input: R,
    out: W,
    err: E,
}

impl Console<StdinSource, io::Stdout, io::Stderr> {
    /// Console bound to the process's standard streams.
    pub fn stdio() -> Self {
        Self::new(StdinSource, io::stdout(), io::stderr())
    }
}

impl<R: LineSource, W: Write, E: Write> Console<R, W, E> {
    pub fn new(input: R, out: W, err: E) -> Self {
        Self { input, out, err }
    }

    /// Ask a question and read one line. `None` means end of input.
    pub async fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        self.prompt(question)?;
        let answer = self.input.read_line().await?;
        if answer.is_none() {
            writeln!(self.err)?;
        }
        Ok(answer)
    }

    /// Like [`Console::ask`], without echoing what is typed at a terminal.
    pub async fn ask_secret(&mut self, question: &str) -> io::Result<Option<String>> {
        self.prompt(question)?;
        let answer = self.input.read_secret().await?;
        if answer.is_none() {
            writeln!(self.err)?;
        }
        Ok(answer)
    }

    fn prompt(&mut self, question: &str) -> io::Result<()> {
        write!(self.err, "\x1b[32m?\x1b[0m {question} ")?;
        self.err.flush()
    }

    /// Print a line of model output.
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Print an informational line to the error stream.
    pub fn note(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.err, "{text}")
    }

    /// Print `Error: <message>` to the error stream.
    pub fn error(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.err, "\x1b[31mError:\x1b[0m {message}")
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.err)?;
        for (i, persona) in Persona::ALL.iter().enumerate() {
            writeln!(self.err, "  \x1b[36m{}\x1b[0m) {}", i + 1, persona.label())?;
        }
        writeln!(self.err, "  \x1b[36m{}\x1b[0m) {EXIT_LABEL}", Persona::ALL.len() + 1)
    }
}

/// A selection from the agent menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Persona(Persona),
    Exit,
}

/// Parse a menu answer: a 1-based number, a persona label, or "exit".
pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return match n {
            1..=3 => Some(MenuChoice::Persona(Persona::ALL[n - 1])),
            4 => Some(MenuChoice::Exit),
            _ => None,
        };
    }
    if input.eq_ignore_ascii_case(EXIT_LABEL) {
        return Some(MenuChoice::Exit);
    }
    Persona::from_label(input).map(MenuChoice::Persona)
}

/// Whether an agent-loop answer means "go back".
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim();
    input.is_empty() || EXIT_COMMANDS.iter().any(|c| input.eq_ignore_ascii_case(c))
}

/// How an agent loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user asked to return to the menu.
    Back,
    /// Input ended.
    Eof,
    /// The API key was rejected; the caller should ask for a new one.
    RetryCredentials,
}

/// Repeatedly read input for `persona`, send it, and print the result.
pub async fn run_persona_loop<R: LineSource, W: Write, E: Write>(
    console: &mut Console<R, W, E>,
    client: &mut ApiClient,
    persona: Persona,
    model: Option<&str>,
    sanitizer: &Sanitizer,
) -> io::Result<SessionEnd> {
    console.note(&format!("\n{}", persona.label()))?;
    console.note("Type 'exit' to go back\n")?;

    loop {
        let Some(answer) = console.ask(persona.input_prompt()).await? else {
            return Ok(SessionEnd::Eof);
        };
        if is_exit_command(&answer) {
            return Ok(SessionEnd::Back);
        }

        let input = match sanitizer.sanitize(&answer).into_result() {
            Ok(text) => text,
            Err(reason) => {
                console.error(reason)?;
                continue;
            }
        };

        console.note(persona.action_message())?;
        match persona.run(client, &input, model).await {
            Ok(text) => console.print(&format!("\n{text}\n"))?,
            Err(e) if e.is_credentials_related() => {
                console.error(&e)?;
                console.note("Returning to API key entry...\n")?;
                return Ok(SessionEnd::RetryCredentials);
            }
            Err(e) => console.error(&e)?,
        }
    }
}

/// Full interactive session.
///
/// `connect` turns an API key into a ready client; a failure discards the key
/// and asks again. A credentials error inside an agent loop also returns to
/// key entry.
pub async fn run_menu<R, W, E, F>(
    console: &mut Console<R, W, E>,
    mut api_key: Option<String>,
    model: Option<&str>,
    sanitizer: &Sanitizer,
    mut connect: F,
) -> io::Result<()>
where
    R: LineSource,
    W: Write,
    E: Write,
    F: FnMut(&str) -> RelayResult<ApiClient>,
{
    loop {
        let mut client = loop {
            let key = match api_key.take() {
                Some(key) => key,
                None => match console.ask_secret("OpenRouter API key (input hidden):").await? {
                    None => return Ok(()),
                    Some(answer) if answer.trim().is_empty() => {
                        console.error("API key is required")?;
                        continue;
                    }
                    Some(answer) => answer.trim().to_string(),
                },
            };
            match connect(&key) {
                Ok(client) => break client,
                Err(e) => console.error(&e)?,
            }
        };

        loop {
            console.show_menu()?;
            let Some(answer) = console.ask("Select an agent:").await? else {
                return Ok(());
            };
            match parse_menu_choice(&answer) {
                None => console.error(format!("Unknown choice '{}'", answer.trim()))?,
                Some(MenuChoice::Exit) => return Ok(()),
                Some(MenuChoice::Persona(persona)) => {
                    debug!(persona = persona.label(), "Agent selected");
                    match run_persona_loop(console, &mut client, persona, model, sanitizer).await? {
                        SessionEnd::Back => {}
                        SessionEnd::Eof => return Ok(()),
                        SessionEnd::RetryCredentials => break,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_agent::{ChatBackend, ChatCompletion, ChatRequest, ClientConfig, TransportFailure};
    use relay_core::RelayError;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Replies with a fixed sequence of results and records every request.
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<ChatCompletion, TransportFailure>>>,
        seen: Arc<Mutex<Vec<ChatRequest>>>,
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn complete(
            &self,
            request: &ChatRequest,
        ) -> Result<ChatCompletion, TransportFailure> {
            self.seen.lock().unwrap().push(request.clone());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok(ChatCompletion::from_texts(["default reply"]))
            } else {
                replies.remove(0)
            }
        }
    }

    fn scripted_client(
        replies: Vec<Result<ChatCompletion, TransportFailure>>,
    ) -> (ApiClient, Arc<Mutex<Vec<ChatRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let backend = ScriptedBackend {
            replies: Mutex::new(replies),
            seen: seen.clone(),
        };
        let client =
            ApiClient::from_backend("sk-or-test", ClientConfig::default(), Box::new(backend)).unwrap();
        (client, seen)
    }

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), Vec::new())
    }

    fn text(buf: &[u8]) -> String {
        String::from_utf8_lossy(buf).into_owned()
    }

    #[test]
    fn menu_choice_parsing() {
        assert_eq!(
            parse_menu_choice("1"),
            Some(MenuChoice::Persona(Persona::EmailDrafter))
        );
        assert_eq!(
            parse_menu_choice(" 3 "),
            Some(MenuChoice::Persona(Persona::NotesFormatter))
        );
        assert_eq!(parse_menu_choice("4"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu_choice("exit"), Some(MenuChoice::Exit));
        assert_eq!(
            parse_menu_choice("creative writing prompt generator"),
            Some(MenuChoice::Persona(Persona::PromptGenerator))
        );
        assert_eq!(parse_menu_choice("0"), None);
        assert_eq!(parse_menu_choice("5"), None);
        assert_eq!(parse_menu_choice("pizza"), None);
    }

    #[test]
    fn exit_commands() {
        for s in ["", "  ", "exit", "QUIT", " Back "] {
            assert!(is_exit_command(s), "{s:?}");
        }
        assert!(!is_exit_command("exit strategy memo"));
    }

    #[tokio::test]
    async fn ask_strips_line_ending_and_reports_eof() {
        let mut c = console("hello\r\nsk-or-secret\n");
        assert_eq!(c.ask("Q").await.unwrap().as_deref(), Some("hello"));
        assert_eq!(c.ask_secret("Key:").await.unwrap().as_deref(), Some("sk-or-secret"));
        assert_eq!(c.ask("Q").await.unwrap(), None);
        assert!(text(&c.err).contains("Key:"));
    }

    #[tokio::test]
    async fn persona_loop_prints_result_and_goes_back() {
        let (mut client, seen) = scripted_client(vec![Ok(ChatCompletion::from_texts([
            "Dear team,",
        ]))]);
        let mut c = console("  ask for budget \nexit\n");

        let end = run_persona_loop(
            &mut c,
            &mut client,
            Persona::EmailDrafter,
            None,
            &Sanitizer::default(),
        )
        .await
        .unwrap();

        assert_eq!(end, SessionEnd::Back);
        assert_eq!(text(&c.out), "\nDear team,\n\n");
        assert!(text(&c.err).contains("Drafting email..."));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].messages[1].content.ends_with("\n\nask for budget"));
    }

    #[tokio::test]
    async fn persona_loop_rejects_oversized_input_and_continues() {
        let (mut client, seen) = scripted_client(vec![]);
        let mut c = console("abcdefghijk\nok\nquit\n");

        let end = run_persona_loop(
            &mut c,
            &mut client,
            Persona::NotesFormatter,
            None,
            &Sanitizer::new(5),
        )
        .await
        .unwrap();

        assert_eq!(end, SessionEnd::Back);
        assert!(text(&c.err).contains("Input too long (maximum: 5 characters)"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn persona_loop_reports_errors_and_keeps_going() {
        let (mut client, _) = scripted_client(vec![Err(TransportFailure::new(
            "StatusError",
            "HTTP 400 Bad Request: context too long",
        ))]);
        let mut c = console("first\nsecond\n");

        let end = run_persona_loop(
            &mut c,
            &mut client,
            Persona::PromptGenerator,
            None,
            &Sanitizer::default(),
        )
        .await
        .unwrap();

        assert_eq!(end, SessionEnd::Eof);
        assert!(text(&c.err).contains("Error:"));
        assert!(text(&c.err).contains("context too long"));
        assert!(text(&c.out).contains("default reply"));
    }

    #[tokio::test]
    async fn credentials_error_requests_new_key() {
        let (mut client, _) = scripted_client(vec![Err(TransportFailure::new(
            "StatusError",
            "HTTP 401 Unauthorized: {}",
        ))]);
        let mut c = console("draft something\nnever read\n");

        let end = run_persona_loop(
            &mut c,
            &mut client,
            Persona::EmailDrafter,
            None,
            &Sanitizer::default(),
        )
        .await
        .unwrap();

        assert_eq!(end, SessionEnd::RetryCredentials);
        assert!(text(&c.err).contains("Returning to API key entry"));
    }

    #[tokio::test]
    async fn menu_reprompts_for_key_after_rejection() {
        // blank key, rejected key, good key, pick agent 3, one request, back, exit
        let mut c = console("\nsk-bad\nsk-or-good\n3\nnotes here\nback\n4\n");
        let keys = Arc::new(Mutex::new(Vec::new()));
        let keys_seen = keys.clone();

        run_menu(&mut c, None, None, &Sanitizer::default(), |key: &str| {
            keys_seen.lock().unwrap().push(key.to_string());
            if key.starts_with("sk-or-") {
                Ok(scripted_client(vec![Ok(ChatCompletion::from_texts(["- action item"]))]).0)
            } else {
                Err(RelayError::InvalidCredentials(
                    "API key invalid or unauthorized".into(),
                ))
            }
        })
        .await
        .unwrap();

        assert_eq!(*keys.lock().unwrap(), vec!["sk-bad", "sk-or-good"]);
        let err = text(&c.err);
        assert!(err.contains("API key is required"));
        assert!(err.contains("Invalid credentials"));
        assert!(err.contains("Meeting Notes Formatter"));
        assert!(text(&c.out).contains("- action item"));
    }

    #[tokio::test]
    async fn menu_returns_to_key_entry_after_unauthorized() {
        let mut c = console("2\nspace opera\nsk-or-second\n4\n");
        let mut attempts = 0;

        run_menu(
            &mut c,
            Some("sk-or-first".into()),
            None,
            &Sanitizer::default(),
            |_key: &str| {
                attempts += 1;
                let replies = if attempts == 1 {
                    vec![Err(TransportFailure::new("StatusError", "HTTP 401 Unauthorized: {}"))]
                } else {
                    vec![]
                };
                Ok(scripted_client(replies).0)
            },
        )
        .await
        .unwrap();

        assert_eq!(attempts, 2);
        assert!(text(&c.err).contains("OpenRouter API key (input hidden):"));
    }

    #[tokio::test]
    async fn menu_ends_on_eof() {
        let mut c = console("");
        run_menu(&mut c, None, None, &Sanitizer::default(), |_: &str| {
            panic!("no key was entered")
        })
        .await
        .unwrap();
    }
}
