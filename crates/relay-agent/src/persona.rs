use crate::client::ApiClient;
use relay_core::RelayResult;

/// A fixed system-prompt configuration steering the model toward one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    EmailDrafter,
    PromptGenerator,
    NotesFormatter,
}

const EMAIL_SYSTEM_PROMPT: &str = "You are an assistant specialized in professional emails.

MANDATORY VALIDATION: Check that the content is appropriate for a professional email. REJECT recipes, jokes, memes or any non-professional subject. If it is not appropriate, reply ONLY: \"The described content is not appropriate for a professional email. Please provide a subject related to work, business or a professional context.\"

For valid emails: use a professional tone, structure with greeting/body/closing, be clear and objective.";

const PROMPT_SYSTEM_PROMPT: &str = "You are a specialized generator of creative writing prompts.

MANDATORY VALIDATION: Check that the content is creative writing genres/themes. REJECT meeting notes, emails, recipes or any content not related to creative writing. If it is not appropriate, reply ONLY: \"The provided content is not appropriate for generating creative writing prompts. Please provide literary genres, themes or ideas for creative writing.\"

For valid inputs: create engaging prompts with characters/settings/conflicts, adapt to the genre, be creative but clear.";

const NOTES_SYSTEM_PROMPT: &str = "You are an expert in organizing and formatting meeting notes.

MANDATORY VALIDATION: Check that the content really is meeting/work notes. REJECT recipes, jokes, memes, creative texts or any content that is not meeting/professional notes. If it is not appropriate, reply ONLY: \"The provided content does not look like meeting notes. Please provide meeting notes or professional content to format.\"

For valid notes: identify actions/decisions/topics, organize logically, create clear action items, use clear formatting.";

impl Persona {
    /// Every persona, in menu order.
    pub const ALL: [Persona; 3] = [
        Persona::EmailDrafter,
        Persona::PromptGenerator,
        Persona::NotesFormatter,
    ];

    /// User-facing name.
    pub fn label(self) -> &'static str {
        match self {
            Persona::EmailDrafter => "Email Drafter",
            Persona::PromptGenerator => "Creative Writing Prompt Generator",
            Persona::NotesFormatter => "Meeting Notes Formatter",
        }
    }

    /// Question shown when asking the user for input.
    pub fn input_prompt(self) -> &'static str {
        match self {
            Persona::EmailDrafter => "Describe the email:",
            Persona::PromptGenerator => "Genres/themes of interest:",
            Persona::NotesFormatter => "Paste the notes:",
        }
    }

    /// Progress line printed while the request is in flight.
    pub fn action_message(self) -> &'static str {
        match self {
            Persona::EmailDrafter => "Drafting email...",
            Persona::PromptGenerator => "Generating prompts...",
            Persona::NotesFormatter => "Formatting notes...",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Persona::EmailDrafter => EMAIL_SYSTEM_PROMPT,
            Persona::PromptGenerator => PROMPT_SYSTEM_PROMPT,
            Persona::NotesFormatter => NOTES_SYSTEM_PROMPT,
        }
    }

    /// Wraps the user's input in the persona's task instruction.
    pub fn user_message(self, input: &str) -> String {
        match self {
            Persona::EmailDrafter => {
                format!("Write a professional email based on the description:\n\n{input}")
            }
            Persona::PromptGenerator => {
                format!("Generate creative writing prompts based on:\n\n{input}")
            }
            Persona::NotesFormatter => {
                format!("Organize the following meeting notes:\n\n{input}")
            }
        }
    }

    /// Look a persona up by its label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Persona> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label))
    }

    /// Run the persona on `input` through `client`.
    pub async fn run(
        self,
        client: &mut ApiClient,
        input: &str,
        model: Option<&str>,
    ) -> RelayResult<String> {
        let message = self.user_message(input);
        client
            .send_message(&message, model, Some(self.system_prompt()))
            .await
    }
}
