mod credentials;
mod menu;
mod settings;
mod terminal;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use menu::{Console, SessionEnd};
use relay_agent::config::validate_model;
use relay_agent::{ClientConfig, Persona};
use relay_security::{has_key_prefix, mask_api_key, Sanitizer};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "relay",
    version,
    about = "Email, meeting-notes and writing-prompt agents on OpenRouter"
)]
struct Cli {
    /// OpenRouter API key (falls back to OPENROUTER_API_KEY, then ~/.openrouter/api_key)
    #[arg(short = 'k', long, global = true)]
    api_key: Option<String>,

    /// Model to use (overrides the config file)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Path to config file (default: ./relay.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Email Drafter: write a professional email from a description
    Email(PersonaArgs),
    /// Creative Writing Prompt Generator: writing prompts from genres or themes
    Prompt(PersonaArgs),
    /// Meeting Notes Formatter: turn raw notes into action items
    Notes(PersonaArgs),
    /// Store an API key in ~/.openrouter/api_key
    SaveKey {
        /// The key to store (asked for when omitted)
        key: Option<String>,
    },
}

#[derive(Args)]
struct PersonaArgs {
    /// Text to send to the agent
    input: Option<String>,

    /// Keep asking for input until 'exit'
    #[arg(short, long)]
    interactive: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = dotenvy::dotenv() {
        debug!(error = %e, "No .env file loaded");
    }

    let mut config = settings::load_config(cli.config.as_deref()).await?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    match cli.command {
        None => {
            validate_model(&config.model)?;
            run_interactive_menu(cli.api_key, config).await
        }
        Some(Commands::Email(args)) => {
            run_agent_command(Persona::EmailDrafter, args, cli.api_key, config).await
        }
        Some(Commands::Prompt(args)) => {
            run_agent_command(Persona::PromptGenerator, args, cli.api_key, config).await
        }
        Some(Commands::Notes(args)) => {
            run_agent_command(Persona::NotesFormatter, args, cli.api_key, config).await
        }
        Some(Commands::SaveKey { key }) => save_key(key).await,
    }
}

async fn run_interactive_menu(api_key: Option<String>, config: ClientConfig) -> anyhow::Result<()> {
    let api_key = match credentials::resolve_api_key(api_key.as_deref()) {
        Ok(key) => Some(key),
        Err(e) => {
            debug!(error = %e, "No stored API key, asking");
            None
        }
    };

    let sanitizer = Sanitizer::new(config.max_input_length);
    let mut console = Console::stdio();
    menu::run_menu(&mut console, api_key, None, &sanitizer, |key: &str| {
        credentials::connect(key, &config)
    })
    .await?;
    Ok(())
}

async fn run_agent_command(
    persona: Persona,
    args: PersonaArgs,
    api_key: Option<String>,
    config: ClientConfig,
) -> anyhow::Result<()> {
    let key = credentials::resolve_api_key(api_key.as_deref())?;
    let mut client = credentials::connect(&key, &config)?;
    let sanitizer = Sanitizer::new(config.max_input_length);

    if args.interactive {
        let mut console = Console::stdio();
        let end = menu::run_persona_loop(&mut console, &mut client, persona, None, &sanitizer).await?;
        if end == SessionEnd::RetryCredentials {
            anyhow::bail!("API key rejected; check the key and try again");
        }
        return Ok(());
    }

    let Some(input) = args.input else {
        anyhow::bail!("Provide the input text or use --interactive");
    };
    let input = sanitizer
        .sanitize(&input)
        .into_result()
        .map_err(anyhow::Error::msg)?;

    eprintln!("{}", persona.action_message());
    info!(persona = persona.label(), model = client.model(), "Running agent");
    let result = persona.run(&mut client, &input, None).await?;
    println!("\n{result}");
    Ok(())
}

async fn save_key(key: Option<String>) -> anyhow::Result<()> {
    let key = match key {
        Some(key) => key,
        None => Console::stdio()
            .ask_secret("OpenRouter API key (input hidden):")
            .await?
            .context("No API key entered")?,
    };
    let key = key.trim();
    if !has_key_prefix(key, relay_agent::API_KEY_PREFIX) {
        anyhow::bail!(
            "API key must start with '{}'",
            relay_agent::API_KEY_PREFIX
        );
    }

    let path = credentials::key_file_path().context("Could not determine the home directory")?;
    credentials::save_api_key(&path, key)?;
    eprintln!("Saved {} to {}", mask_api_key(key, 4), path.display());
    Ok(())
}
