use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use ai_client::{ChatModel, OpenAi};
use anyhow::Result;
use clap::{Parser, Subcommand};
use credence_common::{Config, CredenceError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use persona::{scenario, AgentSpec, Persona};

const BUNDLED_AGENTS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/agents");

#[derive(Parser)]
#[command(name = "persona-chat", about = "Talk to simulated personas")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lisa the data scientist tells you about her life
    Intro,
    /// Chat with a persona (Lisa unless --spec is given)
    Chat {
        #[arg(long)]
        spec: Option<PathBuf>,
    },
    /// Two customer service reps discuss a difficult call
    Team {
        #[arg(long, default_value = BUNDLED_AGENTS)]
        agents_dir: PathBuf,
    },
    /// Ask one agent one question
    Ask {
        /// Agent name (e.g. "sunny", "Alex Chen", "lisa") or path to a spec file
        #[arg(long)]
        agent: String,
        #[arg(long, default_value = BUNDLED_AGENTS)]
        agents_dir: PathBuf,
        #[arg(required = true)]
        question: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::from_default_env().add_directive("persona=info".parse()?);
    if cli.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(CredenceError::MissingApiKey) => {
            eprintln!("Please set your OPENAI_API_KEY in the .env file");
            eprintln!("Get your API key from: https://platform.openai.com/api-keys");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    config.log_redacted();

    let mut openai = OpenAi::new(&config.openai_api_key, &config.persona_model);
    if let Some(url) = &config.openai_base_url {
        openai = openai.with_base_url(url);
    }
    let model: Arc<dyn ChatModel> = Arc::new(openai);
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Intro => scenario::intro(model, &mut stdout).await?,
        Command::Chat { spec } => {
            let spec = match spec {
                Some(path) => AgentSpec::load(path)?,
                None => AgentSpec::lisa(),
            };
            chat(Persona::new(spec, model), &mut stdout).await?;
        }
        Command::Team { agents_dir } => {
            scenario::team(model, &agents_dir, &mut stdout).await?;
            println!("\nSimulation and evaluation complete.");
        }
        Command::Ask {
            agent,
            agents_dir,
            question,
        } => {
            let spec = AgentSpec::resolve(&agent, &agents_dir)?;
            let mut persona = Persona::new(spec, model);
            let answer = scenario::ask(&mut persona, &question.join(" ")).await?;
            println!("{}: {answer}", persona.name());
        }
    }

    Ok(())
}

async fn chat(mut persona: Persona, out: &mut impl Write) -> Result<()> {
    let rule = "=".repeat(50);
    writeln!(out, "{rule}\nChat with {}\n{rule}", persona.name())?;
    writeln!(out, "Type 'quit' or 'exit' to end the conversation\n")?;
    info!(agent = persona.name(), "Chat started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        if let Err(e) = scenario::chat_turn(&mut persona, input, out).await {
            error!(error = %e, "Persona turn failed");
            writeln!(out, "Error: {e:#}")?;
        }
    }

    writeln!(out, "\nGoodbye!")?;
    Ok(())
}
