use std::io::Write;
use std::sync::Arc;

use ai_client::{ChatModel, OpenAi};
use anyhow::Result;
use credence_common::{Config, CredenceError};
use credence_scoring::{CredibilityScorer, HttpFetcher, BROWSER_USER_AGENT, SCORING_USER_AGENT};
use credence_search::{searcher_from_config, SearchSummarizer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use credence_chat::{ChatSession, Flow};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("credence=info".parse()?)
                .add_directive("ai_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

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

    let mut model = OpenAi::new(&config.openai_api_key, &config.openai_model);
    if let Some(url) = &config.openai_base_url {
        model = model.with_base_url(url);
    }
    let model: Arc<dyn ChatModel> = Arc::new(model);

    let summarizer = SearchSummarizer::new(
        searcher_from_config(&config)?,
        CredibilityScorer::new(Arc::new(HttpFetcher::new(SCORING_USER_AGENT)?)),
        Arc::new(HttpFetcher::new(BROWSER_USER_AGENT)?),
        config.search_max_results,
    );

    let mut session = ChatSession::new(model, summarizer);
    let mut stdout = std::io::stdout();

    println!("GPT Chatbot with Credibility-Rated Web Search 🔍⭐");
    println!("{}", session.settings_banner());
    println!("Type /help for commands.\n");

    info!("Credence chat started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match session.handle_line(&line, &mut stdout).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                error!(error = %e, "Turn failed");
                println!("\nError: {e:#}");
            }
        }
        println!();
    }

    println!("Goodbye!");
    Ok(())
}
