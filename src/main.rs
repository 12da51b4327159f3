//! Strictly Vault - terminal driver
//!
//! Runs the game hub's two modes (password vault, general chat) over stdin.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, VaultInput};
use std::path::Path;
use strictly_vault::{
    Adversary, ChatCompletion, ChatSession, GuardianConfig, LlmClient, Speaker, VaultError,
    VaultSession, VaultStatus,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Vault { config, seed } => {
            let client = build_client(&config)?;
            let session = match seed {
                Some(seed) => VaultSession::seeded(client, seed),
                None => VaultSession::start(client),
            };
            run_vault(session).await
        }
        Command::Chat { config } => {
            let client = build_client(&config)?;
            run_chat(ChatSession::new(client)).await
        }
    }
}

/// Builds the LLM client from config file and environment.
#[instrument(skip(path), fields(path = %path.display()))]
fn build_client(path: &Path) -> Result<LlmClient> {
    let config = GuardianConfig::load_or_default(path)?;
    let llm_config = config.create_llm_config()?;
    Ok(LlmClient::new(llm_config))
}

/// Interactive vault loop.
async fn run_vault<A: Adversary>(mut session: VaultSession<A>) -> Result<()> {
    info!("Starting vault mode");
    println!("Talk the guardian out of its password. /guess <password>, /restart, /quit");
    println!("--- Level {} ---", session.level());

    let mut printed = 0;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let result = match VaultInput::parse(&line) {
            VaultInput::Quit => break,
            VaultInput::Restart => {
                session.restart();
                printed = 0;
                println!("--- Level {} ---", session.level());
                Ok(())
            }
            VaultInput::Guess(guess) => session.submit_guess(guess).map(|_| ()),
            VaultInput::Message(text) => session.send_message(text).await.map(|_| ()),
        };

        match result {
            Ok(()) => {}
            Err(VaultError::InvalidLevelTransition) => {
                println!("The vault is open. /restart to play again or /quit.");
            }
            Err(e) => {
                warn!(error = %e, "Input rejected");
                println!("({})", e);
            }
        }

        for entry in &session.transcript().entries()[printed..] {
            if *entry.speaker() == Speaker::Adversary {
                println!("guardian> {}", entry.text());
            }
        }
        printed = session.transcript().len();

        if session.status() == VaultStatus::Won {
            println!("You won! /restart to play again or /quit.");
        }
    }

    info!("Leaving vault mode");
    Ok(())
}

/// Interactive chat loop.
async fn run_chat<C: ChatCompletion>(mut session: ChatSession<C>) -> Result<()> {
    info!("Starting chat mode");
    println!("Chat with the assistant. /clear, /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "/quit" => break,
            "/clear" => {
                session.clear();
                println!("(history cleared)");
            }
            _ => match session.send(line).await {
                Ok(reply) => println!("assistant> {}", reply),
                Err(e) => {
                    warn!(error = %e, "Chat turn failed");
                    if let Some(last) = session.messages().last().filter(|m| m.is_fallback()) {
                        println!("assistant> {}", last.content());
                    }
                }
            },
        }
    }

    info!("Leaving chat mode");
    Ok(())
}
