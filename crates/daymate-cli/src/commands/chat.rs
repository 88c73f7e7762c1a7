//! Assistant chat commands for CLI.

use std::io::{BufRead, Write};

use clap::Subcommand;
use daymate_core::backend::BackendClient;
use daymate_core::{ChatSession, Config, Reply};

#[derive(Subcommand)]
pub enum ChatAction {
    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,
        /// Answer with the built-in responder instead of the backend
        #[arg(long)]
        local: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive conversation (empty line or EOF to quit)
    Repl {
        /// Answer with the built-in responder instead of the backend
        #[arg(long)]
        local: bool,
    },
    /// Fetch starter suggestions from the backend
    Suggestions,
    /// Check that the backend is reachable
    Health,
}

fn session(local: bool) -> Result<ChatSession, Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if local {
        config.assistant.use_backend = false;
    }
    Ok(ChatSession::from_config(&config)?)
}

fn print_reply(reply: &Reply) {
    println!("{}", reply.text);
    if !reply.suggestions.is_empty() {
        println!("  suggestions: {}", reply.suggestions.join(" | "));
    }
}

pub fn run(action: ChatAction) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    match action {
        ChatAction::Send {
            message,
            local,
            json,
        } => {
            let mut session = session(local)?;
            match rt.block_on(session.send(&message)) {
                Some(reply) if json => println!("{}", serde_json::to_string_pretty(&reply)?),
                Some(reply) => print_reply(&reply),
                None => return Err("message is empty".into()),
            }
        }
        ChatAction::Repl { local } => {
            let mut session = session(local)?;
            let chips = rt.block_on(session.load_initial_suggestions());
            if let Some(greeting) = session.messages().first() {
                print_reply(&Reply {
                    text: greeting.text.clone(),
                    suggestions: chips,
                });
            }

            let stdin = std::io::stdin();
            let mut lines = stdin.lock().lines();
            loop {
                print!("> ");
                std::io::stdout().flush()?;
                let Some(line) = lines.next().transpose()? else {
                    break;
                };
                if line.trim().is_empty() {
                    break;
                }
                if let Some(reply) = rt.block_on(session.send(&line)) {
                    print_reply(&reply);
                }
            }
        }
        ChatAction::Suggestions => {
            let client = BackendClient::new(Config::load_or_default().backend)?;
            for suggestion in rt.block_on(client.suggestions())? {
                println!("{suggestion}");
            }
        }
        ChatAction::Health => {
            let client = BackendClient::new(Config::load_or_default().backend)?;
            let status = rt.block_on(client.health())?;
            println!("{}", serde_json::to_string_pretty(&status)?);
            if !status.is_healthy() {
                return Err(format!("backend reports status '{}'", status.status).into());
            }
        }
    }
    Ok(())
}
