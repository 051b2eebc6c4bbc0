//! Conferenti agent CLI binary entry point.

use std::io::Write;

use clap::Parser;
use conferenti_agent::agent::Agent;
use conferenti_agent::backend::{AgentClient, BackendSelector};
use conferenti_agent::cli::{BackendArgs, ChatArgs, Cli, Commands, ReplInput};
use conferenti_agent::config::AgentConfig;
use conferenti_agent::types::TurnStatus;
use conferenti_agent::util::{turn_stream_with_timeout, turn_with_timeout};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AgentConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_level());

    let result = match cli.command {
        Commands::Chat(args) => handle_chat(args, config).await,
        Commands::Backend(args) => handle_backend(&args, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_backend(args: &BackendArgs, config: AgentConfig) -> CliResult<()> {
    let config = args.apply(config);
    let decision = BackendSelector::from_config(&config);
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

async fn handle_chat(args: ChatArgs, config: AgentConfig) -> CliResult<()> {
    let config = args.apply(config);
    let client = AgentClient::from_config(&config)?;
    let mut agent = client
        .create_agent(args.name.clone(), args.instructions())
        .await?
        .into_local()?;

    let stream = !args.no_stream;
    if let Some(prompt) = args.prompt.as_deref() {
        return if send(&mut agent, prompt, stream, &config).await {
            Ok(())
        } else {
            Err("turn failed".into())
        };
    }

    eprintln!(
        "Agent '{}' ready on {} ({}). Type 'exit' to quit, 'clear' to reset.",
        agent.name(),
        client.model(),
        client.family()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match ReplInput::parse(&line) {
            ReplInput::Empty => continue,
            ReplInput::Exit => break,
            ReplInput::Clear => {
                agent.clear_history();
                eprintln!("Conversation history cleared.");
            }
            ReplInput::Message(message) => {
                send(&mut agent, message, stream, &config).await;
            }
        }
    }
    Ok(())
}

/// Run one turn, printing the reply. Returns whether the turn succeeded.
async fn send(agent: &mut Agent, message: &str, stream: bool, config: &AgentConfig) -> bool {
    print!("Agent: ");
    let _ = std::io::stdout().flush();

    if stream {
        let turn = agent.run_streaming(message);
        let mut turn = match config.timeout() {
            Some(timeout) => turn_stream_with_timeout(timeout, turn).boxed_local(),
            None => turn.boxed_local(),
        };
        while let Some(chunk) = turn.next().await {
            match chunk.status {
                TurnStatus::Failed => {
                    println!();
                    eprintln!("Error: {}", chunk.error.unwrap_or_default());
                    return false;
                }
                _ => {
                    print!("{}", chunk.delta.unwrap_or_default());
                    let _ = std::io::stdout().flush();
                }
            }
        }
        println!();
        return true;
    }

    let turn = agent.run(message);
    let result = match config.timeout() {
        Some(timeout) => turn_with_timeout(timeout, turn).await,
        None => turn.await,
    };
    match result.status {
        TurnStatus::Completed => {
            println!("{}", result.content.unwrap_or_default());
            true
        }
        _ => {
            println!();
            eprintln!("Error: {}", result.error.unwrap_or_default());
            false
        }
    }
}
