//! Interactive chat session on top of the toolchat orchestrator

use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use toolchat_core::{
    Agent, ConsoleLogger, LogLevel, McpGateway, OllamaTransport, ProviderCommand, ToolRegistry,
    DEFAULT_MAX_TOOL_TURNS,
};

const SYSTEM_PROMPT: &str =
    "You are an agent that uses the tools available in the conversation to answer the user";

#[derive(Debug, Parser)]
#[command(name = "toolchat", about = "Chat with a local model that can call tools", version)]
struct Cli {
    /// Base URL of the Ollama-compatible chat backend
    #[arg(long, default_value = "http://localhost:11434", env = "TOOLCHAT_BASE_URL")]
    base_url: String,

    /// Model to chat with; falls back to the first available model
    #[arg(long, default_value = "mistral:latest", env = "TOOLCHAT_MODEL")]
    model: String,

    /// Opaque bearer credential forwarded to the backend
    #[arg(long, env = "TOOLCHAT_TOKEN")]
    token: Option<String>,

    /// Command that starts the tool-provider process
    #[arg(long, env = "TOOLCHAT_PROVIDER_CMD")]
    provider_cmd: Option<String>,

    /// Arguments for the tool-provider command (repeatable)
    #[arg(long = "provider-arg")]
    provider_args: Vec<String>,

    /// Maximum tool rounds within one turn
    #[arg(long, default_value_t = DEFAULT_MAX_TOOL_TURNS)]
    max_tool_turns: usize,

    /// Also print debug-level log lines
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let min_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    let logger = Arc::new(ConsoleLogger::new().with_min_level(min_level));

    let mut transport = OllamaTransport::new(&cli.base_url, logger.clone());
    if let Some(token) = &cli.token {
        transport = transport.with_bearer_token(token);
    }

    // Without a configured provider command the connect attempt fails
    // immediately and the agent continues with local tools only.
    let provider = ProviderCommand::new(cli.provider_cmd.clone().unwrap_or_default())
        .with_args(cli.provider_args.clone());
    let gateway = Arc::new(McpGateway::new(provider, logger.clone()));
    let registry = Arc::new(ToolRegistry::with_builtins(logger.clone()));

    let model = match pick_model(&transport, &cli.model).await {
        Some(model) => model,
        None => return ExitCode::FAILURE,
    };

    let mut agent = Agent::new(
        Arc::new(transport),
        gateway,
        registry,
        logger,
        SYSTEM_PROMPT,
    )
    .with_max_tool_turns(cli.max_tool_turns);

    if let Err(e) = agent.setup().await {
        eprintln!("❌ {e}");
        eprintln!("Make sure the chat backend is installed and running at {}", cli.base_url);
        return ExitCode::FAILURE;
    }

    let result = interactive_chat(&mut agent, &model).await;
    agent.cleanup().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

/// Validate the requested model against the backend, falling back to
/// the first available one.
async fn pick_model(transport: &OllamaTransport, requested: &str) -> Option<String> {
    let models = match transport.list_models().await {
        Ok(models) => models,
        Err(e) => {
            eprintln!("❌ Could not list models: {e}");
            return None;
        }
    };

    if models.iter().any(|m| m == requested) {
        return Some(requested.to_string());
    }

    println!("Model '{requested}' is not available locally.");
    if models.is_empty() {
        eprintln!("No models available. Exiting.");
        return None;
    }

    println!("Available models:");
    for model in &models {
        println!(" - {model}");
    }
    println!("Using model: {}", models[0]);
    Some(models[0].clone())
}

async fn interactive_chat(agent: &mut Agent, model: &str) -> std::io::Result<()> {
    println!("\nStarting chat (type '/exit' to quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "/exit" | "/quit") {
            break;
        }

        println!("Generating response...");
        match agent.run_turn(model, input).await {
            Ok(answer) => println!("\n{model}: {answer}"),
            Err(e) => eprintln!("Could not get a response: {e}"),
        }
    }

    Ok(())
}
