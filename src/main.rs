// jarvis - a small assistant that runs your commands and answers your questions
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use jarvis_lib::{
    core::intents::normalize,
    knowledge::{
        http_client, ChatResponder, DuckDuckGo, KnowledgeChain, OpenRouter, Wikipedia,
        WolframAlpha,
    },
    store::{AppRegistry, MemoryStore},
    system::{Speaker, SystemSpeaker},
    Capabilities, Config, Console, ConversationHistory, Dispatcher, Result,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // .env is optional
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Grab whatever the user typed
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let result = match command.as_str() {
        "chat" => handle_chat(&args[2..]).await,
        "ask" => handle_ask(&args[2..]).await,
        "memory" => handle_memory(&args[2..]),
        "apps" => handle_apps(),
        "status" => handle_status(),
        "version" | "-v" | "--version" => {
            println!("jarvis v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn handle_chat(args: &[String]) -> Result<()> {
    let config = Config::from_env()?;
    let speak = config.speak || args.iter().any(|arg| arg == "--speak");

    let dispatcher = match build_dispatcher(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            // Say it out loud too; a voice user may not be looking at the screen
            if speak {
                if let Err(speech_err) = SystemSpeaker.speak(&e.user_message()) {
                    log::warn!("Speech failed: {}", speech_err);
                }
            }
            return Err(e);
        }
    };

    let mut console = Console::new(dispatcher);
    if speak {
        console = console.with_speaker(Arc::new(SystemSpeaker));
    }

    console.run_stdio().await
}

async fn handle_ask(args: &[String]) -> Result<()> {
    let command = args.join(" ");
    if command.trim().is_empty() {
        eprintln!("Usage: jarvis ask <command>");
        return Ok(());
    }

    let config = Config::from_env()?;
    let mut dispatcher = build_dispatcher(&config)?;
    let mut history = ConversationHistory::new();

    let response = dispatcher.process(&command, &mut history).await;
    println!("{}", response);

    Ok(())
}

fn handle_memory(args: &[String]) -> Result<()> {
    let config = Config::from_env()?;
    let mut memory = MemoryStore::open(&config.memory_file);

    match args.first().map(String::as_str) {
        None | Some("list") => {
            if memory.is_empty() {
                println!("Nothing memorized yet.");
                return Ok(());
            }

            println!("\nMemorized responses:");
            println!("{}", "=".repeat(60));
            for (i, (command, response)) in memory.entries().enumerate() {
                println!("{:3}. {}", i + 1, command);
                println!("     → {}", response);
            }
            println!("{}", "=".repeat(60));
        }
        Some("forget") => {
            let key = normalize(&args[1..].join(" "));
            if key.is_empty() {
                eprintln!("Usage: jarvis memory forget <command>");
                return Ok(());
            }
            match memory.remove(&key) {
                Some(_) => println!("Forgot '{}'.", key),
                None => println!("Nothing memorized for '{}'.", key),
            }
        }
        Some("clear") => {
            let count = memory.len();
            memory.clear();
            println!("Cleared {} memorized response(s).", count);
        }
        Some(other) => {
            eprintln!("Unknown memory command: {}", other);
            print_usage();
        }
    }

    Ok(())
}

fn handle_apps() -> Result<()> {
    let config = Config::from_env()?;
    let apps = AppRegistry::load(&config.apps_file);

    if apps.is_empty() {
        println!("No applications registered.");
        println!("Add them to {} as {{\"name\": \"path\"}}.", config.apps_file.display());
        return Ok(());
    }

    println!("\nRegistered applications:");
    println!("{}", "=".repeat(60));
    for (name, path) in apps.entries() {
        let status = if path.exists() { "✓" } else { "✗" };
        println!("  {} {:<16} {}", status, name, path.display());
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

fn handle_status() -> Result<()> {
    let config = Config::from_env()?;
    let memory = MemoryStore::open(&config.memory_file);
    let apps = AppRegistry::load(&config.apps_file);

    let set = |value: &Option<String>| if value.is_some() { "✓ Set" } else { "✗ Not set" };

    println!("\njarvis Status");
    println!("{}", "=".repeat(60));

    println!("\nStores:");
    println!("  Home:    {}", config.home.display());
    println!("  Memory:  {} ({} entries)", config.memory_file.display(), memory.len());
    println!("  Apps:    {} ({} entries)", config.apps_file.display(), apps.len());

    println!("\nCredentials:");
    println!("  {:<20} {}", "WOLFRAM_APP_ID:", set(&config.wolfram_app_id));
    println!("  {:<20} {}", "OPENROUTER_API_KEY:", set(&config.openrouter_api_key));

    println!("\nSettings:");
    println!("  Chat model:  {}", config.models.general);
    println!("  Code model:  {}", config.models.code);
    println!("  Language:    {}", config.language);
    println!("  Timeout:     {}s", config.timeout.as_secs());
    println!("  Speech:      {}", if config.speak { "on" } else { "off" });

    println!("{}", "=".repeat(60));

    Ok(())
}

/// Wire the real capabilities into a dispatcher
fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let app_id = config.require_knowledge_credential()?;
    let client = http_client(config.timeout)?;

    let knowledge = KnowledgeChain::new(
        Arc::new(DuckDuckGo::new(client.clone())),
        Arc::new(WolframAlpha::new(client.clone(), app_id)),
        Arc::new(Wikipedia::new(client.clone())),
        ChatResponder::new(
            Arc::new(OpenRouter::new(client, config.openrouter_api_key.clone())),
            config.models.clone(),
        ),
    );

    let memory = MemoryStore::open(&config.memory_file);
    let apps = AppRegistry::load(&config.apps_file);
    let caps = Capabilities::system(config.image_command.clone());

    Ok(Dispatcher::new(memory, apps, knowledge, caps).with_default_language(config.language))
}

fn print_usage() {
    println!(
        r#"jarvis v{} - Your assistant in the terminal

USAGE:
    jarvis <COMMAND> [OPTIONS]

COMMANDS:
    chat [--speak]          Start an interactive session
    ask <command>           Run one command and print the response
    memory [list]           Show memorized responses
    memory forget <command> Forget one memorized response
    memory clear            Forget everything
    apps                    List registered applications
    status                  Show configuration and store summary
    version                 Show version
    help                    Show this help

EXAMPLES:
    jarvis chat --speak
    jarvis ask what is the capital of france
    jarvis ask open chrome
    jarvis memory forget who is ada lovelace

CONFIGURATION:
    Set WOLFRAM_APP_ID (required) and OPENROUTER_API_KEY in the
    environment or a .env file. Run 'jarvis status' to check.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
