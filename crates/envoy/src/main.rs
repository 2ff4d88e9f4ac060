mod client;
mod config;

use anyhow::Result;
use archive_shared::DispatchResult;
use client::ApiClient;
use config::Config;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return Err(e);
        }
    };

    let args: Vec<String> = std::env::args().collect();
    let client = ApiClient::new(config.server_url.clone());

    // Default to interactive mode if no args
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("chat");

    match command {
        "chat" => interactive(&client).await?,
        "status" => match client.status().await {
            Ok(status) => println!("{}", serde_json::to_string_pretty(&status)?),
            Err(e) => {
                eprintln!("Failed to reach Astro Archive at {}: {}", config.server_url, e);
            }
        },
        "config" => {
            if args.len() < 3 {
                println!("Current config:");
                println!("  Server URL: {}", config.server_url);
            } else if args[2] == "set" && args.len() >= 5 && args[3] == "server" {
                config.set_server_url(&args[4])?;
                println!("Server URL updated to: {}", config.server_url);
            } else {
                print_usage();
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            // Treat everything else as one question
            let question = args[1..].join(" ");
            ask(&client, &question).await;
        }
    }

    Ok(())
}

async fn interactive(client: &ApiClient) -> Result<()> {
    println!("Astro Archive console. Ask about the inventory, or 'quit' to exit.\n");

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            break;
        }

        if input.is_empty() {
            continue;
        }

        ask(client, input).await;
        println!();
    }

    Ok(())
}

async fn ask(client: &ApiClient, question: &str) {
    match client.query(question).await {
        Ok(result) => print_result(&result),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn print_result(result: &DispatchResult) {
    println!("[{}]", result.mode);
    println!("{}", result.answer);
}

fn print_usage() {
    println!("Usage:");
    println!("  envoy                         Start interactive console");
    println!("  envoy <question>              Ask a single question");
    println!("  envoy status                  Show server mode and inventory size");
    println!("  envoy config                  Show current config");
    println!("  envoy config set server <url> Set server URL");
}
