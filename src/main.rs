use clap::Parser;
use colored::*;
use std::io::{self, BufRead, Write};
use std::process;

use r3ason::api::{CompletionTransport, HttpTransport};
use r3ason::cli::Args;
use r3ason::config::Config;
use r3ason::session::{DeliveryMode, ReasoningSession};
use r3ason::ui::display_turn;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.prompt.is_empty() && !args.interactive {
        print_usage();
        process::exit(1);
    }

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let mode = if args.buffered {
        DeliveryMode::Buffered
    } else {
        DeliveryMode::Incremental
    };

    if config.verbose {
        eprintln!("{}", format!("[r3ason] Using model: {}", config.model).dimmed());
        eprintln!(
            "{}",
            format!(
                "[r3ason] Delivery mode: {}",
                if args.buffered { "buffered" } else { "incremental" }
            )
            .dimmed()
        );
    }

    let transport = HttpTransport::new(
        &config.api_key,
        config.organization.as_deref(),
        &config.api_endpoint,
        config.stream_timeout,
        config.request_timeout,
        config.verbose,
    )?;

    let mut session = ReasoningSession::new(transport, config.model.clone());

    if !args.prompt.is_empty() {
        let prompt = args.prompt.join(" ");
        run_turn(&mut session, &prompt, mode).await;
    }

    if args.interactive {
        let stdin = io::stdin();
        loop {
            print!("{}", "> ".bold());
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            run_turn(&mut session, line, mode).await;
        }
    }

    Ok(())
}

async fn run_turn<T: CompletionTransport>(
    session: &mut ReasoningSession<T>,
    prompt: &str,
    mode: DeliveryMode,
) {
    let result = match mode {
        DeliveryMode::Incremental => {
            // Forward raw fragments for live-typing feedback
            let observer: &dyn Fn(&str) = &|delta| {
                print!("{}", delta);
                let _ = io::stdout().flush();
            };
            let result = session.submit_turn(prompt, mode, Some(observer)).await;
            println!("\n");
            result
        }
        DeliveryMode::Buffered => session.submit_turn(prompt, mode, None).await,
    };

    match result {
        Ok(output) => display_turn(&output),
        Err(e) => eprintln!("{} {}", "Error:".red(), e),
    }
}

fn print_usage() {
    eprintln!("{}", "Usage: r3ason [OPTIONS] <prompt>".red());
    eprintln!(
        "{}",
        "  -b, --buffered             Use one blocking request instead of streaming".dimmed()
    );
    eprintln!(
        "{}",
        "  -i, --interactive          Keep the session open for follow-up prompts".dimmed()
    );
    eprintln!(
        "{}",
        "      --api-endpoint         Custom API base URL".dimmed()
    );
}
