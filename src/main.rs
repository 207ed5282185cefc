//! ollama-client - command-line entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::io::Write;

use ollama_client::{
    cli::{into_options, Args, Commands, Verbosity},
    telemetry, ChatMessage, ChunkStream, ClientError, OllamaClient, PullProgress, Reply,
};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    telemetry::init(args.verbosity());

    if let Err(e) = run(args).await {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.client_config().context("Invalid client configuration")?;
    let client = OllamaClient::from_config(&config)?;
    let verbosity = args.verbosity();

    match args.command {
        Commands::Generate { model, prompt, stream, options } => {
            let reply = client
                .generate_text(&model, &prompt, stream, into_options(options))
                .await?;
            print_reply(reply, |chunk| chunk["response"].as_str()).await
        }
        Commands::Chat { model, message, system, stream, options } => {
            let mut messages = Vec::new();
            if let Some(system) = system {
                messages.push(ChatMessage::system(system));
            }
            messages.push(ChatMessage::user(message));

            let reply = client
                .generate_chat(&model, &messages, stream, into_options(options))
                .await?;
            print_reply(reply, |chunk| chunk["message"]["content"].as_str()).await
        }
        Commands::Embed { model, prompt, options } => {
            let embedding = client
                .get_embeddings(&model, &prompt, into_options(options))
                .await?;
            println!("{}", serde_json::to_string(&embedding)?);
            Ok(())
        }
        Commands::List => {
            let models = client.list_models().await?;
            if models.is_empty() {
                println!("{}", "No models installed".yellow());
            }
            for model in models {
                println!("{:<40} {}", model.name.cyan(), model.description());
            }
            Ok(())
        }
        Commands::Pull { model, insecure, no_stream } => {
            let reply = client.pull_model(&model, insecure, !no_stream).await?;
            match reply {
                Reply::Complete(status) => {
                    let progress = PullProgress::from_chunk(&status)?;
                    println!("{} {}", "✓".green(), progress.status);
                    Ok(())
                }
                Reply::Stream(stream) => show_pull_progress(&model, stream, verbosity).await,
            }
        }
        Commands::Version => {
            let version = client.version().await?;
            println!("{} {}", client.base_url().dimmed(), version);
            Ok(())
        }
    }
}

/// Print a reply: whole object as JSON, or streamed text as it arrives
async fn print_reply<F>(reply: Reply, text_of: F) -> Result<()>
where
    F: Fn(&Value) -> Option<&str>,
{
    match reply {
        Reply::Complete(object) => {
            let object = ClientError::check_chunk(object)?;
            match text_of(&object) {
                Some(text) => println!("{}", text),
                None => println!("{}", serde_json::to_string_pretty(&object)?),
            }
            Ok(())
        }
        Reply::Stream(mut stream) => {
            let mut stdout = std::io::stdout();
            while let Some(chunk) = stream.next().await {
                let chunk = ClientError::check_chunk(chunk?)?;
                if let Some(text) = text_of(&chunk) {
                    write!(stdout, "{}", text)?;
                    stdout.flush()?;
                }
            }
            writeln!(stdout)?;
            Ok(())
        }
    }
}

async fn show_pull_progress(model: &str, mut stream: ChunkStream, verbosity: Verbosity) -> Result<()> {
    let pb = if verbosity.show_progress() {
        ProgressBar::new(0)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:30} [{bar:40.cyan/blue}] {bytes}/{total_bytes}")?
            .progress_chars("=> "),
    );

    let mut succeeded = false;
    while let Some(chunk) = stream.next().await {
        let progress = PullProgress::from_chunk(&chunk?)?;

        if let Some(total) = progress.total {
            pb.set_length(total);
        }
        if let Some(completed) = progress.completed {
            pb.set_position(completed);
        }
        pb.set_message(progress.status.clone());

        if progress.is_success() {
            succeeded = true;
        }
    }
    pb.finish_and_clear();

    if succeeded {
        println!("{} Pulled {}", "✓".green(), model.bold());
        Ok(())
    } else {
        anyhow::bail!("pull of '{}' ended without a success status", model)
    }
}
