//! docchat — ask questions about a PDF from the terminal.
//!
//! Ingests the document once (filter → chunk → index), then answers
//! questions against the index until EOF or "exit".

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use docchat_core::config::load_dotenv;
use docchat_core::Config;
use docchat_ingest::{IngestionPipeline, PdfRenderer, Renderer};
use docchat_llm::AnswerGenerator;

/// Chat with a PDF document.
#[derive(Parser, Debug)]
#[command(name = "docchat", version, about = "Chat with a PDF document")]
struct Cli {
    /// Path to the PDF to ingest.
    pdf: PathBuf,

    /// Ask a single question and exit (otherwise starts a prompt loop).
    #[arg(long, short)]
    question: Option<String>,

    /// Gemini API key (overrides the environment).
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name override.
    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = Cli::parse();

    let mut config = Config::from_env();
    if args.api_key.is_some() {
        config.llm.api_key = args.api_key.clone();
    }
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    config.validate().context("invalid configuration")?;
    config.log_summary();

    let bytes = std::fs::read(&args.pdf)
        .with_context(|| format!("failed to read {}", args.pdf.display()))?;

    let pipeline = IngestionPipeline::new(config.ingest.clone());
    let renderer = PdfRenderer::new();
    let index = pipeline
        .ingest_bytes(&renderer, &bytes)
        .with_context(|| format!("failed to ingest {}", args.pdf.display()))?;

    println!(
        "Ingested {}: {} pages ({} content, {} skipped), {} chunks, {} chars",
        args.pdf.display(),
        index.total_pages,
        index.content_pages,
        index.skipped_pages,
        index.chunk_count(),
        index.total_text_length
    );

    let generator =
        AnswerGenerator::from_config(&config).context("failed to create LLM provider")?;

    if let Some(question) = &args.question {
        let answer = generator.ask(&index, question).await?;
        println!("{answer}");
        return Ok(());
    }

    // Prompt loop: one question per line, empty line or "exit" quits.
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() || question.eq_ignore_ascii_case("exit") {
            break;
        }
        match generator.ask(&index, question).await {
            Ok(answer) => println!("{answer}\n"),
            Err(e) => eprintln!("error: {e}\n"),
        }
    }

    info!("bye");
    Ok(())
}
