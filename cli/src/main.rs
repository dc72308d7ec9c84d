//! Atelier CLI binary: one-shot campaign generation or the local web UI.
//!
//! Subcommands: `run` (chain once from flags, Markdown to stdout, progress to
//! stderr), `serve` (web UI on 127.0.0.1:8501).

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use atelier::{Chain, ChainEvent, GeminiClient, Language, MarketContext, RawBrief, STEP_COUNT};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(about = "Atelier: multi-step creative campaign generator for the KSA market")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the chain once and print the campaign
    Run(RunArgs),
    /// Serve the web UI (default 127.0.0.1:8501)
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct RunArgs {
    /// Product or offer, e.g. "Cycls Smart Bottle"
    #[arg(long, value_name = "TEXT", default_value = "")]
    product: String,

    /// Short description of the product, features, or offer
    #[arg(long, value_name = "TEXT", default_value = "")]
    description: String,

    /// Target audience; blank defaults to people in Riyadh
    #[arg(long, value_name = "TEXT", default_value = "")]
    audience: String,

    /// Tone, e.g. "friendly, inspiring, bold"
    #[arg(long, value_name = "TEXT", default_value = "")]
    tone: String,

    /// Output language: english or arabic
    #[arg(long, value_name = "LANG", default_value = "english")]
    language: String,

    /// Print the full campaign as JSON instead of Markdown
    #[arg(long)]
    json: bool,

    /// Write the output to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

impl RunArgs {
    fn raw_brief(&self) -> RawBrief {
        RawBrief {
            product: self.product.clone(),
            description: self.description.clone(),
            audience: self.audience.clone(),
            tone: self.tone.clone(),
            language: Language::from_name(&self.language),
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// HTTP listen address (default 127.0.0.1:8501)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply("atelier", None).ok();
    logging::init()?;

    let args = Args::parse();
    match args.cmd {
        Command::Serve(sa) => {
            let addr = sa
                .addr
                .unwrap_or_else(|| serve::DEFAULT_HTTP_ADDR.to_string());
            eprintln!("Serving the creative agent on http://{}", addr);
            if let Err(e) = serve::run_serve(Some(&addr)).await {
                eprintln!("atelier: {}", e);
                std::process::exit(1);
            }
        }
        Command::Run(ra) => {
            if let Err(e) = run_once(ra).await {
                eprintln!("atelier: {}", e);
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

/// One chain run: progress labels to stderr, the campaign to stdout or `--out`.
async fn run_once(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let model = Arc::new(GeminiClient::from_env()?);
    let prompts = atelier::prompts::load_or_default(None);
    let chain = Chain::new(model, prompts);

    let (tx, mut rx) = mpsc::unbounded_channel::<ChainEvent>();
    let progress = tokio::spawn(async move {
        while let Some(ev) = rx.recv().await {
            eprintln!("[{}/{}] {}", ev.step, STEP_COUNT, ev.label);
        }
    });

    let ctx = MarketContext::now();
    let result = chain.run(args.raw_brief(), &ctx, Some(tx)).await;
    // The sender is gone once the run returns, so this drains and stops.
    let _ = progress.await;
    let campaign = result?;

    let output = if args.json {
        serde_json::to_string_pretty(&campaign)?
    } else {
        campaign.markdown
    };
    match args.out {
        Some(path) => std::fs::write(path, format!("{}\n", output))?,
        None => println!("{}", output),
    }
    Ok(())
}
