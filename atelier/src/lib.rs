//! # Atelier
//!
//! A sequential-prompting campaign generator for the Saudi market. One product
//! brief goes in; eight fixed steps later a Markdown pitch with three campaign
//! options comes out. There is no agent loop and no branching: every run walks
//! the same chain, each step consuming the previous step's typed output.
//!
//! ## The chain
//!
//! 1. **Normalize** the raw form fields into a clean brief.
//! 2. **Market intelligence**: KSA insights anchored to the current Riyadh
//!    date, season, and cultural events.
//! 3. **Angles**: exactly five distinct creative angles.
//! 4. **Ideas**: three campaign ideas (Options A, B, C) built on the angles.
//! 5. **Critic**: critique and return improved versions.
//! 6. **Compliance**: KSA advertising and cultural review, with per-idea notes.
//! 7. **Localize**: Modern Standard Arabic localization or English polish.
//! 8. **Present**: pure Markdown formatting, no model call.
//!
//! Steps 1-7 each call Gemini once with a step-specific temperature and parse
//! the reply into typed values; the final output never contains raw JSON.
//!
//! ## Main modules
//!
//! - [`campaign`]: typed payloads flowing between steps ([`RawBrief`], [`Brief`],
//!   [`Idea`], [`Campaign`]).
//! - [`chain`]: the step functions and the [`Chain`] orchestrator.
//! - [`context`]: [`MarketContext`] with the Riyadh wall clock, season, and
//!   cultural events.
//! - [`llm`]: the [`ModelClient`] trait, the Gemini REST client, and a scripted
//!   mock for tests.
//! - [`prompts`]: step templates loaded from YAML (embedded defaults, directory
//!   overrides via `PROMPTS_DIR`).
//! - [`extract`]: tolerant JSON recovery from model replies.
//! - [`render`]: the Markdown presenter.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use atelier::{Chain, GeminiClient, MarketContext, RawBrief};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), atelier::ChainError> {
//! let model = Arc::new(GeminiClient::from_env()?);
//! let prompts = atelier::prompts::load_or_default(None);
//! let chain = Chain::new(model, prompts);
//!
//! let raw = RawBrief {
//!     product: "Saffron latte".to_string(),
//!     description: "A seasonal hot drink from a Riyadh cafe".to_string(),
//!     ..RawBrief::default()
//! };
//! let campaign = chain.run(raw, &MarketContext::now(), None).await?;
//! println!("{}", campaign.markdown);
//! # Ok(())
//! # }
//! ```
//!
//! The client reads `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), and honors
//! `GEMINI_MODEL`, `GEMINI_BASE_URL`, and `CHAIN_SYSTEM_PROMPT` overrides.

pub mod campaign;
pub mod chain;
pub mod context;
pub mod error;
pub mod extract;
pub mod llm;
pub mod prompts;
pub mod render;

pub use campaign::{
    Angle, Brief, Campaign, Captions, Idea, IdeaSet, Language, MarketInsights, RawBrief,
    DEFAULT_AUDIENCE,
};
pub use chain::{Chain, ChainEvent, STEP_COUNT};
pub use context::MarketContext;
pub use error::ChainError;
pub use llm::{GeminiClient, MockModel, ModelClient, ModelReply, TokenUsage};
pub use prompts::{ChainPrompts, StepPrompt};
pub use render::present_markdown;

/// When running `cargo test -p atelier`, initializes tracing from `RUST_LOG` so
/// that unit tests in `src/**` can print logs with `--nocapture`.
#[cfg(test)]
mod test_logging {
    use ctor::ctor;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::Layer;

    #[ctor]
    fn init() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_filter(filter),
            )
            .try_init();
    }
}
