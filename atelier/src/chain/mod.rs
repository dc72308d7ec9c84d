//! The eight-step campaign chain.
//!
//! Seven prompt steps run in a fixed order, each consuming the previous
//! step's typed output; the eighth step is a pure formatting pass with no
//! model call. See [`Chain::run`].

mod steps;

pub use steps::{
    compliance_check, critic_improve, generate_angles, localize_polish, market_intelligence,
    normalize_brief, write_ideas,
};

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use crate::campaign::{Campaign, RawBrief};
use crate::context::MarketContext;
use crate::error::ChainError;
use crate::llm::ModelClient;
use crate::prompts::ChainPrompts;
use crate::render;

/// Number of steps in the chain, counting the final formatting pass.
pub const STEP_COUNT: usize = 8;

/// Progress notification emitted as each step starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainEvent {
    pub step: usize,
    pub label: &'static str,
}

/// The campaign chain: one model client plus the step prompts.
pub struct Chain {
    model: Arc<dyn ModelClient>,
    prompts: ChainPrompts,
}

impl Chain {
    pub fn new(model: Arc<dyn ModelClient>, prompts: ChainPrompts) -> Self {
        Self { model, prompts }
    }

    /// Runs the full chain over the raw brief and returns the campaign.
    ///
    /// `events` receives one [`ChainEvent`] as each step starts; pass `None`
    /// when no progress display is attached. The final markdown never
    /// contains raw JSON: every model reply is parsed into typed values
    /// before the presenter sees it.
    pub async fn run(
        &self,
        raw: RawBrief,
        ctx: &MarketContext,
        events: Option<mpsc::UnboundedSender<ChainEvent>>,
    ) -> Result<Campaign, ChainError> {
        let model = self.model.as_ref();
        let raw = raw.with_defaults();

        notify(&events, 1, "Normalizing brief...");
        let brief = steps::normalize_brief(model, &self.prompts, &raw).await?;

        notify(&events, 2, "Analyzing KSA market intelligence...");
        let report = steps::market_intelligence(model, &self.prompts, &brief, ctx).await?;

        notify(&events, 3, "Generating culturally-informed creative angles...");
        let angles =
            steps::generate_angles(model, &self.prompts, &brief, &report.market_insights, ctx)
                .await?;

        notify(&events, 4, "Writing campaign ideas...");
        let drafts = steps::write_ideas(model, &self.prompts, &brief, &angles.angles).await?;

        notify(&events, 5, "Critiquing and improving ideas...");
        let improved = steps::critic_improve(model, &self.prompts, &brief, &drafts.ideas).await?;

        notify(&events, 6, "Checking compliance and cultural guidelines...");
        let checked =
            steps::compliance_check(model, &self.prompts, &brief, &improved.ideas).await?;

        notify(&events, 7, "Localizing and polishing...");
        let localized =
            steps::localize_polish(model, &self.prompts, &brief, &checked.ideas).await?;
        if localized.ideas.is_empty() {
            return Err(ChainError::NoIdeas);
        }

        notify(&events, 8, "Formatting result...");
        let markdown = render::present_markdown(&localized.ideas);

        Ok(Campaign {
            brief,
            market_insights: report.market_insights,
            angles: angles.angles,
            ideas: localized.ideas,
            markdown,
        })
    }
}

fn notify(events: &Option<mpsc::UnboundedSender<ChainEvent>>, step: usize, label: &'static str) {
    info!(step, label, "chain step");
    if let Some(tx) = events {
        // A dropped receiver only means nobody is watching progress.
        let _ = tx.send(ChainEvent { step, label });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockModel;
    use crate::prompts;

    fn scripted_chain(replies: Vec<&str>) -> Chain {
        Chain::new(
            Arc::new(MockModel::with_replies(replies)),
            prompts::default_from_embedded(),
        )
    }

    fn full_script() -> Vec<&'static str> {
        vec![
            r#"{"product":"Dates box","description":"Gift box","audience":"People in Riyadh, Saudi Arabia","tone":"Warm","language":"English","objectives":["awareness"],"constraints":[]}"#,
            r#"{"market_insights":{"cultural_moments":["National Day"],"local_trends":["Gifting"],"target_behaviors":["Evening shopping"],"competitive_landscape":["Local brands"],"opportunities":["Seasonal bundles"],"seasonal_relevance":["Cooler weather"]}}"#,
            r#"{"angles":[{"id":"1","title":"Golden hour","insight":"Evenings matter","key_message":"Share the moment","cultural_hook":"Majlis gatherings","timing_consideration":"Weekend evenings"}]}"#,
            r#"{"ideas":[{"label":"A","based_on_angle_id":"1","tagline":"Draft","script_30s":"Draft script.","captions":{"instagram":"ig","x":"x"},"cta":"Buy now"}]}"#,
            r#"{"ideas":[{"label":"A","based_on_angle_id":"1","tagline":"Improved","script_30s":"Improved script.","captions":{"instagram":"ig","x":"x"},"cta":"Buy now"}]}"#,
            r#"{"ideas":[{"label":"A","based_on_angle_id":"1","tagline":"Improved","script_30s":"Improved script.","captions":{"instagram":"ig","x":"x"},"cta":"Buy now","compliance_notes":"Softened urgency wording."}]}"#,
            r#"{"ideas":[{"label":"A","based_on_angle_id":"1","tagline":"Polished","script_30s":"Polished script.","captions":{"instagram":"ig","x":"x"},"cta":"Buy now","compliance_notes":"Softened urgency wording."}]}"#,
        ]
    }

    /// **Scenario**: a full run emits one event per step, in order, with the
    /// progress labels the UI shows.
    #[tokio::test]
    async fn run_emits_events_in_order() {
        let chain = scripted_chain(full_script());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ctx = MarketContext::now();

        let campaign = chain
            .run(RawBrief::default(), &ctx, Some(tx))
            .await
            .unwrap();
        assert!(campaign.markdown.contains("### Option A"));

        let mut seen = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            seen.push(ev);
        }
        assert_eq!(seen.len(), STEP_COUNT);
        assert_eq!(seen[0].step, 1);
        assert_eq!(seen[0].label, "Normalizing brief...");
        assert_eq!(seen[6].label, "Localizing and polishing...");
        assert_eq!(seen[7].step, 8);
    }

    /// **Scenario**: the localization step returns an empty ideas array; the
    /// run fails with `NoIdeas` instead of rendering an empty page.
    #[tokio::test]
    async fn empty_final_ideas_is_an_error() {
        let mut script = full_script();
        script[6] = r#"{"ideas":[]}"#;
        let chain = scripted_chain(script);
        let ctx = MarketContext::now();

        let err = chain
            .run(RawBrief::default(), &ctx, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::NoIdeas));
    }
}
