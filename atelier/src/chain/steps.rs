//! The individual prompt steps of the campaign chain.
//!
//! Every step follows the same shape: build a JSON payload from the previous
//! step's output, render the step's template, call the model, and parse the
//! reply back into a typed value. [`run_step`] carries that shape; the step
//! functions only differ in payload and target type.

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::campaign::{Angle, AngleSet, Brief, Idea, IdeaSet, MarketInsights, MarketReport, RawBrief};
use crate::context::MarketContext;
use crate::error::ChainError;
use crate::extract;
use crate::llm::ModelClient;
use crate::prompts::{ChainPrompts, StepPrompt};

/// Renders the prompt, calls the model, and parses the reply into `T`.
///
/// `step` names the step in errors so a bad reply points at the stage that
/// produced it.
async fn run_step<T>(
    model: &dyn ModelClient,
    step: &'static str,
    prompt: &StepPrompt,
    vars: &[(&str, &str)],
) -> Result<T, ChainError>
where
    T: DeserializeOwned,
{
    let rendered = prompt.render(vars);
    debug!(step, temperature = prompt.temperature, "running chain step");
    let reply = model.generate(&rendered, prompt.temperature).await?;
    let value = extract::json_value(&reply.text).ok_or_else(|| ChainError::InvalidJson {
        step,
        message: "model did not return valid JSON".to_string(),
    })?;
    serde_json::from_value(value).map_err(|e| ChainError::InvalidJson {
        step,
        message: e.to_string(),
    })
}

/// Step 1: turn the raw form fields into a normalized brief.
pub async fn normalize_brief(
    model: &dyn ModelClient,
    prompts: &ChainPrompts,
    raw: &RawBrief,
) -> Result<Brief, ChainError> {
    let payload = json!(raw).to_string();
    run_step(
        model,
        "normalize_brief",
        &prompts.normalize,
        &[("input", payload.as_str())],
    )
    .await
}

/// Step 2: market intelligence for the brief, anchored to the current
/// Riyadh date and season.
pub async fn market_intelligence(
    model: &dyn ModelClient,
    prompts: &ChainPrompts,
    brief: &Brief,
    ctx: &MarketContext,
) -> Result<MarketReport, ChainError> {
    let payload = json!({ "brief": brief, "current_context": ctx }).to_string();
    let events = ctx.cultural_events.join(", ");
    run_step(
        model,
        "market_intelligence",
        &prompts.market,
        &[
            ("input", payload.as_str()),
            ("context_note", ctx.context_note.as_str()),
            ("cultural_events", events.as_str()),
        ],
    )
    .await
}

/// Step 3: exactly five creative angles from the brief and insights.
pub async fn generate_angles(
    model: &dyn ModelClient,
    prompts: &ChainPrompts,
    brief: &Brief,
    insights: &MarketInsights,
    ctx: &MarketContext,
) -> Result<AngleSet, ChainError> {
    let payload = json!({
        "brief": brief,
        "market_insights": insights,
        "current_context": ctx,
    })
    .to_string();
    run_step(
        model,
        "angle_generator",
        &prompts.angles,
        &[
            ("input", payload.as_str()),
            ("context_note", ctx.context_note.as_str()),
            ("weekday", ctx.weekday.as_str()),
        ],
    )
    .await
}

/// Step 4: three campaign ideas (labels A, B, C) built on the angles.
pub async fn write_ideas(
    model: &dyn ModelClient,
    prompts: &ChainPrompts,
    brief: &Brief,
    angles: &[Angle],
) -> Result<IdeaSet, ChainError> {
    let payload = json!({ "brief": brief, "angles": angles }).to_string();
    run_step(
        model,
        "idea_writer",
        &prompts.ideas,
        &[("input", payload.as_str())],
    )
    .await
}

/// Step 5: critique the drafts and return improved versions only.
pub async fn critic_improve(
    model: &dyn ModelClient,
    prompts: &ChainPrompts,
    brief: &Brief,
    ideas: &[Idea],
) -> Result<IdeaSet, ChainError> {
    let payload = json!({ "brief": brief, "ideas": ideas }).to_string();
    run_step(
        model,
        "critic_improve",
        &prompts.critic,
        &[("input", payload.as_str())],
    )
    .await
}

/// Step 6: KSA compliance and cultural review; may rewrite ideas and adds
/// per-idea `compliance_notes`.
pub async fn compliance_check(
    model: &dyn ModelClient,
    prompts: &ChainPrompts,
    brief: &Brief,
    ideas: &[Idea],
) -> Result<IdeaSet, ChainError> {
    let payload = json!({ "brief": brief, "ideas": ideas }).to_string();
    run_step(
        model,
        "compliance_check",
        &prompts.compliance,
        &[("input", payload.as_str())],
    )
    .await
}

/// Step 7: localize to the requested language and apply the final polish.
pub async fn localize_polish(
    model: &dyn ModelClient,
    prompts: &ChainPrompts,
    brief: &Brief,
    ideas: &[Idea],
) -> Result<IdeaSet, ChainError> {
    let payload = json!({
        "language": brief.language,
        "tone": brief.tone,
        "ideas": ideas,
    })
    .to_string();
    run_step(
        model,
        "localize_polish",
        &prompts.localize,
        &[("input", payload.as_str())],
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockModel;
    use crate::prompts;

    fn brief() -> Brief {
        Brief {
            product: "Saffron latte".to_string(),
            description: "A seasonal hot drink".to_string(),
            audience: "People in Riyadh, Saudi Arabia".to_string(),
            tone: "Playful".to_string(),
            ..Brief::default()
        }
    }

    /// **Scenario**: the model replies with minified JSON; the step parses it
    /// into the typed wrapper and the prompt carries the payload.
    #[tokio::test]
    async fn normalize_parses_reply_and_embeds_payload() {
        let model = MockModel::with_reply(
            r#"{"product":"Saffron latte","description":"A seasonal hot drink","audience":"People in Riyadh, Saudi Arabia","tone":"Playful","language":"English","objectives":[],"constraints":[]}"#,
        );
        let prompts = prompts::default_from_embedded();
        let raw = RawBrief {
            product: "Saffron latte".to_string(),
            ..RawBrief::default()
        }
        .with_defaults();

        let out = normalize_brief(&model, &prompts, &raw).await.unwrap();
        assert_eq!(out.product, "Saffron latte");

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("\"product\":\"Saffron latte\""));
        assert!((calls[0].temperature - 0.4).abs() < f32::EPSILON);
    }

    /// **Scenario**: step 2 interpolates the date note and the month's
    /// cultural events into the prompt text.
    #[tokio::test]
    async fn market_prompt_carries_context() {
        let model = MockModel::with_reply(r#"{"market_insights":{}}"#);
        let prompts = prompts::default_from_embedded();
        let instant = chrono::DateTime::parse_from_rfc3339("2025-05-10T09:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let ctx = MarketContext::at(instant);

        let report = market_intelligence(&model, &prompts, &brief(), &ctx)
            .await
            .unwrap();
        assert!(report.market_insights.cultural_moments.is_empty());

        let calls = model.calls();
        assert!(calls[0].prompt.contains(&ctx.context_note));
        assert!(calls[0].prompt.contains("Eid preparations (varies)"));
        assert!(!calls[0].prompt.contains("{cultural_events}"));
    }

    /// **Scenario**: a reply that is prose instead of JSON fails with the
    /// step's name so the caller can see which stage broke.
    #[tokio::test]
    async fn non_json_reply_names_the_step() {
        let model = MockModel::with_reply("I cannot help with that.");
        let prompts = prompts::default_from_embedded();
        let err = write_ideas(&model, &prompts, &brief(), &[])
            .await
            .unwrap_err();
        match err {
            ChainError::InvalidJson { step, .. } => assert_eq!(step, "idea_writer"),
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }

    /// **Scenario**: a fenced ```json reply still parses through the
    /// extraction ladder.
    #[tokio::test]
    async fn fenced_reply_is_recovered() {
        let model = MockModel::with_reply("```json\n{\"ideas\":[]}\n```");
        let prompts = prompts::default_from_embedded();
        let out = critic_improve(&model, &prompts, &brief(), &[]).await.unwrap();
        assert!(out.ideas.is_empty());
    }

    /// **Scenario**: the localization payload is language and tone plus the
    /// ideas, nothing else from the brief.
    #[tokio::test]
    async fn localize_payload_has_language_and_tone() {
        let model = MockModel::with_reply(r#"{"ideas":[]}"#);
        let prompts = prompts::default_from_embedded();
        let mut b = brief();
        b.language = crate::campaign::Language::Arabic;

        localize_polish(&model, &prompts, &b, &[]).await.unwrap();

        let calls = model.calls();
        assert!(calls[0].prompt.contains("\"language\":\"Arabic\""));
        assert!(calls[0].prompt.contains("\"tone\":\"Playful\""));
        assert!(!calls[0].prompt.contains("\"product\""));
        assert!((calls[0].temperature - 0.5).abs() < f32::EPSILON);
    }
}
