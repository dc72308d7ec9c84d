//! Prompt templates for the chain steps.
//!
//! Each step has one YAML file under `atelier/prompts/` with the template text
//! and the sampling temperature for that step. The files are embedded at
//! compile time and can be overridden per directory; see [`load`].

mod load;

pub use load::{default_from_embedded, load, load_or_default, LoadError};

use serde::Deserialize;

/// One step's prompt: template text plus the sampling temperature.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StepPrompt {
    pub template: String,
    pub temperature: f32,
}

impl Default for StepPrompt {
    fn default() -> Self {
        Self {
            template: String::new(),
            temperature: 0.7,
        }
    }
}

impl StepPrompt {
    /// Substitutes `{name}` tokens in the template with the given values.
    ///
    /// Only the listed tokens are replaced; literal braces elsewhere in the
    /// template (JSON schema examples) pass through untouched.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = self.template.clone();
        for (name, value) in vars {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

/// The full set of step prompts, one per chain step.
#[derive(Debug, Clone, Default)]
pub struct ChainPrompts {
    pub normalize: StepPrompt,
    pub market: StepPrompt,
    pub angles: StepPrompt,
    pub ideas: StepPrompt,
    pub critic: StepPrompt,
    pub compliance: StepPrompt,
    pub localize: StepPrompt,
}
