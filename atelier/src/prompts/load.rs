//! Load step prompts from a directory of YAML files.
//!
//! **Canonical source**: Default prompt text lives in `atelier/prompts/*.yaml`; the
//! files are embedded at compile time and used when no `PROMPTS_DIR` or directory
//! is present. See [`load`], [`load_or_default`], and [`default_from_embedded`].

use std::path::Path;

use serde::Deserialize;

use super::{ChainPrompts, StepPrompt};

/// Embedded default YAML (canonical source: `atelier/prompts/*.yaml`).
macro_rules! embed_prompt_yaml {
    ($name:literal) => {
        include_str!(concat!("../../prompts/", $name))
    };
}
const EMBED_NORMALIZE: &str = embed_prompt_yaml!("normalize.yaml");
const EMBED_MARKET: &str = embed_prompt_yaml!("market.yaml");
const EMBED_ANGLES: &str = embed_prompt_yaml!("angles.yaml");
const EMBED_IDEAS: &str = embed_prompt_yaml!("ideas.yaml");
const EMBED_CRITIC: &str = embed_prompt_yaml!("critic.yaml");
const EMBED_COMPLIANCE: &str = embed_prompt_yaml!("compliance.yaml");
const EMBED_LOCALIZE: &str = embed_prompt_yaml!("localize.yaml");

/// Error when loading prompts from a directory (missing dir, invalid YAML).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("prompts directory not found or not readable: {0}")]
    DirNotFound(String),
    #[error("failed to read prompts file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("failed to parse YAML in {path}: {message}")]
    ParseYaml { path: String, message: String },
}

/// Names of YAML files under the prompts directory (one per step).
const NORMALIZE_FILE: &str = "normalize.yaml";
const MARKET_FILE: &str = "market.yaml";
const ANGLES_FILE: &str = "angles.yaml";
const IDEAS_FILE: &str = "ideas.yaml";
const CRITIC_FILE: &str = "critic.yaml";
const COMPLIANCE_FILE: &str = "compliance.yaml";
const LOCALIZE_FILE: &str = "localize.yaml";

/// Default directory name when `PROMPTS_DIR` is not set.
const DEFAULT_PROMPTS_DIR: &str = "prompts";

/// Returns the directory to load prompts from: `dir` if `Some`, else `PROMPTS_DIR` env, else `DEFAULT_PROMPTS_DIR`.
fn prompts_dir(dir: Option<&Path>) -> std::path::PathBuf {
    dir.map(std::path::PathBuf::from).unwrap_or_else(|| {
        std::env::var("PROMPTS_DIR")
            .ok()
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| std::path::PathBuf::from(DEFAULT_PROMPTS_DIR))
    })
}

/// Tries to read and parse a YAML file into `T`. Missing file returns `None`.
fn read_yaml_file<T>(dir: &Path, name: &str) -> Result<Option<T>, LoadError>
where
    T: for<'de> Deserialize<'de>,
{
    let path = dir.join(name);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Ok(None);
            }
            return Err(LoadError::ReadFile {
                path: path.display().to_string(),
                message: e.to_string(),
            });
        }
    };
    let value: T = serde_yaml::from_str(&content).map_err(|e| LoadError::ParseYaml {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(value))
}

fn parse_embedded(yaml: &str) -> StepPrompt {
    serde_yaml::from_str(yaml).unwrap_or_default()
}

/// Loads step prompts from a directory: reads one YAML per step and falls back
/// to the embedded default for any file that is missing.
///
/// If `dir` is `None`, uses `PROMPTS_DIR` env or default `./prompts`. Only
/// returns an error when the directory itself is missing or a present file
/// fails to parse.
pub fn load(dir: Option<&Path>) -> Result<ChainPrompts, LoadError> {
    let base = prompts_dir(dir);
    if !base.exists() || !base.is_dir() {
        return Err(LoadError::DirNotFound(base.display().to_string()));
    }

    let normalize = read_yaml_file::<StepPrompt>(&base, NORMALIZE_FILE)?
        .unwrap_or_else(|| parse_embedded(EMBED_NORMALIZE));
    let market = read_yaml_file::<StepPrompt>(&base, MARKET_FILE)?
        .unwrap_or_else(|| parse_embedded(EMBED_MARKET));
    let angles = read_yaml_file::<StepPrompt>(&base, ANGLES_FILE)?
        .unwrap_or_else(|| parse_embedded(EMBED_ANGLES));
    let ideas = read_yaml_file::<StepPrompt>(&base, IDEAS_FILE)?
        .unwrap_or_else(|| parse_embedded(EMBED_IDEAS));
    let critic = read_yaml_file::<StepPrompt>(&base, CRITIC_FILE)?
        .unwrap_or_else(|| parse_embedded(EMBED_CRITIC));
    let compliance = read_yaml_file::<StepPrompt>(&base, COMPLIANCE_FILE)?
        .unwrap_or_else(|| parse_embedded(EMBED_COMPLIANCE));
    let localize = read_yaml_file::<StepPrompt>(&base, LOCALIZE_FILE)?
        .unwrap_or_else(|| parse_embedded(EMBED_LOCALIZE));

    Ok(ChainPrompts {
        normalize,
        market,
        angles,
        ideas,
        critic,
        compliance,
        localize,
    })
}

/// Returns default prompts by parsing the embedded YAML in `atelier/prompts/*.yaml`.
///
/// This is the single source of truth for default prompt text; no duplicate
/// strings in Rust. Used by [`load_or_default`] when no directory is present
/// and by tests.
pub fn default_from_embedded() -> ChainPrompts {
    ChainPrompts {
        normalize: parse_embedded(EMBED_NORMALIZE),
        market: parse_embedded(EMBED_MARKET),
        angles: parse_embedded(EMBED_ANGLES),
        ideas: parse_embedded(EMBED_IDEAS),
        critic: parse_embedded(EMBED_CRITIC),
        compliance: parse_embedded(EMBED_COMPLIANCE),
        localize: parse_embedded(EMBED_LOCALIZE),
    }
}

/// Loads prompts from `dir` if the directory exists; otherwise returns default from embedded YAML.
pub fn load_or_default(dir: Option<&Path>) -> ChainPrompts {
    load(dir).unwrap_or_else(|_| default_from_embedded())
}
