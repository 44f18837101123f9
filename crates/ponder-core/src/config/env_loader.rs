//! Environment variable-based configuration overrides
//!
//! Variables use the `PONDER_` prefix:
//!
//! | Variable | Field |
//! |---|---|
//! | `PONDER_EXPERT_MODEL` / `_BASE_URL` / `_API_KEY` | `expert.*` |
//! | `PONDER_FAST_MODEL` / `_BASE_URL` / `_API_KEY` | `fast.*` |
//! | `PONDER_SEARCH_URL` | `search.base_url` |
//! | `PONDER_CACHE_DIR` | `cache.dir` |
//! | `PONDER_ATTEMPT_CAP` | `agent.attempt_cap` |
//! | `PONDER_LOG_LEVEL` | `logging.level` |

use super::config::PonderConfig;
use super::model_params::ModelParameters;
use crate::error::{PonderError, PonderResult};
use std::path::PathBuf;

/// Apply overrides from the process environment
pub fn apply_env(config: &mut PonderConfig) -> PonderResult<()> {
    apply_env_with(config, |name| std::env::var(name).ok())
}

/// Apply overrides using an arbitrary variable lookup
pub fn apply_env_with<F>(config: &mut PonderConfig, lookup: F) -> PonderResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    apply_model_env(&mut config.expert, "PONDER_EXPERT", &lookup);
    apply_model_env(&mut config.fast, "PONDER_FAST", &lookup);

    if let Some(url) = lookup("PONDER_SEARCH_URL") {
        config.search.base_url = url;
    }

    if let Some(dir) = lookup("PONDER_CACHE_DIR") {
        config.cache.dir = PathBuf::from(dir);
    }

    if let Some(cap) = lookup("PONDER_ATTEMPT_CAP") {
        config.agent.attempt_cap = cap
            .trim()
            .parse()
            .map_err(|_| PonderError::config(format!("Invalid PONDER_ATTEMPT_CAP value: {}", cap)))?;
    }

    if let Some(level) = lookup("PONDER_LOG_LEVEL") {
        config.logging.level = level;
    }

    Ok(())
}

fn apply_model_env<F>(params: &mut ModelParameters, prefix: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(model) = lookup(&format!("{}_MODEL", prefix)) {
        params.model = model;
    }
    if let Some(base_url) = lookup(&format!("{}_BASE_URL", prefix)) {
        params.base_url = Some(base_url);
    }
    if let Some(api_key) = lookup(&format!("{}_API_KEY", prefix)) {
        params.api_key = Some(api_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_models_and_agent() {
        let mut config = PonderConfig::default();
        let lookup = lookup_from(&[
            ("PONDER_EXPERT_MODEL", "gpt-oss-120b"),
            ("PONDER_FAST_BASE_URL", "http://fast.local/v1"),
            ("PONDER_ATTEMPT_CAP", "5"),
            ("PONDER_CACHE_DIR", "/var/tmp/ponder"),
        ]);

        apply_env_with(&mut config, lookup).unwrap();
        assert_eq!(config.expert.model, "gpt-oss-120b");
        assert_eq!(config.fast.base_url.as_deref(), Some("http://fast.local/v1"));
        assert_eq!(config.agent.attempt_cap, 5);
        assert_eq!(config.cache.dir, PathBuf::from("/var/tmp/ponder"));
    }

    #[test]
    fn test_invalid_attempt_cap() {
        let mut config = PonderConfig::default();
        let lookup = lookup_from(&[("PONDER_ATTEMPT_CAP", "three")]);
        assert!(apply_env_with(&mut config, lookup).is_err());
    }

    #[test]
    fn test_no_vars_leaves_config_untouched() {
        let mut config = PonderConfig::default();
        apply_env_with(&mut config, |_| None).unwrap();
        assert_eq!(config.expert.model, "gpt-4o");
        assert_eq!(config.agent.attempt_cap, 3);
    }
}
