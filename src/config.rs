//! Render options.
//!
//! Options are plain data with defaults, so they can be built in code or read
//! from a JSON document:
//!
//! ```ignore
//! let options = RenderOptions::from_json(r#"{ "prewarm_placeholders": 64 }"#)?;
//! let renderer = Renderer::with_options(host, options);
//! ```

use serde::Deserialize;

use crate::error::ConfigError;

/// Tuning knobs for a render context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Initial capacity of the placeholder free-list.
    pub placeholder_capacity: usize,
    /// Markers created up front when the context is built.
    pub prewarm_placeholders: usize,
    /// Log a warning when one list emission repeats a key.
    pub warn_on_duplicate_keys: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            placeholder_capacity: 200,
            prewarm_placeholders: 0,
            warn_on_duplicate_keys: true,
        }
    }
}

impl RenderOptions {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_prewarm(mut self, count: usize) -> Self {
        self.prewarm_placeholders = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.placeholder_capacity, 200);
        assert_eq!(options.prewarm_placeholders, 0);
        assert!(options.warn_on_duplicate_keys);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = RenderOptions::from_json(r#"{ "prewarm_placeholders": 8 }"#).unwrap();
        assert_eq!(options.prewarm_placeholders, 8);
        assert_eq!(options.placeholder_capacity, 200);
    }

    #[test]
    fn test_invalid_json() {
        let err = RenderOptions::from_json(r#"{ "prewarm_placeholders": "lots" }"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid render options"));
    }
}
