//! Resolver configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What to do with a mention token when the caller supplied no resolved
/// mentions for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedMention {
    /// Look up the id the token encodes (one gateway call).
    #[default]
    LookupById,
    /// Report `NotFound` without calling the gateway.
    NotFound,
}

/// Resolver configuration.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use memberfind::ResolverConfig;
///
/// let config = ResolverConfig::from_json_str(r#"{ "name_search_limit": 10 }"#).unwrap();
/// assert_eq!(config.name_search_limit, 10);
/// assert_eq!(config.min_query_chars, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Name searches are refused below this many characters.
    pub min_query_chars: usize,
    /// Result limit for bare-name prefix searches.
    pub name_search_limit: usize,
    /// Result limit for `name#discriminator` prefix searches.
    pub tag_search_limit: usize,
    /// Maximum entries shown in an ambiguous result.
    pub ambiguous_display_limit: usize,
    /// Handling of mention tokens with no supplied mentions.
    pub unresolved_mention: UnresolvedMention,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_query_chars: 4,
            name_search_limit: 5,
            tag_search_limit: 1,
            ambiguous_display_limit: 7,
            unresolved_mention: UnresolvedMention::default(),
        }
    }
}

impl ResolverConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// Checks that every limit can produce a useful search.
    ///
    /// An ambiguous result always shows at least two entries, so a display
    /// limit below two is rejected rather than silently raised.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name_search_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "name_search_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tag_search_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tag_search_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.ambiguous_display_limit < 2 {
            return Err(ConfigError::InvalidValue {
                field: "ambiguous_display_limit",
                reason: "must be at least 2".to_string(),
            });
        }
        Ok(())
    }
}
