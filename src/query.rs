//! Query classification.
//!
//! A raw query is sorted into exactly one [`SyntaxCategory`]. The syntaxes
//! are tried in a fixed order and the first one that matches the whole
//! (trimmed) query wins; anything left over is a bare name.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::candidate::CandidateId;

/// `<@ID>` or `<@!ID>`.
static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<@!?([0-9]{17,20})>$").expect("mention pattern is valid")
});

/// A bare 17-20 digit identifier.
static NUMERIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{17,20}$").expect("numeric id pattern is valid"));

/// `name#1234`. The name group is greedy: `a#b#1234` splits as `a#b` / `1234`,
/// and whitespace before `#` stays in the name when it fits in 32 chars.
static NAME_AND_DISCRIMINATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.{2,32})\s*#([0-9]{4})$").expect("name#discriminator pattern is valid")
});

/// The syntax a query was written in, with the fields it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyntaxCategory {
    /// A structured mention token wrapping an id.
    Mention {
        /// Id encoded in the token. `None` when the digits exceed the id
        /// range, so no record can carry it.
        id: Option<CandidateId>,
    },

    /// A bare numeric id.
    NumericId {
        /// The parsed id. `None` when the digits exceed the id range.
        id: Option<CandidateId>,
    },

    /// A `name#discriminator` pair.
    NameAndDiscriminator {
        /// Everything before the `#`, as captured.
        name: String,
        /// Exactly four digits.
        discriminator: String,
    },

    /// Anything else. Case is preserved.
    BareName {
        /// The trimmed query.
        name: String,
    },
}

impl SyntaxCategory {
    /// Short label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mention { .. } => "mention",
            Self::NumericId { .. } => "numeric_id",
            Self::NameAndDiscriminator { .. } => "name_and_discriminator",
            Self::BareName { .. } => "bare_name",
        }
    }

    /// True for the syntaxes that identify a record without a name search.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        matches!(self, Self::Mention { .. } | Self::NumericId { .. })
    }
}

/// Classifies a query. Total and side-effect free.
///
/// Anything matching a mention or id pattern keeps that syntax, even when
/// the digits are too large to be a real id.
///
/// # Examples
///
/// ```
/// use memberfind::query::{classify, SyntaxCategory};
///
/// assert!(matches!(classify("<@!155867458203287552>"), SyntaxCategory::Mention { .. }));
/// assert!(matches!(classify("155867458203287552"), SyntaxCategory::NumericId { .. }));
/// assert_eq!(
///     classify("Kodehawa#0001"),
///     SyntaxCategory::NameAndDiscriminator {
///         name: "Kodehawa".to_string(),
///         discriminator: "0001".to_string(),
///     }
/// );
/// assert_eq!(classify("  hawa "), SyntaxCategory::BareName { name: "hawa".to_string() });
/// ```
#[must_use]
pub fn classify(query: &str) -> SyntaxCategory {
    let query = query.trim();

    if let Some(caps) = MENTION.captures(query) {
        return SyntaxCategory::Mention {
            id: caps[1].parse().ok(),
        };
    }

    if NUMERIC_ID.is_match(query) {
        return SyntaxCategory::NumericId { id: query.parse().ok() };
    }

    if let Some(caps) = NAME_AND_DISCRIMINATOR.captures(query) {
        return SyntaxCategory::NameAndDiscriminator {
            name: caps[1].to_string(),
            discriminator: caps[2].to_string(),
        };
    }

    SyntaxCategory::BareName {
        name: query.to_string(),
    }
}
