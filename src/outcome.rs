//! Resolution outcomes.
//!
//! Every resolution produces exactly one [`Outcome`]. Turning an outcome
//! into user-facing text is left to the caller.

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateEntry;

/// A short-list of equally good matches.
///
/// Always holds at least two shown entries. Matches beyond the display limit
/// are dropped and only counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AmbiguityRepr")]
pub struct Ambiguity {
    shown: Vec<CandidateEntry>,
    omitted: usize,
}

#[derive(Deserialize)]
struct AmbiguityRepr {
    shown: Vec<CandidateEntry>,
    omitted: usize,
}

impl TryFrom<AmbiguityRepr> for Ambiguity {
    type Error = String;

    fn try_from(repr: AmbiguityRepr) -> Result<Self, Self::Error> {
        if repr.shown.len() < 2 {
            return Err(format!(
                "ambiguity needs at least two shown entries, got {}",
                repr.shown.len()
            ));
        }
        Ok(Self {
            shown: repr.shown,
            omitted: repr.omitted,
        })
    }
}

impl Ambiguity {
    /// Entries to present, in match order.
    #[must_use]
    pub fn shown(&self) -> &[CandidateEntry] {
        &self.shown
    }

    /// Number of matches left out of `shown`.
    #[must_use]
    pub const fn omitted(&self) -> usize {
        self.omitted
    }

    /// Total number of matches, shown or not.
    #[must_use]
    pub fn total(&self) -> usize {
        self.shown.len() + self.omitted
    }

    /// Display tags (`name#discriminator`) of the shown entries.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.shown.iter().map(CandidateEntry::tag).collect()
    }
}

/// The single result of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// The query was empty; nothing was selected and nothing was asked of
    /// the directory.
    NoSelection,

    /// Exactly one record matched.
    Resolved(CandidateEntry),

    /// Nothing matched.
    NotFound,

    /// Two or more records matched equally well.
    Ambiguous(Ambiguity),

    /// The query was too short to search by name.
    QueryTooShort,

    /// The query was a mention, but more than one mention was supplied.
    TooManyMentions,
}

impl Outcome {
    /// Builds an outcome from the surviving matches of a name search.
    ///
    /// Zero matches is `NotFound`, one is `Resolved`, more is `Ambiguous`
    /// with at most `display_limit` entries shown (never fewer than two).
    #[must_use]
    pub fn from_matches(mut matches: Vec<CandidateEntry>, display_limit: usize) -> Self {
        match matches.len() {
            0 => Self::NotFound,
            1 => Self::Resolved(matches.remove(0)),
            total => {
                let keep = display_limit.max(2).min(total);
                matches.truncate(keep);
                Self::Ambiguous(Ambiguity {
                    shown: matches,
                    omitted: total - keep,
                })
            }
        }
    }

    /// Returns the resolved entry, if any.
    #[must_use]
    pub const fn resolved(&self) -> Option<&CandidateEntry> {
        match self {
            Self::Resolved(entry) => Some(entry),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the resolved entry, if any.
    #[must_use]
    pub fn into_resolved(self) -> Option<CandidateEntry> {
        match self {
            Self::Resolved(entry) => Some(entry),
            _ => None,
        }
    }

    /// Returns true if exactly one record was selected.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Short label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoSelection => "no_selection",
            Self::Resolved(_) => "resolved",
            Self::NotFound => "not_found",
            Self::Ambiguous(_) => "ambiguous",
            Self::QueryTooShort => "query_too_short",
            Self::TooManyMentions => "too_many_mentions",
        }
    }
}
