//! Tiered name matching.
//!
//! Candidates returned by a prefix search are narrowed to a single tier of
//! matches. Tiers never mix: once a higher tier has a member, lower tiers
//! stop collecting, and only the best non-empty tier is returned.

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateEntry;

/// Match tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Case-sensitive equality.
    Exact,
    /// Case-insensitive equality.
    WrongCase,
    /// Case-insensitive prefix.
    StartsWith,
    /// Case-insensitive substring.
    Contains,
}

#[derive(Default)]
struct Buckets {
    exact: Vec<CandidateEntry>,
    wrong_case: Vec<CandidateEntry>,
    starts_with: Vec<CandidateEntry>,
    contains: Vec<CandidateEntry>,
}

/// Filters `candidates` down to the best tier for `query`.
///
/// Input order is preserved within the winning tier. An empty result means
/// no candidate matched at any tier.
#[must_use]
pub fn filter(candidates: &[CandidateEntry], query: &str) -> Vec<CandidateEntry> {
    filter_ranked(candidates, query)
        .map(|(_, matches)| matches)
        .unwrap_or_default()
}

/// Like [`filter`], but also reports which tier won.
///
/// Returns `None` when nothing matched.
#[must_use]
pub fn filter_ranked(candidates: &[CandidateEntry], query: &str) -> Option<(MatchTier, Vec<CandidateEntry>)> {
    let lower_query = query.to_lowercase();
    let mut buckets = Buckets::default();

    for candidate in candidates {
        let name = candidate.name.as_str();
        let effective = candidate.effective_name.as_str();

        if name == query || effective == query {
            buckets.exact.push(candidate.clone());
            continue;
        }

        let lower_name = name.to_lowercase();
        let lower_effective = effective.to_lowercase();

        if (lower_name == lower_query || lower_effective == lower_query) && buckets.exact.is_empty() {
            buckets.wrong_case.push(candidate.clone());
        } else if (lower_name.starts_with(&lower_query) || lower_effective.starts_with(&lower_query))
            && buckets.wrong_case.is_empty()
        {
            buckets.starts_with.push(candidate.clone());
        } else if (lower_name.contains(&lower_query) || lower_effective.contains(&lower_query))
            && buckets.starts_with.is_empty()
        {
            buckets.contains.push(candidate.clone());
        }
    }

    [
        (MatchTier::Exact, buckets.exact),
        (MatchTier::WrongCase, buckets.wrong_case),
        (MatchTier::StartsWith, buckets.starts_with),
        (MatchTier::Contains, buckets.contains),
    ]
    .into_iter()
    .find(|(_, bucket)| !bucket.is_empty())
}
