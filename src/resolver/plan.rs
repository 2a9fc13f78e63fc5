//! The decision core shared by both drivers.
//!
//! Planning decides, without any I/O, whether a query can be answered
//! immediately or needs exactly one gateway call. Settling turns that call's
//! response into an [`Outcome`]. Drivers only differ in how they wait for the
//! call in between.

use tracing::debug;

use crate::candidate::{CandidateEntry, CandidateId};
use crate::config::{ResolverConfig, UnresolvedMention};
use crate::gateway::DirectoryGateway;
use crate::matcher;
use crate::outcome::Outcome;
use crate::query::{classify, SyntaxCategory};

/// What a resolution needs to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    /// Answered without the gateway.
    Done(Outcome),
    /// One `lookup_by_id`.
    Lookup(CandidateId),
    /// One `search_by_prefix`.
    Search(NameSearch),
}

/// A prefix search and how to read its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NameSearch {
    pub(crate) prefix: String,
    pub(crate) limit: usize,
    /// Set for `name#discriminator` queries.
    pub(crate) discriminator: Option<String>,
}

impl NameSearch {
    pub(crate) fn settle(&self, candidates: Vec<CandidateEntry>, display_limit: usize) -> Outcome {
        let outcome = match &self.discriminator {
            Some(discriminator) => candidates
                .into_iter()
                .find(|c| &c.discriminator == discriminator)
                .map_or(Outcome::NotFound, Outcome::Resolved),
            None => Outcome::from_matches(matcher::filter(&candidates, &self.prefix), display_limit),
        };
        debug!(outcome = outcome.kind(), prefix = %self.prefix, "settled name search");
        outcome
    }
}

pub(crate) fn settle_lookup(id: CandidateId, found: Option<CandidateEntry>) -> Outcome {
    let outcome = found.map_or(Outcome::NotFound, Outcome::Resolved);
    debug!(outcome = outcome.kind(), %id, "settled id lookup");
    outcome
}

/// Plans a resolution. Mentions are only read from the gateway when the
/// query is a mention token.
pub(crate) fn plan<G>(config: &ResolverConfig, query: &str, gateway: &G) -> Step
where
    G: DirectoryGateway + ?Sized,
{
    if query.trim().is_empty() {
        return Step::Done(Outcome::NoSelection);
    }

    let syntax = classify(query);
    debug!(kind = syntax.kind(), "classified query");

    match syntax {
        SyntaxCategory::Mention { id } => plan_mention(config, id, gateway.mentioned_entries()),
        SyntaxCategory::NumericId { id } => lookup_or_not_found(id),
        _ if query.chars().count() < config.min_query_chars => {
            debug!(min = config.min_query_chars, "query too short for a name search");
            Step::Done(Outcome::QueryTooShort)
        }
        SyntaxCategory::NameAndDiscriminator { name, discriminator } => Step::Search(NameSearch {
            prefix: name,
            limit: config.tag_search_limit,
            discriminator: Some(discriminator),
        }),
        SyntaxCategory::BareName { name } => Step::Search(NameSearch {
            prefix: name,
            limit: config.name_search_limit,
            discriminator: None,
        }),
    }
}

/// Ids beyond the id range cannot name a record, so they never reach the
/// gateway.
fn lookup_or_not_found(id: Option<CandidateId>) -> Step {
    match id {
        Some(id) => Step::Lookup(id),
        None => {
            debug!("id out of range");
            Step::Done(Outcome::NotFound)
        }
    }
}

fn plan_mention(config: &ResolverConfig, id: Option<CandidateId>, mut mentions: Vec<CandidateEntry>) -> Step {
    match mentions.len() {
        0 => match config.unresolved_mention {
            UnresolvedMention::LookupById => {
                debug!(?id, "mention without a resolved entry, looking it up");
                lookup_or_not_found(id)
            }
            UnresolvedMention::NotFound => Step::Done(Outcome::NotFound),
        },
        1 => Step::Done(Outcome::Resolved(mentions.swap_remove(0))),
        count => {
            debug!(count, "more than one mention supplied");
            Step::Done(Outcome::TooManyMentions)
        }
    }
}
