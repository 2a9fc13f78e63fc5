//! # memberfind - resolve a typed query to exactly one directory member
//!
//! memberfind takes whatever a user typed to pick someone ("@mention", a raw
//! id, `name#1234`, or part of a name) and turns it into a single record
//! from a remote directory, or into a well-defined reason why it could not.
//!
//! ## Core Concepts
//!
//! - **Classifier**: sorts a query into one syntax, in a fixed priority order
//! - **Tiered matcher**: narrows name-search results to exact, wrong-case,
//!   prefix, or substring matches, never mixing tiers
//! - **Directory gateway**: the remote directory, asked at most once per query
//! - **Outcome**: the single result of a resolution
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use memberfind::{gateway::InMemoryDirectory, CandidateEntry, CandidateId, Outcome, Resolver};
//!
//! let directory = Arc::new(InMemoryDirectory::with_records([
//!     CandidateEntry::new(CandidateId::new(155867458203287552), "Kodehawa", "0001"),
//! ]));
//!
//! let outcome = Resolver::new().resolve_async("kode", directory).await?;
//! assert!(matches!(outcome, Outcome::Resolved(_)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod candidate;
pub mod config;
pub mod error;
pub mod gateway;
pub mod matcher;
pub mod outcome;
pub mod query;
pub mod resolver;

// Re-export primary types at crate root for convenience
pub use candidate::{CandidateEntry, CandidateId};
pub use config::{ResolverConfig, UnresolvedMention};
pub use error::{ConfigError, FinderError, FinderResult, GatewayError};
pub use gateway::{DirectoryGateway, InMemoryDirectory, WithMentions};
pub use matcher::MatchTier;
pub use outcome::{Ambiguity, Outcome};
pub use query::{classify, SyntaxCategory};
pub use resolver::{BlockingResolve, ResolveTask, Resolver};
