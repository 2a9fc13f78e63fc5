//! Directory records and their identifiers.
//!
//! A [`CandidateEntry`] is one named, identified record as the directory
//! returned it. The resolver treats it as a read-only snapshot: names may
//! change upstream at any time, but only the [`CandidateId`] is authoritative.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable numeric identifier of a directory record.
///
/// # Examples
///
/// ```
/// use memberfind::CandidateId;
///
/// let id: CandidateId = "155867458203287552".parse().unwrap();
/// assert_eq!(id.get(), 155_867_458_203_287_552);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(u64);

impl CandidateId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CandidateId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl From<u64> for CandidateId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<CandidateId> for u64 {
    fn from(id: CandidateId) -> Self {
        id.0
    }
}

/// One record returned by the directory.
///
/// `name` is the account-wide name, `effective_name` the name shown in the
/// current scope (a nickname, or `name` when none is set). Both take part in
/// matching.
///
/// # Examples
///
/// ```
/// use memberfind::{CandidateEntry, CandidateId};
///
/// let entry = CandidateEntry::new(CandidateId::new(1), "Kodehawa", "0001")
///     .with_effective_name("hawa");
/// assert_eq!(entry.tag(), "Kodehawa#0001");
/// assert_eq!(entry.effective_name, "hawa");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEntry {
    /// Authoritative identifier.
    pub id: CandidateId,

    /// Account-wide name.
    pub name: String,

    /// Name in the current scope.
    pub effective_name: String,

    /// Four-digit discriminator disambiguating equal names.
    pub discriminator: String,
}

impl CandidateEntry {
    /// Creates an entry whose effective name equals its name.
    #[must_use]
    pub fn new(id: CandidateId, name: impl Into<String>, discriminator: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            effective_name: name.clone(),
            name,
            discriminator: discriminator.into(),
        }
    }

    /// Sets the scoped name.
    #[must_use]
    pub fn with_effective_name(mut self, effective_name: impl Into<String>) -> Self {
        self.effective_name = effective_name.into();
        self
    }

    /// Display tag, `name#discriminator`. Never used for matching.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}#{}", self.name, self.discriminator)
    }
}

impl PartialEq for CandidateEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CandidateEntry {}

impl std::hash::Hash for CandidateEntry {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
