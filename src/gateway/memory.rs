//! In-memory directory.
//!
//! A thread-safe [`DirectoryGateway`] backed by a map. It is intended for
//! embedded usage, tests, and as a reference implementation. Recent remote
//! operations are kept in a bounded call log, so tests can check exactly
//! which calls a resolution issued.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use crate::candidate::{CandidateEntry, CandidateId};
use crate::gateway::{DirectoryGateway, GatewayError};

fn lock_err(context: &'static str) -> GatewayError {
    GatewayError::Backend(format!("poisoned lock: {context}"))
}

/// Calls kept by [`InMemoryDirectory::calls`] unless configured otherwise.
pub const DEFAULT_CALL_LOG_CAPACITY: usize = 256;

/// A remote operation as it reached the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `lookup_by_id(id)`.
    LookupById(CandidateId),
    /// `search_by_prefix(prefix, limit)`.
    SearchByPrefix {
        /// Prefix as received.
        prefix: String,
        /// Limit as received.
        limit: usize,
    },
}

/// In-memory implementation of [`DirectoryGateway`].
#[derive(Debug)]
pub struct InMemoryDirectory {
    records: RwLock<BTreeMap<CandidateId, CandidateEntry>>,
    calls: Mutex<VecDeque<GatewayCall>>,
    call_log_capacity: usize,
    fail_next: Mutex<Option<GatewayError>>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            calls: Mutex::new(VecDeque::new()),
            call_log_capacity: DEFAULT_CALL_LOG_CAPACITY,
            fail_next: Mutex::new(None),
        }
    }
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding `records`. Later duplicates replace
    /// earlier ones.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = CandidateEntry>) -> Self {
        let map = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: RwLock::new(map),
            ..Self::default()
        }
    }

    /// Keeps at most `capacity` calls in the log, dropping the oldest first.
    /// Zero disables recording.
    #[must_use]
    pub fn with_call_log_capacity(mut self, capacity: usize) -> Self {
        self.call_log_capacity = capacity;
        self
    }

    /// Inserts a new record. Returns an error if the id already exists.
    pub fn insert(&self, record: CandidateEntry) -> Result<(), GatewayError> {
        let mut records = self.records.write().map_err(|_| lock_err("directory.insert"))?;
        if records.contains_key(&record.id) {
            return Err(GatewayError::Backend(format!("duplicate id: {}", record.id)));
        }
        records.insert(record.id, record);
        Ok(())
    }

    /// Inserts or replaces a record.
    pub fn upsert(&self, record: CandidateEntry) -> Result<(), GatewayError> {
        let mut records = self.records.write().map_err(|_| lock_err("directory.upsert"))?;
        records.insert(record.id, record);
        Ok(())
    }

    /// Removes a record, returning it if it existed.
    pub fn remove(&self, id: CandidateId) -> Result<Option<CandidateEntry>, GatewayError> {
        let mut records = self.records.write().map_err(|_| lock_err("directory.remove"))?;
        Ok(records.remove(&id))
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, GatewayError> {
        let records = self.records.read().map_err(|_| lock_err("directory.len"))?;
        Ok(records.len())
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> Result<bool, GatewayError> {
        Ok(self.len()? == 0)
    }

    /// Makes the next remote operation fail with `error`.
    pub fn fail_next(&self, error: GatewayError) -> Result<(), GatewayError> {
        *self.fail_next.lock().map_err(|_| lock_err("directory.fail_next"))? = Some(error);
        Ok(())
    }

    /// The most recent remote operations, oldest first.
    pub fn calls(&self) -> Result<Vec<GatewayCall>, GatewayError> {
        let calls = self.calls.lock().map_err(|_| lock_err("directory.calls"))?;
        Ok(calls.iter().cloned().collect())
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) -> Result<(), GatewayError> {
        self.calls.lock().map_err(|_| lock_err("directory.clear_calls"))?.clear();
        Ok(())
    }

    fn record(&self, call: GatewayCall) -> Result<(), GatewayError> {
        if self.call_log_capacity > 0 {
            let mut calls = self.calls.lock().map_err(|_| lock_err("directory.calls"))?;
            if calls.len() == self.call_log_capacity {
                calls.pop_front();
            }
            calls.push_back(call);
        }
        let injected = self.fail_next.lock().map_err(|_| lock_err("directory.fail_next"))?.take();
        match injected {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DirectoryGateway for InMemoryDirectory {
    async fn lookup_by_id(&self, id: CandidateId) -> Result<Option<CandidateEntry>, GatewayError> {
        self.record(GatewayCall::LookupById(id))?;
        let records = self.records.read().map_err(|_| lock_err("directory.lookup_by_id"))?;
        Ok(records.get(&id).cloned())
    }

    async fn search_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<CandidateEntry>, GatewayError> {
        self.record(GatewayCall::SearchByPrefix {
            prefix: prefix.to_string(),
            limit,
        })?;

        let key = prefix.to_lowercase();
        if key.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let records = self.records.read().map_err(|_| lock_err("directory.search_by_prefix"))?;
        let mut found: Vec<CandidateEntry> = records
            .values()
            .filter(|r| r.name.to_lowercase().starts_with(&key) || r.effective_name.to_lowercase().starts_with(&key))
            .cloned()
            .collect();

        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        found.truncate(limit);
        Ok(found)
    }
}
