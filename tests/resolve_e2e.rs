use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use memberfind::gateway::GatewayCall;
use memberfind::{
    CandidateEntry, CandidateId, DirectoryGateway, FinderError, GatewayError, InMemoryDirectory, Outcome,
    Resolver, ResolverConfig, UnresolvedMention, WithMentions,
};

fn entry(id: u64, name: &str, discriminator: &str) -> CandidateEntry {
    CandidateEntry::new(CandidateId::new(id), name, discriminator)
}

/// Returns a fixed candidate list for every search, whatever the prefix.
struct FixedSearch {
    results: Vec<CandidateEntry>,
    calls: AtomicUsize,
}

impl FixedSearch {
    fn new(results: Vec<CandidateEntry>) -> Arc<Self> {
        Arc::new(Self {
            results,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl DirectoryGateway for FixedSearch {
    async fn lookup_by_id(&self, id: CandidateId) -> Result<Option<CandidateEntry>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.iter().find(|e| e.id == id).cloned())
    }

    async fn search_by_prefix(&self, _prefix: &str, limit: usize) -> Result<Vec<CandidateEntry>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}

/// Never answers until released; records when its in-flight call is dropped.
struct StalledGateway {
    started: Notify,
    dropped: AtomicBool,
}

struct MarkDropped<'a>(&'a AtomicBool);

impl Drop for MarkDropped<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DirectoryGateway for StalledGateway {
    async fn lookup_by_id(&self, _id: CandidateId) -> Result<Option<CandidateEntry>, GatewayError> {
        let _mark = MarkDropped(&self.dropped);
        self.started.notify_one();
        std::future::pending::<()>().await;
        Ok(None)
    }

    async fn search_by_prefix(&self, _prefix: &str, _limit: usize) -> Result<Vec<CandidateEntry>, GatewayError> {
        let _mark = MarkDropped(&self.dropped);
        self.started.notify_one();
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn empty_query_completes_without_gateway() {
    let gateway = Arc::new(InMemoryDirectory::new());
    let outcome = Resolver::new().resolve_async("", Arc::clone(&gateway)).await.unwrap();
    assert_eq!(outcome, Outcome::NoSelection);
    assert!(gateway.calls().unwrap().is_empty());
}

#[tokio::test]
async fn short_query_is_refused_without_gateway() {
    let gateway = Arc::new(InMemoryDirectory::with_records([entry(1, "ab", "0001")]));
    let outcome = Resolver::new().resolve_async("ab", Arc::clone(&gateway)).await.unwrap();
    assert_eq!(outcome, Outcome::QueryTooShort);
    assert!(gateway.calls().unwrap().is_empty());
}

#[tokio::test]
async fn numeric_id_invokes_exactly_one_lookup() {
    let gateway = Arc::new(InMemoryDirectory::new());
    let outcome = Resolver::new()
        .resolve_async("123456789012345678", Arc::clone(&gateway))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::NotFound);
    assert_eq!(
        gateway.calls().unwrap(),
        vec![GatewayCall::LookupById(CandidateId::new(123_456_789_012_345_678))]
    );
}

#[tokio::test]
async fn out_of_range_id_never_reaches_gateway() {
    let gateway = Arc::new(InMemoryDirectory::new());
    let task = Resolver::new().resolve_async("99999999999999999999", Arc::clone(&gateway));
    assert!(task.is_ready());
    assert_eq!(task.await.unwrap(), Outcome::NotFound);
    assert!(gateway.calls().unwrap().is_empty());
}

#[tokio::test]
async fn bare_name_with_no_tier_match_is_not_found() {
    let gateway = FixedSearch::new(vec![entry(1, "alice", "0001"), entry(2, "carol", "0002"), entry(3, "dave", "0003")]);
    let outcome = Resolver::new().resolve_async("zelda", Arc::clone(&gateway)).await.unwrap();
    assert_eq!(outcome, Outcome::NotFound);
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn two_contains_matches_are_ambiguous_in_order() {
    let gateway = FixedSearch::new(vec![entry(1, "xBobx", "0001"), entry(2, "the bob", "0002")]);
    let Outcome::Ambiguous(list) = Resolver::new().resolve_async("Bob ", gateway).await.unwrap() else {
        panic!("expected ambiguous");
    };
    assert_eq!(list.tags(), vec!["xBobx#0001", "the bob#0002"]);
    assert_eq!(list.omitted(), 0);
}

#[tokio::test]
async fn exact_tier_resolves_among_looser_matches() {
    let gateway = FixedSearch::new(vec![
        entry(1, "Bobbyx", "0001"),
        entry(2, "bobby", "0002"),
        entry(3, "Bobby", "0003"),
        entry(4, "xBobbyx", "0004"),
    ]);
    let outcome = Resolver::new().resolve_async("Bobby", gateway).await.unwrap();
    assert_eq!(outcome.resolved().unwrap().id, CandidateId::new(3));
}

#[tokio::test]
async fn wide_search_limit_truncates_display() {
    let results: Vec<CandidateEntry> = (1..=12).map(|i| entry(i, &format!("member{i}"), "0001")).collect();
    let config = ResolverConfig {
        name_search_limit: 12,
        ..ResolverConfig::default()
    };
    let resolver = Resolver::with_config(config).unwrap();

    let Outcome::Ambiguous(list) = resolver.resolve_async("member", FixedSearch::new(results)).await.unwrap() else {
        panic!("expected ambiguous");
    };
    assert_eq!(list.shown().len(), 7);
    assert_eq!(list.omitted(), 5);
    assert_eq!(list.shown()[0].name, "member1");
}

#[tokio::test]
async fn mention_reuses_supplied_entry() {
    let directory = Arc::new(InMemoryDirectory::new());
    let known = entry(155_867_458_203_287_552, "Kodehawa", "0001");
    let gateway = Arc::new(WithMentions::new(Arc::clone(&directory), vec![known.clone()]));

    let task = Resolver::new().resolve_async("<@!155867458203287552>", gateway);
    assert!(task.is_ready());
    assert_eq!(task.await.unwrap(), Outcome::Resolved(known));
    assert!(directory.calls().unwrap().is_empty());
}

#[tokio::test]
async fn several_mentions_are_rejected() {
    let directory = Arc::new(InMemoryDirectory::new());
    let gateway = Arc::new(WithMentions::new(
        Arc::clone(&directory),
        vec![entry(1, "a", "0001"), entry(2, "b", "0002")],
    ));
    let outcome = Resolver::new().resolve_async("<@155867458203287552>", gateway).await.unwrap();
    assert_eq!(outcome, Outcome::TooManyMentions);
    assert!(directory.calls().unwrap().is_empty());
}

#[tokio::test]
async fn unresolved_mention_follows_policy() {
    let directory = Arc::new(InMemoryDirectory::with_records([entry(155_867_458_203_287_552, "Kodehawa", "0001")]));

    let outcome = Resolver::new()
        .resolve_async("<@155867458203287552>", Arc::clone(&directory))
        .await
        .unwrap();
    assert_eq!(outcome.resolved().unwrap().name, "Kodehawa");
    assert_eq!(directory.calls().unwrap().len(), 1);

    directory.clear_calls().unwrap();
    let strict = Resolver::with_config(ResolverConfig {
        unresolved_mention: UnresolvedMention::NotFound,
        ..ResolverConfig::default()
    })
    .unwrap();
    let outcome = strict
        .resolve_async("<@155867458203287552>", Arc::clone(&directory))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::NotFound);
    assert!(directory.calls().unwrap().is_empty());
}

#[tokio::test]
async fn gateway_failure_is_not_an_outcome() {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.fail_next(GatewayError::RateLimited { retry_after_ms: 250 }).unwrap();

    let err = Resolver::new().resolve_async("somebody", Arc::clone(&directory)).await.unwrap_err();
    assert!(matches!(
        err,
        FinderError::Gateway(GatewayError::RateLimited { retry_after_ms: 250 })
    ));
    assert!(err.is_retryable());
    assert_eq!(directory.calls().unwrap().len(), 1);
}

#[tokio::test]
async fn cancelling_a_task_drops_the_gateway_call() {
    let gateway = Arc::new(StalledGateway {
        started: Notify::new(),
        dropped: AtomicBool::new(false),
    });

    let mut task = Resolver::new().resolve_async("somebody", Arc::clone(&gateway));
    let polled = tokio::time::timeout(Duration::from_millis(20), &mut task).await;
    assert!(polled.is_err(), "stalled gateway must not complete");
    assert!(!gateway.dropped.load(Ordering::SeqCst));

    assert!(task.cancel());
    assert!(gateway.dropped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn dropping_a_spawned_task_propagates() {
    let gateway = Arc::new(StalledGateway {
        started: Notify::new(),
        dropped: AtomicBool::new(false),
    });

    let task = Resolver::new().resolve_async("123456789012345678", Arc::clone(&gateway));
    let handle = tokio::spawn(task);
    gateway.started.notified().await;

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
    assert!(gateway.dropped.load(Ordering::SeqCst));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolutions_are_independent() {
    let directory = Arc::new(InMemoryDirectory::with_records([
        entry(1, "Alpha", "0001"),
        entry(2, "Bravo", "0002"),
        entry(3, "Charlie", "0003"),
        entry(4, "Delta", "0004"),
    ]));
    let resolver = Resolver::new();

    let mut handles = Vec::new();
    for name in ["Alpha", "Bravo", "Charlie", "Delta"].iter().cycle().take(32) {
        handles.push(tokio::spawn(resolver.resolve_async(name, Arc::clone(&directory))));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let outcome = handle.await.unwrap().unwrap();
        let expected = u64::try_from(i % 4).unwrap() + 1;
        assert_eq!(outcome.resolved().unwrap().id, CandidateId::new(expected));
    }
    assert_eq!(directory.calls().unwrap().len(), 32);
}

#[tokio::test]
async fn dyn_gateway_is_accepted() {
    let directory: Arc<dyn DirectoryGateway> = Arc::new(InMemoryDirectory::with_records([entry(7, "Kodehawa", "0001")]));
    let outcome = Resolver::new().resolve_async("Kodehawa#0001", directory).await.unwrap();
    assert_eq!(outcome.resolved().unwrap().id, CandidateId::new(7));
}
