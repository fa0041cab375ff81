//! GetWalks request tests against in-memory and scripted stores.
//!
//! Covers the request-level outcomes (no input, empty chain, failures), the
//! per-hop result limit, and cursor release on every exit path.

use async_trait::async_trait;
use hopwalk_engine::*;
use hopwalk_graph::Properties;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Helpers
// ============================================================================

fn stored(
    group: &str,
    source: &'static str,
    destination: &'static str,
    id: i64,
) -> StoredEdge<&'static str> {
    let mut properties = Properties::new();
    properties.insert("id".to_string(), PropertyValue::Int(id));
    StoredEdge {
        group: group.to_string(),
        source,
        destination,
        directed: true,
        properties,
    }
}

fn ids<V: VertexValue>(walk: &Walk<V>) -> Vec<i64> {
    walk.edges_as_list()
        .into_iter()
        .filter_map(|e| match e.property("id") {
            Some(PropertyValue::Int(i)) => Some(*i),
            _ => None,
        })
        .collect()
}

async fn run<V: VertexValue, S: Store<V>>(
    handler: &GetWalksHandler,
    request: &GetWalks<V>,
    store: &S,
) -> Vec<Walk<V>> {
    handler
        .do_operation(request, &Context::new(), store)
        .await
        .unwrap()
        .unwrap()
}

/// Fails every query from the `fail_from`-th call (0-based) onwards.
struct FailingStore {
    inner: MemoryStore<&'static str>,
    fail_from: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl Store<&'static str> for FailingStore {
    async fn execute(
        &self,
        query: &GetElements<&'static str>,
        context: &Context,
    ) -> Result<Box<dyn EdgeCursor<&'static str>>, StoreError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.fail_from {
            return Err(StoreError::Unavailable("scan rejected".to_string()));
        }
        self.inner.execute(query, context).await
    }
}

/// Cursor that yields a fixed prefix, then either errors or never completes.
struct ScriptedCursor {
    edges: Vec<Edge<&'static str>>,
    then_fail: bool,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl EdgeCursor<&'static str> for ScriptedCursor {
    async fn next_edge(&mut self) -> Result<Option<Edge<&'static str>>, StoreError> {
        if !self.edges.is_empty() {
            return Ok(Some(self.edges.remove(0)));
        }
        if self.then_fail {
            return Err(StoreError::Backend("connection reset".to_string()));
        }
        std::future::pending().await
    }

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct ScriptedStore {
    then_fail: bool,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl Store<&'static str> for ScriptedStore {
    async fn execute(
        &self,
        _query: &GetElements<&'static str>,
        _context: &Context,
    ) -> Result<Box<dyn EdgeCursor<&'static str>>, StoreError> {
        Ok(Box::new(ScriptedCursor {
            edges: vec![Edge::outgoing("link", "A", "B")],
            then_fail: self.then_fail,
            released: Arc::clone(&self.released),
        }))
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_parallel_edges_yield_separate_walks() {
    let store = MemoryStore::new();
    store.add_edge(stored("link", "A", "B", 1));
    store.add_edge(stored("link", "A", "B", 2));
    store.add_edge(stored("link", "B", "C", 3));

    let request = GetWalks::new(100)
        .input(["A"])
        .operations([HopOperation::new().outgoing(), HopOperation::new().outgoing()]);

    let walks = run(&GetWalksHandler::default(), &request, &store).await;
    let got: Vec<Vec<i64>> = walks.iter().map(ids).collect();
    assert_eq!(got, vec![vec![1, 3], vec![2, 3]]);
}

#[tokio::test]
async fn test_grouped_parallel_edges_share_a_walk() {
    let store = MemoryStore::new();
    store.add_edge(stored("link", "A", "B", 1));
    store.add_edge(stored("link", "A", "B", 2));
    store.add_edge(stored("link", "B", "C", 3));

    let handler = GetWalksHandler::new(WalkConfig {
        parallel_edges: ParallelEdges::Grouped,
        ..WalkConfig::default()
    })
    .unwrap();
    let request = GetWalks::new(100)
        .input(["A"])
        .operations([HopOperation::new().outgoing(), HopOperation::new().outgoing()]);

    let walks = run(&handler, &request, &store).await;
    assert_eq!(walks.len(), 1);
    assert_eq!(walks[0].edges()[0].len(), 2);
    assert_eq!(ids(&walks[0]), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_truncation_keeps_first_edges_for_next_hop() {
    let store = MemoryStore::new();
    let targets = ["b0", "b1", "b2", "b3", "b4", "b5", "b6", "b7", "b8", "b9"];
    for (i, target) in targets.iter().enumerate() {
        store.add_edge(stored("link", "A", target, i as i64));
        store.add_edge(stored("link", target, "Z", 100 + i as i64));
    }

    let request = GetWalks::new(3)
        .input(["A"])
        .operations([HopOperation::new().outgoing(), HopOperation::new().outgoing()]);

    let walks = run(&GetWalksHandler::default(), &request, &store).await;
    let got: Vec<Vec<i64>> = walks.iter().map(ids).collect();
    assert_eq!(got, vec![vec![0, 100], vec![1, 101], vec![2, 102]]);
    assert_eq!(store.open_cursors(), 0);
}

#[tokio::test]
async fn test_dead_end_excluded_with_and_without_pruning() {
    let store = MemoryStore::new();
    store.add_edge(stored("link", "A", "B", 1));
    store.add_edge(stored("link", "A", "X", 2));
    store.add_edge(stored("link", "B", "C", 3));

    let request = GetWalks::new(100)
        .input(["A"])
        .operations([HopOperation::new().outgoing(), HopOperation::new().outgoing()]);

    for prune in [PruneMode::Enabled, PruneMode::Disabled] {
        let handler = GetWalksHandler::new(WalkConfig {
            prune,
            ..WalkConfig::default()
        })
        .unwrap();
        let walks = run(&handler, &request, &store).await;
        let got: Vec<Vec<i64>> = walks.iter().map(ids).collect();
        assert_eq!(got, vec![vec![1, 3]], "prune = {prune:?}");
    }
}

#[tokio::test]
async fn test_incoming_hops_walk_against_edge_direction() {
    let store = MemoryStore::new();
    store.add("cites", "B", "A", true);
    store.add("cites", "C", "B", true);
    store.add("cites", "A", "D", true);

    let request = GetWalks::new(100)
        .input(["A"])
        .operations([HopOperation::new().incoming(), HopOperation::new().incoming()]);

    let walks = run(&GetWalksHandler::default(), &request, &store).await;
    assert_eq!(walks.len(), 1);
    assert_eq!(walks[0].vertices(), vec![&"A", &"B", &"C"]);
    assert_eq!(walks[0].edges()[0][0].source(), &"B");
}

#[tokio::test]
async fn test_walks_grouped_by_seed_in_input_order() {
    let store = MemoryStore::new();
    store.add("link", "A", "X", true);
    store.add("link", "B", "Y", true);

    let request = GetWalks::new(100)
        .input(["B", "A", "B"])
        .operation(HopOperation::new().outgoing());

    let walks = run(&GetWalksHandler::default(), &request, &store).await;
    let starts: Vec<&str> = walks.iter().filter_map(|w| w.source_vertex().copied()).collect();
    assert_eq!(starts, vec!["B", "A", "B"]);
}

#[tokio::test]
async fn test_empty_seed_list_returns_no_walks() {
    let store = MemoryStore::<&'static str>::new();
    store.add("link", "A", "B", true);

    let request = GetWalks::<&str>::new(100)
        .input(Vec::new())
        .operation(HopOperation::new());

    let result = GetWalksHandler::default()
        .do_operation(&request, &Context::new(), &store)
        .await
        .unwrap();
    assert_eq!(result, Some(Vec::new()));
    assert_eq!(store.query_count(), 0);
}

// ============================================================================
// Failures and Cursor Release
// ============================================================================

#[tokio::test]
async fn test_store_failure_fails_request_at_hop() -> anyhow::Result<()> {
    let inner = MemoryStore::new();
    inner.add("link", "A", "B", true);
    inner.add("link", "B", "C", true);
    let store = FailingStore {
        inner,
        fail_from: 1,
        calls: AtomicUsize::new(0),
    };

    let request = GetWalks::new(100)
        .input(["A"])
        .operations([HopOperation::new().outgoing(), HopOperation::new().outgoing()]);

    let err = GetWalksHandler::default()
        .do_operation(&request, &Context::new(), &store)
        .await
        .unwrap_err();

    assert_eq!(err.hop(), Some(1));
    assert!(matches!(
        err,
        WalkError::Store {
            source: StoreError::Unavailable(_),
            ..
        }
    ));
    assert!(err.to_string().contains("hop 1"));
    assert_eq!(store.inner.open_cursors(), 0);
    Ok(())
}

#[tokio::test]
async fn test_mid_stream_error_releases_cursor() {
    let released = Arc::new(AtomicUsize::new(0));
    let store = ScriptedStore {
        then_fail: true,
        released: Arc::clone(&released),
    };
    let request = GetWalks::new(100)
        .input(["A"])
        .operation(HopOperation::new());

    let err = GetWalksHandler::default()
        .do_operation(&request, &Context::new(), &store)
        .await
        .unwrap_err();

    assert_eq!(err.hop(), Some(0));
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cancelled_request_releases_cursor() {
    let released = Arc::new(AtomicUsize::new(0));
    let store = ScriptedStore {
        then_fail: false,
        released: Arc::clone(&released),
    };
    let request = GetWalks::new(100)
        .input(["A"])
        .operation(HopOperation::new());
    let handler = GetWalksHandler::default();
    let context = Context::new();

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        handler.do_operation(&request, &context, &store),
    )
    .await;

    assert!(outcome.is_err(), "stalled cursor should time out");
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_limit_reached_before_stall_completes() {
    let released = Arc::new(AtomicUsize::new(0));
    let store = ScriptedStore {
        then_fail: false,
        released: Arc::clone(&released),
    };
    let request = GetWalks::new(1)
        .input(["A"])
        .operation(HopOperation::new());

    let walks = run(&GetWalksHandler::default(), &request, &store).await;
    assert_eq!(walks.len(), 1);
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Properties
// ============================================================================

fn graph_and_request() -> impl Strategy<Value = (Vec<(u8, u8, bool)>, Vec<u8>, usize, usize)> {
    (
        prop::collection::vec((0u8..6, 0u8..6, any::<bool>()), 0..24),
        prop::collection::vec(0u8..6, 0..4),
        1usize..4,
        1usize..12,
    )
}

fn walks_with(
    config: WalkConfig,
    edges: &[(u8, u8, bool)],
    seeds: &[u8],
    hops: usize,
    limit: usize,
) -> Vec<Walk<u8>> {
    let store = MemoryStore::new();
    for &(source, destination, directed) in edges {
        store.add("link", source, destination, directed);
    }
    let request = GetWalks::new(limit)
        .input(seeds.iter().copied())
        .operations(std::iter::repeat(HopOperation::new()).take(hops));
    let handler = GetWalksHandler::new(config).unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let walks = runtime
        .block_on(handler.do_operation(&request, &Context::new(), &store))
        .unwrap()
        .unwrap();
    assert_eq!(store.open_cursors(), 0);
    walks
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_pruning_never_changes_results((edges, seeds, hops, limit) in graph_and_request()) {
        let pruned = walks_with(WalkConfig::default(), &edges, &seeds, hops, limit);
        let unpruned = walks_with(
            WalkConfig { prune: PruneMode::Disabled, ..WalkConfig::default() },
            &edges, &seeds, hops, limit,
        );
        prop_assert_eq!(pruned, unpruned);
    }

    #[test]
    fn prop_parallel_assembly_matches_sequential((edges, seeds, hops, limit) in graph_and_request()) {
        let sequential = walks_with(WalkConfig::default(), &edges, &seeds, hops, limit);
        let parallel = walks_with(
            WalkConfig { parallel_assembly: true, ..WalkConfig::default() },
            &edges, &seeds, hops, limit,
        );
        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn prop_walks_are_connected_and_full_length((edges, seeds, hops, limit) in graph_and_request()) {
        for walk in walks_with(WalkConfig::default(), &edges, &seeds, hops, limit) {
            prop_assert_eq!(walk.len(), hops);
            for pair in walk.edges().windows(2) {
                let ends: Vec<&u8> = pair[0].iter().map(|e| e.adjacent_vertex()).collect();
                for edge in &pair[1] {
                    prop_assert!(ends.contains(&edge.matched_vertex()));
                }
            }
        }
    }
}
