//! In-memory registry semantics.
//!
//! The scenario tests in `rollcall-app` lean on this server behaving like the
//! real one, so its rules are pinned down here.

use std::time::Duration;

use proptest::prelude::*;
use rollcall_client::{ApiError, RegistryApi};
use rollcall_harness::{MemoryRegistry, RecordedCall};

#[tokio::test]
async fn list_marks_only_the_callers_node() {
    let registry = MemoryRegistry::new();
    registry.seed("a", "10.0.0.1").seed("b", "10.0.0.2");

    let nodes = registry.client("10.0.0.2").list_nodes().await.unwrap();
    let mine: Vec<_> = nodes.iter().filter(|n| n.you).map(|n| n.name.as_str()).collect();
    assert_eq!(mine, vec!["b"]);

    let stranger = registry.client("10.0.0.9").list_nodes().await.unwrap();
    assert!(stranger.iter().all(|n| !n.you));
}

#[tokio::test]
async fn register_twice_renames() {
    let registry = MemoryRegistry::new();
    let client = registry.client("10.0.0.5");

    client.register_node("Ana").await.unwrap();
    client.register_node("Bea").await.unwrap();

    assert_eq!(registry.names(), vec!["Bea"]);
    let nodes = client.list_nodes().await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0].you);
}

#[tokio::test]
async fn created_times_increase_with_registration_order() {
    let registry = MemoryRegistry::new();
    registry.seed("a", "10.0.0.1");
    registry.client("10.0.0.2").register_node("b").await.unwrap();

    let nodes = registry.client("10.0.0.3").list_nodes().await.unwrap();
    assert!(nodes[0].created.secs_since_epoch < nodes[1].created.secs_since_epoch);
}

#[tokio::test]
async fn unregister_removes_callers_node() {
    let registry = MemoryRegistry::new();
    registry.seed("a", "10.0.0.1").seed("b", "10.0.0.2");

    registry.client("10.0.0.1").unregister_node().await.unwrap();
    assert_eq!(registry.names(), vec!["b"]);

    // Nothing to remove is still a success.
    registry.client("10.0.0.1").unregister_node().await.unwrap();
    assert_eq!(registry.names(), vec!["b"]);
}

#[tokio::test]
async fn out_of_range_reorder_is_ignored() {
    let registry = MemoryRegistry::new();
    registry.seed("a", "10.0.0.1").seed("b", "10.0.0.2");

    registry.client("10.0.0.1").reorder_node(0, 5).await.unwrap();

    assert_eq!(registry.names(), vec!["a", "b"]);
    assert_eq!(
        registry.calls(),
        vec![RecordedCall::Reorder { ip: "10.0.0.1".into(), cur_i: 0, new_i: 5 }]
    );
}

#[tokio::test]
async fn status_round_trip() {
    let registry = MemoryRegistry::new();
    let client = registry.client("10.0.0.1");
    assert!(!client.get_status().await.unwrap());

    client.set_status(true).await.unwrap();
    assert!(registry.is_on());
    assert!(client.get_status().await.unwrap());
    assert_eq!(registry.status_calls(), 2);
}

#[tokio::test]
async fn learned_mac_is_listed() {
    let registry = MemoryRegistry::new();
    registry.seed("a", "10.0.0.1").seed("b", "10.0.0.2");
    registry.learn_mac("10.0.0.2", "aa:bb:cc:dd:ee:ff");

    let nodes = registry.client("10.0.0.1").list_nodes().await.unwrap();
    assert_eq!(nodes[0].mac, None);
    assert_eq!(nodes[1].mac.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
}

#[tokio::test]
async fn injected_faults_are_used_once() {
    let registry = MemoryRegistry::new();
    let client = registry.client("10.0.0.1");
    client.fail_next_list(ApiError::Interrupted);
    client.fail_next_command(ApiError::Status { path: "/api/nodes", status: 500 });

    assert!(matches!(client.list_nodes().await, Err(ApiError::Interrupted)));
    assert!(client.list_nodes().await.is_ok());

    assert!(client.register_node("Ana").await.is_err());
    assert!(registry.names().is_empty(), "failed command must not reach the server");
    client.register_node("Ana").await.unwrap();
    assert_eq!(registry.names(), vec!["Ana"]);
}

#[tokio::test(start_paused = true)]
async fn in_flight_lists_are_tracked() {
    let registry = MemoryRegistry::new();
    let slow = registry.client("10.0.0.1").with_latency(Duration::from_millis(500));

    let (a, b) = tokio::join!(slow.list_nodes(), slow.list_nodes());
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(registry.max_lists_in_flight(), 2);
    assert_eq!(registry.list_calls(), 2);

    slow.list_nodes().await.unwrap();
    assert_eq!(registry.max_lists_in_flight(), 2);
}

#[tokio::test(start_paused = true)]
async fn abandoned_list_leaves_flight() {
    let registry = MemoryRegistry::new();
    let slow = registry.client("10.0.0.1").with_latency(Duration::from_secs(10));

    let timed_out = tokio::time::timeout(Duration::from_secs(1), slow.list_nodes()).await;
    assert!(timed_out.is_err());

    let fast = registry.client("10.0.0.1");
    fast.list_nodes().await.unwrap();
    assert_eq!(registry.max_lists_in_flight(), 1);
}

/// An operator reorders from a list another client has since shrunk. The
/// server applies the stale indices as-is: here the target falls off the
/// end and the request is silently dropped.
#[tokio::test]
async fn reorder_with_stale_indices() {
    let registry = MemoryRegistry::new();
    registry.seed("a", "10.0.0.1").seed("b", "10.0.0.2").seed("Ana", "10.0.0.3");
    let ana = registry.client("10.0.0.3");

    let seen = ana.list_nodes().await.unwrap();
    let mine = seen.iter().position(|n| n.you).unwrap();
    assert_eq!(mine, 2);

    registry.client("10.0.0.1").unregister_node().await.unwrap();
    ana.reorder_node(mine, mine - 1).await.unwrap();

    assert_eq!(registry.names(), vec!["b", "Ana"]);
}

fn reorders() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..8).prop_flat_map(|len| {
        (Just(len), prop::collection::vec((0..len + 2, 0..len + 2), 0..12))
    })
}

proptest! {
    #[test]
    fn reorder_matches_vec_model((len, moves) in reorders()) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let registry = MemoryRegistry::new();
        let mut model: Vec<String> = (0..len).map(|i| format!("n{i}")).collect();
        for (i, name) in model.iter().enumerate() {
            registry.seed(name, &format!("10.0.1.{i}"));
        }
        let client = registry.client("10.0.1.0");

        for (cur, new) in moves {
            runtime.block_on(client.reorder_node(cur, new)).unwrap();
            if cur < len && new < len {
                let node = model.remove(cur);
                model.insert(new, node);
            }
        }

        prop_assert_eq!(registry.names(), model);
    }
}
