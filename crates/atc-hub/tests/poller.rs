use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use atc_hub::{Hub, HostFeed, Poller};
use atc_testing::events;
use atc_testing::feeds::{FailingHosts, ScriptedIssues, StaticHosts, host, issue};
use atc_types::{HostStatus, Mode};

fn parse(frame: &str) -> Value {
    serde_json::from_str(frame).expect("push frame is JSON")
}

#[tokio::test(start_paused = true)]
async fn test_planning_cycle_publishes_issue_snapshot() {
    let hub = Hub::new(Mode::Planning);
    let poller = Poller::new(
        hub.clone(),
        ScriptedIssues::new(vec![Ok(vec![issue(3, 600), issue(1, 400)])]),
        StaticHosts(Vec::new()),
    );

    poller.fetch_and_publish().await;

    let snapshot = hub.last_snapshot().unwrap();
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["type"], "issues");
    assert_eq!(value["mode"], "planning");
    assert_eq!(value["data"][0]["number"], 3);
    assert_eq!(value["data"][1]["number"], 1);
}

#[tokio::test(start_paused = true)]
async fn test_collaborator_failure_still_publishes_empty_data() {
    let hub = Hub::new(Mode::Active);
    let (_id, mut rx) = hub.subscribe();
    // Let the control loop register the subscriber
    tokio::time::sleep(Duration::from_millis(10)).await;
    // Drain the empty replay frame
    let replay = parse(&rx.recv().await.unwrap());
    assert_eq!(replay["type"], "events");

    let poller = Poller::new(hub.clone(), ScriptedIssues::empty(), FailingHosts);
    poller.fetch_and_publish().await;

    let snapshot = serde_json::to_value(hub.last_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot["type"], "hosts");
    assert_eq!(snapshot["data"], serde_json::json!([]));

    // Subscribers observe the empty frame, never an error frame
    let frame = parse(&rx.recv().await.unwrap());
    assert_eq!(frame["type"], "hosts");
    assert_eq!(frame["data"].as_array().unwrap().len(), 0);
}

struct HangingHosts;

#[async_trait]
impl HostFeed for HangingHosts {
    async fn fetch_host_statuses(&self) -> anyhow::Result<Vec<HostStatus>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

#[tokio::test(start_paused = true)]
async fn test_hung_collaborator_is_bounded_by_fetch_timeout() {
    let hub = Hub::new(Mode::Active);
    let poller = Poller::new(hub.clone(), ScriptedIssues::empty(), HangingHosts);

    let started = tokio::time::Instant::now();
    poller.fetch_and_publish().await;

    assert!(started.elapsed() < Duration::from_secs(6));
    let snapshot = serde_json::to_value(hub.last_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot["data"], serde_json::json!([]));
}

#[tokio::test(start_paused = true)]
async fn test_experiment_cycle_bundles_sessions_and_hosts() {
    let hub = Hub::new(Mode::Experiment);
    hub.ingest_experiment(events::session_start("s1", "run", 2));

    let poller = Poller::new(
        hub.clone(),
        ScriptedIssues::empty(),
        StaticHosts(vec![host("titan", &["llama3:70b"])]),
    );
    poller.fetch_and_publish().await;

    let snapshot = serde_json::to_value(hub.last_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot["type"], "experiment_state");
    assert_eq!(snapshot["data"]["sessions"][0]["id"], "s1");
    assert_eq!(snapshot["data"]["hosts"][0]["name"], "titan");
}

#[tokio::test(start_paused = true)]
async fn test_interval_change_takes_effect_on_next_cycle() {
    let hub = Hub::new(Mode::Planning);

    let (_id, mut rx) = hub.subscribe();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let replay = parse(&rx.recv().await.unwrap());
    assert_eq!(replay["type"], "events");

    let poller = Poller::new(hub.clone(), ScriptedIssues::empty(), StaticHosts(Vec::new()));
    let start = tokio::time::Instant::now();
    tokio::spawn(poller.run());

    // Immediate first cycle
    let _ = rx.recv().await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(1));

    // Shrink the interval while the 10s sleep is in flight; that sleep is
    // not interrupted, so the second cycle still lands at 10s and the new
    // cadence starts after it
    hub.set_interval_secs(2).unwrap();

    let _ = rx.recv().await.unwrap();
    let second_at = start.elapsed();
    assert!(second_at >= Duration::from_secs(10));
    assert!(second_at < Duration::from_secs(12));

    let _ = rx.recv().await.unwrap();
    let third_at = start.elapsed();
    assert!(third_at - second_at >= Duration::from_secs(2));
    assert!(third_at - second_at < Duration::from_secs(3));

    let _ = rx.recv().await.unwrap();
    let fourth_at = start.elapsed();
    assert!(fourth_at - third_at >= Duration::from_secs(2));
    assert!(fourth_at - third_at < Duration::from_secs(3));
}
