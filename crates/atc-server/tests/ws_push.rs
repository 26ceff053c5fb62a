use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use atc_hub::Hub;
use atc_testing::events;
use atc_types::{Mode, PushKind, PushMessage};

async fn spawn_server(hub: Arc<Hub>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, atc_server::router(hub))
            .await
            .unwrap();
    });
    addr
}

async fn wait_for_subscribers(hub: &Hub, count: usize) {
    for _ in 0..500 {
        if hub.subscriber_count() == count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "subscriber count never reached {count} (currently {})",
        hub.subscriber_count()
    );
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for push frame")
            .expect("socket closed")
            .expect("socket errored");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("push frame is JSON");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_connect_replays_snapshot_then_events_then_live() {
    let hub = Hub::new(Mode::Planning);

    // Pre-load state before anyone connects
    hub.publish(PushMessage::new(
        PushKind::Issues,
        json!([{"number": 7, "title": "t", "velocity": 100}]),
        Some(Mode::Planning),
    ));
    hub.ingest_flat(events::flat("start", json!({"tag": "A"})));
    hub.ingest_flat(events::flat("progress", json!({"tag": "B"})));

    let addr = spawn_server(hub.clone()).await;
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();

    let first = next_json(&mut ws).await;
    assert_eq!(first["type"], "issues");
    assert_eq!(first["data"][0]["number"], 7);

    let second = next_json(&mut ws).await;
    assert_eq!(second["type"], "events");
    let replay = second["data"].as_array().unwrap();
    assert_eq!(replay.len(), 2);
    assert_eq!(replay[0]["data"]["tag"], "A");
    assert_eq!(replay[1]["data"]["tag"], "B");
    // Replayed ring frames carry no mode
    assert!(second.get("mode").is_none());

    // Only broadcast once the control loop has the subscriber registered
    wait_for_subscribers(&hub, 1).await;
    hub.ingest_flat(events::flat("complete", json!({"tag": "C"})));

    let third = next_json(&mut ws).await;
    assert_eq!(third["type"], "event");
    assert_eq!(third["mode"], "planning");
    assert_eq!(third["data"]["data"]["tag"], "C");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_client_close_unregisters_subscriber() {
    let hub = Hub::new(Mode::Planning);
    let addr = spawn_server(hub.clone()).await;

    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    wait_for_subscribers(&hub, 1).await;

    ws.close(None).await.unwrap();
    wait_for_subscribers(&hub, 0).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_two_subscribers_see_the_same_sequence() {
    let hub = Hub::new(Mode::Planning);
    let addr = spawn_server(hub.clone()).await;

    let (mut ws_a, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let (mut ws_b, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    wait_for_subscribers(&hub, 2).await;

    // Drain the replay frame each connection starts with
    assert_eq!(next_json(&mut ws_a).await["type"], "events");
    assert_eq!(next_json(&mut ws_b).await["type"], "events");

    for seq in 0..5 {
        hub.ingest_flat(events::flat("progress", json!({"seq": seq})));
    }

    for ws in [&mut ws_a, &mut ws_b] {
        for seq in 0..5 {
            let frame = next_json(ws).await;
            assert_eq!(frame["type"], "event");
            assert_eq!(frame["data"]["data"]["seq"], seq);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_experiment_ingress_reaches_subscribers() {
    let hub = Hub::new(Mode::Experiment);
    let addr = spawn_server(hub.clone()).await;

    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    assert_eq!(next_json(&mut ws).await["type"], "events");
    wait_for_subscribers(&hub, 1).await;

    hub.ingest_experiment(events::session_start("s1", "run", 2));

    let frame = next_json(&mut ws).await;
    assert_eq!(frame["type"], "experiment");
    assert_eq!(frame["data"]["type"], "session_start");
    assert_eq!(frame["data"]["session_id"], "s1");
}
