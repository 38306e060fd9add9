use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::services::feed::{OrderEvent, OrderEventKind};
use crate::state::test_helpers;

type Client = tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn recv_json(stream: &mut Client) -> Value {
    loop {
        let msg = timeout(Duration::from_millis(500), stream.next())
            .await
            .expect("feed receive timed out")
            .expect("feed stream ended")
            .expect("feed stream error");
        if let WsMessage::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("feed message should be json");
        }
    }
}

async fn connect(addr: std::net::SocketAddr) -> Client {
    let (stream, _) = connect_async(format!("ws://{addr}/api/orders/feed"))
        .await
        .expect("websocket connect");
    stream
}

async fn wait_for_subscribers(state: &crate::state::AppState, count: usize) {
    for _ in 0..50 {
        if state.feed.receiver_count() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("subscribers did not attach");
}

#[tokio::test]
async fn feed_greets_then_relays_events() {
    let state = test_helpers::test_app_state();
    let addr = test_helpers::spawn_server(state.clone()).await;

    let mut client = connect(addr).await;
    let hello = recv_json(&mut client).await;
    assert_eq!(hello["event"], "feed:connected");
    assert!(hello["client_id"].is_string());

    wait_for_subscribers(&state, 1).await;
    let order_id = uuid::Uuid::new_v4();
    state.feed.send(OrderEvent::deleted(order_id)).unwrap();

    let event = recv_json(&mut client).await;
    assert_eq!(event["event"], "order:deleted");
    assert_eq!(event["order_id"], order_id.to_string());
    assert!(event.get("order").is_none());
}

#[tokio::test]
async fn every_connected_screen_receives_the_event() {
    let state = test_helpers::test_app_state();
    let addr = test_helpers::spawn_server(state.clone()).await;

    let mut kitchen = connect(addr).await;
    let mut counter = connect(addr).await;
    recv_json(&mut kitchen).await;
    recv_json(&mut counter).await;
    wait_for_subscribers(&state, 2).await;

    state.feed.send(OrderEvent::deleted(uuid::Uuid::nil())).unwrap();
    for client in [&mut kitchen, &mut counter] {
        let event: OrderEvent = serde_json::from_value(recv_json(client).await).unwrap();
        assert_eq!(event.event, OrderEventKind::Deleted);
    }
}

#[tokio::test]
async fn closing_the_socket_drops_the_subscription() {
    let state = test_helpers::test_app_state();
    let addr = test_helpers::spawn_server(state.clone()).await;

    let mut client = connect(addr).await;
    recv_json(&mut client).await;
    wait_for_subscribers(&state, 1).await;

    client.send(WsMessage::Close(None)).await.unwrap();
    for _ in 0..50 {
        if state.feed.receiver_count() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("subscription was not dropped after close");
}
