use super::*;
use crate::test_support::{command, spawn_light_server};
use axum::http::StatusCode;
use tokio::net::TcpListener;

#[tokio::test]
async fn posts_command_as_json_and_returns_ack() {
    let (url, received) = spawn_light_server(StatusCode::OK)
        .await
        .expect("spawn server");
    let endpoint = HttpLightingEndpoint::new(url);

    let ack = endpoint
        .send_command(&command(255, 2))
        .await
        .expect("send");

    assert_eq!(ack.status, 200);
    assert_eq!(
        ack.json(),
        Some(serde_json::json!({ "status": "success" }))
    );
    assert_eq!(received.lock().await.as_slice(), &[command(255, 2)]);
}

#[tokio::test]
async fn non_success_status_is_endpoint_error() {
    let (url, _received) = spawn_light_server(StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .expect("spawn server");
    let endpoint =
        HttpLightingEndpoint::with_timeout(url, DEFAULT_REQUEST_TIMEOUT).expect("client");

    let err = endpoint
        .send_command(&command(1, 1))
        .await
        .expect_err("500 must fail");

    match err {
        DispatchError::Endpoint { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let url = Url::parse(&format!("http://{addr}/api/led/color")).expect("url");
    let endpoint = HttpLightingEndpoint::new(url);
    let err = endpoint
        .send_command(&command(1, 1))
        .await
        .expect_err("closed port must fail");
    assert!(err.is_transport());
}
