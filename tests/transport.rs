mod common;

use std::time::Duration;

use httpmock::Method::GET;
use httpmock::MockServer;
use serde_json::json;
use tokio::sync::oneshot;

use service_gateway::services::client::GatewayClient;
use service_gateway::services::transport::ZmqTransport;
use service_gateway::GatewayFactory;

use common::config_for;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn requests_over_the_socket_are_answered_in_turn() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/points/36.6041944,-117.8738554");
            then.status(200)
                .json_body(json!({"properties": {"forecast": "sunny"}}));
        })
        .await;

    let transport = ZmqTransport::bind("tcp://127.0.0.1:0").await.unwrap();
    let endpoint = transport.endpoint().to_string();
    let router =
        GatewayFactory::create_from_config(&config_for(&server.base_url()), transport.reply_channel())
            .unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let loop_handle = tokio::spawn(async move {
        transport
            .serve(&router, async {
                let _ = stop_rx.await;
            })
            .await
    });

    let mut client = GatewayClient::connect(&endpoint, Duration::from_secs(10))
        .await
        .unwrap();

    let unknown = client.request("horoscope", json!("leo")).await.unwrap();
    assert_eq!(unknown.error.as_deref(), Some("parser"));
    assert_eq!(unknown.request, json!({"service": "horoscope", "data": "leo"}));

    let weather = client
        .request("nws", json!([36.6041944, -117.8738554]))
        .await
        .unwrap();
    assert!(!weather.is_error(), "reply: {weather:?}");
    assert_eq!(weather.response, json!({"properties": {"forecast": "sunny"}}));
    mock.assert_hits_async(1).await;

    stop_tx.send(()).unwrap();
    loop_handle.await.unwrap().unwrap();
}
