//! Application lifecycle tests.

use std::sync::Arc;

use dripwatch::app::App;
use dripwatch::config::Config;
use dripwatch::testkit::MockSensor;

fn config_for(addr: std::net::SocketAddr) -> Config {
    toml::from_str::<Config>(&format!(
        "[server]\nbind_address = \"{}\"\nport = {}\n",
        addr.ip(),
        addr.port()
    ))
    .unwrap()
}

#[tokio::test]
async fn startup_failure_releases_the_sensor_subscription() {
    // Occupy a port so the status server cannot bind.
    let blocker = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = blocker.local_addr().unwrap();

    let sensor = Arc::new(MockSensor::new());
    let result = App::run_with_sensor(config_for(addr), sensor.clone()).await;

    assert!(result.is_err(), "bind conflict must be fatal");
    assert!(
        sensor.subscription_cancelled(),
        "subscription must be cancelled before exit"
    );
}

#[tokio::test]
async fn running_app_pushes_status_to_websocket_observers() {
    use futures_util::StreamExt;

    let probe = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = probe.local_addr().unwrap();
    drop(probe);

    let sensor = Arc::new(MockSensor::new());
    let app_sensor = sensor.clone();
    let app = tokio::spawn(async move {
        let _ = App::run_with_sensor(config_for(addr), app_sensor).await;
    });

    // Wait for the server to come up, then subscribe as an observer.
    let mut socket = loop {
        match tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await {
            Ok((socket, _)) => break socket,
            Err(_) => tokio::time::sleep(std::time::Duration::from_millis(20)).await,
        }
    };

    // A freshly started line has no drops yet.
    let first = socket.next().await.unwrap().unwrap();
    assert_eq!(first.into_text().unwrap(), "Drip rate: 0 drops/min");

    app.abort();
}
