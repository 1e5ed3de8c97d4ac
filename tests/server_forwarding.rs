//! Running server: upstream forwarding and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use app_gate::config::GateConfig;
use app_gate::http::proxy::Upstream;
use app_gate::http::HttpServer;
use app_gate::lifecycle::Shutdown;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

mod common;

use common::{state_with, FakeStore, StaticSessions, StoreReply, MEMBER_TOKEN};

async fn start_gate(upstream: Option<std::net::SocketAddr>) -> (std::net::SocketAddr, Shutdown) {
    let store = Arc::new(FakeStore::new(StoreReply::Rows(vec![])));
    let mut state = state_with(StaticSessions::new(), store);
    if let Some(addr) = upstream {
        state = state.with_upstream(Upstream::new(&addr.to_string(), Duration::from_secs(1)).unwrap());
    }

    let server = HttpServer::with_state(GateConfig::default(), state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_public_page_is_forwarded_upstream() {
    let upstream = common::start_mock_server(
        Router::new().route("/blog/{slug}", get(|| async { "blog from upstream" })),
    )
    .await;
    let (gate, shutdown) = start_gate(Some(upstream)).await;

    let res = client()
        .get(format!("http://{}/blog/hello", gate))
        .send()
        .await
        .expect("gate unreachable");

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "blog from upstream");

    shutdown.trigger();
}

#[tokio::test]
async fn test_private_page_never_reaches_upstream() {
    let upstream = common::start_mock_server(
        Router::new().route("/settings", get(|| async { "secret settings" })),
    )
    .await;
    let (gate, shutdown) = start_gate(Some(upstream)).await;

    let res = client()
        .get(format!("http://{}/settings", gate))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 307);
    assert_eq!(res.headers()["location"], "/login");

    let res = client()
        .get(format!("http://{}/settings", gate))
        .bearer_auth(MEMBER_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "secret settings");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_502() {
    // Bind then drop to get a port nobody listens on.
    let dead = {
        let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap()
    };
    let (gate, shutdown) = start_gate(Some(dead)).await;

    let res = client().get(format!("http://{}/", gate)).send().await.unwrap();
    assert_eq!(res.status(), 502);

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let (gate, shutdown) = start_gate(None).await;
    let res = client().get(format!("http://{}/", gate)).send().await.unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let res = client()
        .get(format!("http://{}/", gate))
        .timeout(Duration::from_secs(1))
        .send()
        .await;
    assert!(res.is_err());
}
