use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::{Value, json};
use studio_api::ClientSettings;
use studio_engine::{
    HttpOptionFetcher, OptionSource, RemoteOptionResolver, ResolutionState, ResolveError, ResponseFormat, StudioConfig,
};
use studio_types::{FieldMapping, SelectOption};

fn models() -> Value {
    json!([
        {"model_name": "X1", "model_slug": "x1", "model_image": "https://cdn.example.com/x1.png"},
        {"model_name": "X2", "model_slug": "x2", "model_image": ""},
        {"model_name": "Z9", "model_slug": "z9"}
    ])
}

async fn spawn_backend() -> SocketAddr {
    let app = Router::new()
        .route("/api/models", get(|| async { Json(models()) }))
        .route("/api/options", get(|| async { Json(json!([{"label": "Small", "value": "s"}])) }))
        .route("/api/broken", get(|| async { "<html>maintenance</html>" }))
        .route(
            "/api/error",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
        .route(
            "/api/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!([]))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve test backend") });
    addr
}

fn resolver(settings: ClientSettings) -> RemoteOptionResolver {
    let fetcher = HttpOptionFetcher::from_settings(settings).expect("build fetcher");
    RemoteOptionResolver::new(Arc::new(fetcher))
}

fn model_format() -> ResponseFormat {
    ResponseFormat::FieldMap(FieldMapping::new("model_name", "model_slug").with_image("model_image"))
}

#[tokio::test]
async fn mapped_models_keep_order_and_length() {
    let addr = spawn_backend().await;
    let mut resolver = resolver(ClientSettings::default());

    resolver.resolve(OptionSource::new(format!("http://{addr}/api/models"), model_format()));
    let state = resolver.settled().await;

    let options = state.options().expect("ready options");
    assert_eq!(options.len(), models().as_array().map(Vec::len).unwrap_or_default());
    assert_eq!(
        options,
        &[
            SelectOption::new("X1", "x1").with_image("https://cdn.example.com/x1.png"),
            SelectOption::new("X2", "x2"),
            SelectOption::new("Z9", "z9"),
        ]
    );
}

#[tokio::test]
async fn identity_format_accepts_normalized_bodies() {
    let addr = spawn_backend().await;
    let mut resolver = resolver(ClientSettings::default());

    resolver.resolve(OptionSource::new(format!("http://{addr}/api/options"), ResponseFormat::Identity));

    assert_eq!(
        resolver.settled().await,
        ResolutionState::Ready(vec![SelectOption::new("Small", "s")])
    );
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let addr = spawn_backend().await;
    let mut resolver = resolver(ClientSettings::default());

    resolver.resolve(OptionSource::new(format!("http://{addr}/api/broken"), model_format()));

    assert!(matches!(resolver.settled().await, ResolutionState::Failed(ResolveError::Decode(_))));
}

#[tokio::test]
async fn server_errors_are_network_errors() {
    let addr = spawn_backend().await;
    let mut resolver = resolver(ClientSettings::default());

    resolver.resolve(OptionSource::new(format!("http://{addr}/api/error"), model_format()));

    match resolver.settled().await {
        ResolutionState::Failed(ResolveError::Network(message)) => assert!(message.contains("500")),
        other => panic!("expected network failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut resolver = resolver(ClientSettings::default());
    resolver.resolve(OptionSource::new(format!("http://{addr}/api/models"), model_format()));

    assert!(matches!(resolver.settled().await, ResolutionState::Failed(ResolveError::Network(_))));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let addr = spawn_backend().await;
    let mut resolver = resolver(ClientSettings {
        timeout: Duration::from_millis(200),
        allow_insecure_http: false,
    });

    resolver.resolve(OptionSource::new(format!("http://{addr}/api/slow"), model_format()));

    assert!(matches!(resolver.settled().await, ResolutionState::Failed(ResolveError::Network(_))));
}

#[tokio::test]
async fn remote_plain_http_is_refused_before_sending() {
    let mut resolver = resolver(ClientSettings::default());

    resolver.resolve(OptionSource::new("http://api.example.com/models", model_format()));

    match resolver.settled().await {
        ResolutionState::Failed(ResolveError::Network(message)) => assert!(message.contains("https")),
        other => panic!("expected policy failure, got {other:?}"),
    }
}

#[tokio::test]
async fn builtin_field_resolves_against_configured_backend() {
    let addr = spawn_backend().await;
    let config = StudioConfig {
        backend_url: Some(format!("http://{addr}")),
        ..StudioConfig::default()
    };
    let source = config
        .option_source("equipmentGuide.sections.equipment.modelSlug")
        .expect("builtin field");
    let mut resolver = resolver(config.client_settings());

    resolver.resolve(source);
    let state = resolver.settled().await;

    let values: Vec<&str> = state
        .options()
        .expect("ready options")
        .iter()
        .map(|option| option.value.as_str())
        .collect();
    assert_eq!(values, ["x1", "x2", "z9"]);
}
