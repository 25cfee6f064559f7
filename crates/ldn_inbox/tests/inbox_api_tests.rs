//! End-to-end tests of the inbox HTTP surface with in-memory storage.

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use ldn_graph::{iris, Graph, RdfFormat, RdfTerm, RdfTriple};
use ldn_inbox::{InboxConfig, InboxServer, NotificationStore};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

const INBOX_IRI: &str = "http://127.0.0.1:8088/inbox";
const TRIPLE_TTL: &str = "<http://e.example/s> <http://e.example/p> <http://e.example/o> .";

fn app() -> Router {
    InboxServer::new(InboxConfig::default())
        .unwrap()
        .build_router()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn header_of<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

fn get(uri: &str, accept: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn path_of(location: &str) -> String {
    location
        .strip_prefix("http://127.0.0.1:8088")
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_root_page() {
    let app = app();
    let response = send(&app, get("/", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_of(&response, "content-type").unwrap().starts_with("text/html"));
    assert!(header_of(&response, "link")
        .unwrap()
        .contains("rel=\"http://www.w3.org/ns/ldp#inbox\""));
    assert!(header_of(&response, "x-powered-by").is_some());
    assert!(body_string(response).await.contains(INBOX_IRI));
}

#[tokio::test]
async fn test_head_and_options_on_inbox() {
    let app = app();

    for method in [Method::HEAD, Method::OPTIONS] {
        for uri in ["/inbox/", "/inbox"] {
            let request = Request::builder()
                .method(method.clone())
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = send(&app, request).await;

            assert_eq!(response.status(), StatusCode::OK, "{method} {uri}");
            assert_eq!(header_of(&response, "allow"), Some("GET, HEAD, OPTIONS, POST"));
            assert_eq!(
                header_of(&response, "accept-post"),
                Some("application/ld+json, text/turtle")
            );
            assert!(header_of(&response, "link")
                .unwrap()
                .contains("<http://www.w3.org/ns/ldp#BasicContainer>; rel=\"type\""));
            assert!(body_string(response).await.is_empty());
        }
    }
}

#[tokio::test]
async fn test_post_then_fetch_round_trip() {
    let app = app();

    let response = send(&app, post("/inbox/", "text/turtle", TRIPLE_TTL)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(header_of(&response, "content-type").is_none());

    let location = header_of(&response, "location").unwrap().to_string();
    let id = location
        .strip_prefix(&format!("{}/", INBOX_IRI))
        .expect("location lives under the inbox");
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(body_string(response).await.is_empty());

    // The notification itself
    let response = send(&app, get(&path_of(&location), Some("text/turtle"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_of(&response, "content-type"), Some("text/turtle"));
    assert_eq!(header_of(&response, "allow"), Some("GET"));
    let graph = Graph::parse(body_string(response).await.as_bytes(), RdfFormat::Turtle).unwrap();
    assert_eq!(
        graph,
        Graph::parse(TRIPLE_TTL.as_bytes(), RdfFormat::Turtle).unwrap()
    );

    // The inbox lists it
    let response = send(&app, get("/inbox/", Some("application/ld+json"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_of(&response, "content-type"), Some("application/ld+json"));
    assert_eq!(header_of(&response, "allow"), Some("GET, HEAD, OPTIONS, POST"));
    let inbox = Graph::parse(body_string(response).await.as_bytes(), RdfFormat::JsonLd).unwrap();
    assert!(inbox.contains(&RdfTriple::new(
        RdfTerm::iri(INBOX_IRI),
        RdfTerm::iri(iris::LDP_CONTAINS),
        RdfTerm::iri(location.as_str()),
    )));
}

#[tokio::test]
async fn test_post_json_ld_and_fetch_as_turtle() {
    let app = app();
    let payload = r#"{
        "@context": "https://www.w3.org/ns/activitystreams",
        "type": "Announce",
        "actor": "http://sender.example/",
        "object": "http://sender.example/dataset"
    }"#;

    let response = send(
        &app,
        post("/inbox/", "application/ld+json; charset=utf-8", payload),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = header_of(&response, "location").unwrap().to_string();

    let response = send(&app, get(&path_of(&location), Some("turtle"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_of(&response, "content-type"), Some("turtle"));
    let body = body_string(response).await;
    assert!(body.contains("as:Announce"));
    assert!(body.contains("<http://sender.example/dataset>"));
}

#[tokio::test]
async fn test_default_format_for_browsers() {
    let app = app();
    for accept in [None, Some("*/*"), Some("text/html,application/xhtml+xml")] {
        let response = send(&app, get("/inbox/", accept)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_of(&response, "content-type"), Some("application/ld+json"));
        let body = body_string(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["@graph"].is_array());
    }
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let response = send(&app(), post("/inbox/", "application/xml", "<x/>")).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_string(response).await, "Content type not accepted");
}

#[tokio::test]
async fn test_empty_and_malformed_payloads() {
    let app = app();

    let response = send(&app, post("/inbox/", "text/turtle", "")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Received empty payload");

    let response = send(&app, post("/inbox/", "text/turtle", "<http://e.example/s> .")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response).await,
        "Could not parse received text/turtle payload"
    );

    // Nothing was added to the inbox
    let response = send(&app, get("/inbox/", Some("text/turtle"))).await;
    let inbox = Graph::parse(body_string(response).await.as_bytes(), RdfFormat::Turtle).unwrap();
    assert_eq!(inbox.len(), 4);
}

#[tokio::test]
async fn test_legacy_status_codes() {
    let config = InboxConfig {
        legacy_status_codes: true,
        ..Default::default()
    };
    let app = InboxServer::new(config).unwrap().build_router();

    let response = send(&app, post("/inbox/", "application/xml", "<x/>")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = send(&app, post("/inbox/", "text/turtle", "")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Received empty payload");
}

#[tokio::test]
async fn test_unknown_notification() {
    let response = send(&app(), get("/inbox/deadbeef", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_string(response).await,
        "Requested notification does not exist"
    );
}

#[tokio::test]
async fn test_unsupported_accept() {
    let response = send(&app(), get("/inbox/", Some("application/pdf"))).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_string(response).await, "Requested format unavailable");
}

#[tokio::test]
async fn test_custom_inbox_path() {
    let config = InboxConfig::default().with_port(80).with_inbox_path("ldn/box");
    let app = InboxServer::new(config).unwrap().build_router();

    let response = send(&app, post("/ldn/box/", "turtle", TRIPLE_TTL)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = header_of(&response, "location").unwrap().to_string();
    assert!(location.starts_with("http://127.0.0.1/ldn/box/"));

    let path = location.strip_prefix("http://127.0.0.1").unwrap();
    let response = send(&app, get(path, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_memory_backend() {
    let app = app();
    send(&app, post("/inbox/", "text/turtle", TRIPLE_TTL)).await;

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["backend"], "mem");
    assert_eq!(json["notifications"], 1);
    assert_eq!(json["inbox_iri"], INBOX_IRI);
}

#[tokio::test]
async fn test_concurrent_posts_get_distinct_ids() {
    let server = InboxServer::new(InboxConfig::default()).unwrap();
    let app = server.build_router();
    let store: Arc<dyn NotificationStore> = server.state().engine.store().clone();

    let mut handles = Vec::new();
    for i in 0..32 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let body = format!("<http://e.example/s{i}> <http://e.example/p> \"{i}\" .");
            let response = app
                .oneshot(post("/inbox/", "text/turtle", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            header_of(&response, "location").unwrap().to_string()
        }));
    }

    let mut locations = HashSet::new();
    for handle in handles {
        locations.insert(handle.await.unwrap());
    }
    assert_eq!(locations.len(), 32);

    let inbox = store.fetch_inbox(RdfFormat::Turtle).await.unwrap();
    let inbox = Graph::parse(inbox.as_bytes(), RdfFormat::Turtle).unwrap();
    let members: HashSet<String> = inbox
        .objects(&RdfTerm::iri(INBOX_IRI), &RdfTerm::iri(iris::LDP_CONTAINS))
        .filter_map(|o| o.as_iri().map(str::to_string))
        .collect();
    assert_eq!(members, locations);
}
