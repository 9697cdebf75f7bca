//! HTTP surface tests against the router, without binding a socket.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use citeflex::server::McpServer;
use citeflex::{Citeflex, Config};

fn app(mock_server: &MockServer) -> axum::Router {
    let citeflex = Citeflex::new(Config::for_testing(&mock_server.uri())).unwrap();
    McpServer::new(citeflex).into_router()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn mount_crossref(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/crossref/works/10.2307/1914185"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "type": "journal-article",
                "title": ["Prospect Theory: An Analysis of Decision under Risk"],
                "author": [
                    {"given": "Daniel", "family": "Kahneman"},
                    {"given": "Amos", "family": "Tversky"}
                ],
                "container-title": ["Econometrica"],
                "published-print": {"date-parts": [[1979, 3]]},
                "volume": "47",
                "issue": "2",
                "page": "263-291",
                "DOI": "10.2307/1914185"
            }
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_health() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "citeflex");
    assert_eq!(body["tools"], 5);
    assert_eq!(body["searchFallback"], false);
}

#[tokio::test]
async fn test_classify() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server)
        .oneshot(post_json("/api/classify", &json!({"url": "https://arxiv.org/abs/1706.03762v5"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["urlType"], "arxiv");
    assert_eq!(body["engine"], "arxiv");
    assert_eq!(body["domain"], "arxiv.org");
}

#[tokio::test]
async fn test_classify_rejects_bad_url() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server)
        .oneshot(post_json("/api/classify", &json!({"url": "ftp://example.com/file"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("unsupported scheme"));
}

#[tokio::test]
async fn test_cite() {
    let mock_server = MockServer::start().await;
    mount_crossref(&mock_server).await;

    let response = app(&mock_server)
        .oneshot(post_json("/api/cite", &json!({"text": "10.2307/1914185", "style": "mla", "plain": true})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["style"], "mla");
    let citation = body["citation"].as_str().unwrap();
    assert!(citation.starts_with("Kahneman, Daniel, and Amos Tversky."));
    assert!(!citation.contains("<i>"));
    assert_eq!(body["metadata"]["title"], "Prospect Theory: An Analysis of Decision under Risk");
}

#[tokio::test]
async fn test_cite_accepts_written_style_names() {
    let mock_server = MockServer::start().await;
    mount_crossref(&mock_server).await;

    for (name, key, prefix) in [
        ("APA 7", "apa", "Kahneman, D., & Tversky, A. (1979)."),
        ("Chicago", "chicago", "Daniel Kahneman and Amos Tversky,"),
        ("MLA 9", "mla", "Kahneman, Daniel, and Amos Tversky."),
    ] {
        let response = app(&mock_server)
            .oneshot(post_json("/api/cite", &json!({"text": "10.2307/1914185", "style": name, "plain": true})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{name}");
        let body = body_json(response).await;
        assert_eq!(body["style"], key);
        assert!(body["citation"].as_str().unwrap().starts_with(prefix), "{name}: {}", body["citation"]);
    }
}

#[tokio::test]
async fn test_notes_accepts_long_style_name() {
    let mock_server = MockServer::start().await;
    mount_crossref(&mock_server).await;

    let response = app(&mock_server)
        .oneshot(post_json(
            "/api/notes",
            &json!({"notes": ["10.2307/1914185", "Ibid."], "style": "Chicago Manual of Style 17th"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["notes"][1]["citation"], "Ibid.");
}

#[tokio::test]
async fn test_cite_validation_error() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server)
        .oneshot(post_json("/api/cite", &json!({"text": "   "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_cite_unavailable_is_bad_gateway() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let response = app(&mock_server)
        .oneshot(post_json("/api/cite", &json!({"text": "10.9999/none"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_export_bibtex() {
    let mock_server = MockServer::start().await;
    mount_crossref(&mock_server).await;

    let response = app(&mock_server)
        .oneshot(post_json("/api/export", &json!({"text": "10.2307/1914185", "format": "bibtex"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/x-bibtex");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("@article{"));
    assert!(text.contains("doi = {10.2307/1914185}"));
}

#[tokio::test]
async fn test_notes() {
    let mock_server = MockServer::start().await;
    mount_crossref(&mock_server).await;

    let response = app(&mock_server)
        .oneshot(post_json("/api/notes", &json!({"notes": ["10.2307/1914185", "ibid., 270"]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["notes"][1]["citation"], "Ibid., 270.");
    assert_eq!(body["notes"][1]["form"], "ibid");
}

#[tokio::test]
async fn test_references() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crossref/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"items": [{
                "type": "journal-article",
                "title": ["Prospect Theory: An Analysis of Decision under Risk"],
                "author": [
                    {"given": "Daniel", "family": "Kahneman"},
                    {"given": "Amos", "family": "Tversky"}
                ],
                "container-title": ["Econometrica"],
                "published-print": {"date-parts": [[1979, 3]]},
                "DOI": "10.2307/1914185"
            }]}
        })))
        .mount(&mock_server)
        .await;

    let response = app(&mock_server)
        .oneshot(post_json(
            "/api/references",
            &json!({"text": "Losses loom larger (Kahneman & Tversky, 1979).", "style": "APA 7"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["style"], "apa");
    assert_eq!(body["heading"], "References");
    assert_eq!(body["found"], 1);
    assert!(body["text"].as_str().unwrap().starts_with("References\n\nKahneman, D., & Tversky, A. (1979)."));
}

#[tokio::test]
async fn test_classify_lists_shadowed_rules() {
    let mock_server = MockServer::start().await;
    let url = "https://www.sciencedirect.com/science/article/pii/S0140673620301835?doi=10.1016/S0140-6736(20)30183-5";
    let response = app(&mock_server)
        .oneshot(post_json("/api/classify", &json!({ "url": url })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["urlType"], "doi");
    assert!(body["alsoMatches"].as_array().unwrap().iter().any(|t| t == "academic_publisher"));
}

#[tokio::test]
async fn test_notes_rejects_empty_list() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server)
        .oneshot(post_json("/api/notes", &json!({"notes": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mcp_tools_list() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server)
        .oneshot(post_json("/mcp", &json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<&str> = body["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec!["format_citation", "classify_url", "export_citation", "format_notes", "format_references"]
    );
}

#[tokio::test]
async fn test_mcp_notification_accepted() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server)
        .oneshot(post_json("/mcp", &json!({"jsonrpc": "2.0", "method": "notifications/initialized"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}
