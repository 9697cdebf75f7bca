//! MCP tool tests: schemas, input handling and output formats.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use citeflex::server::McpServer;
use citeflex::tools::{
    ClassifyUrlTool, ExportCitationTool, FormatCitationTool, FormatNotesTool, FormatReferencesTool, McpTool,
    ToolContext, register_all_tools,
};
use citeflex::{CiteError, Citeflex, Config};

fn setup_test_context(mock_server: &MockServer) -> ToolContext {
    let citeflex = Citeflex::new(Config::for_testing(&mock_server.uri())).unwrap();
    ToolContext::new(Arc::new(citeflex))
}

async fn mount_book(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/crossref/works/10.7208/chicago/9780226458106.001.0001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "type": "monograph",
                "title": ["The Structure of Scientific Revolutions"],
                "author": [{"given": "Thomas S.", "family": "Kuhn"}],
                "issued": {"date-parts": [[1962]]},
                "publisher": "University of Chicago Press",
                "publisher-location": "Chicago",
                "DOI": "10.7208/chicago/9780226458106.001.0001"
            }
        })))
        .mount(mock_server)
        .await;
}

const KUHN_DOI: &str = "10.7208/chicago/9780226458106.001.0001";

#[test]
fn test_registered_tools() {
    let tools = register_all_tools();
    assert_eq!(tools.len(), 5);
    for tool in &tools {
        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object", "{}", tool.name());
        assert!(schema["required"].is_array(), "{}", tool.name());
        assert!(!tool.description().is_empty());
    }
}

#[tokio::test]
async fn test_server_lookup() {
    let mock_server = MockServer::start().await;
    let citeflex = Citeflex::new(Config::for_testing(&mock_server.uri())).unwrap();
    let server = McpServer::new(citeflex);

    assert!(server.get_tool("format_citation").is_some());
    assert!(server.get_tool("search_papers").is_none());
    assert!(server.get_tool("format_references").is_some());
    assert_eq!(server.list_tools().len(), 5);
}

#[tokio::test]
async fn test_format_citation_markdown() {
    let mock_server = MockServer::start().await;
    mount_book(&mock_server).await;
    let ctx = setup_test_context(&mock_server);

    let result = FormatCitationTool.execute(&ctx, json!({"text": KUHN_DOI})).await.unwrap();

    assert!(result.starts_with("# Chicago Manual of Style 17th Edition citation"));
    assert!(result.contains("*The Structure of Scientific Revolutions*"));
    assert!(result.contains("**Type**: book"));
}

#[tokio::test]
async fn test_format_citation_json() {
    let mock_server = MockServer::start().await;
    mount_book(&mock_server).await;
    let ctx = setup_test_context(&mock_server);

    let result = FormatCitationTool
        .execute(&ctx, json!({"text": KUHN_DOI, "style": "apa", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&result).unwrap();

    assert_eq!(value["style"], "apa");
    assert_eq!(
        value["citation"],
        "Kuhn, T. S. (1962). <i>The Structure of Scientific Revolutions</i>. University of Chicago Press. \
         https://doi.org/10.7208/chicago/9780226458106.001.0001"
    );
    assert_eq!(value["metadata"]["type"], "book");
}

#[tokio::test]
async fn test_format_citation_missing_text() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let err = FormatCitationTool.execute(&ctx, json!({"style": "mla"})).await.unwrap_err();
    assert!(matches!(err, CiteError::Serialization(_)));

    let err = FormatCitationTool.execute(&ctx, json!({"text": ""})).await.unwrap_err();
    assert!(matches!(err, CiteError::Validation { .. }));
}

#[tokio::test]
async fn test_classify_url_tool() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let markdown = ClassifyUrlTool
        .execute(&ctx, json!({"url": "https://www.nytimes.com/2024/03/05/nyregion/council.html"}))
        .await
        .unwrap();
    assert!(markdown.starts_with("# Route for nytimes.com"));
    assert!(markdown.contains("**Publication**: New York Times"));

    let json_out = ClassifyUrlTool
        .execute(&ctx, json!({"url": "https://doi.org/10.1038/nature12373", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json_out).unwrap();
    assert_eq!(value["engine"], "crossref");
    assert_eq!(value["identifier"], "10.1038/nature12373");
    assert!(value.get("alsoMatches").is_none());
}

#[tokio::test]
async fn test_classify_url_reports_shadowed_rules() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let url = "https://www.sciencedirect.com/science/article/pii/S0140673620301835?doi=10.1016/S0140-6736(20)30183-5";
    let json_out = ClassifyUrlTool.execute(&ctx, json!({"url": url, "responseFormat": "json"})).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&json_out).unwrap();
    assert_eq!(value["urlType"], "doi");
    assert!(value["alsoMatches"].as_array().unwrap().iter().any(|t| t == "academic_publisher"));

    let markdown = ClassifyUrlTool.execute(&ctx, json!({"url": url})).await.unwrap();
    assert!(markdown.contains("**Also matches**: ") && markdown.contains("academic_publisher"), "{markdown}");
}

#[tokio::test]
async fn test_export_citation_ris() {
    let mock_server = MockServer::start().await;
    mount_book(&mock_server).await;
    let ctx = setup_test_context(&mock_server);

    let ris = ExportCitationTool.execute(&ctx, json!({"text": KUHN_DOI})).await.unwrap();

    assert!(ris.starts_with("TY  - BOOK"));
    assert!(ris.contains("AU  - Kuhn, Thomas S."));
    assert!(ris.contains("PY  - 1962"));
    assert!(ris.trim_end().ends_with("ER  -"));
}

#[tokio::test]
async fn test_format_notes_tool() {
    let mock_server = MockServer::start().await;
    mount_book(&mock_server).await;
    let ctx = setup_test_context(&mock_server);

    let result = FormatNotesTool
        .execute(&ctx, json!({"notes": [KUHN_DOI, "Ibid., 52"], "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&result).unwrap();

    assert_eq!(value["total"], 2);
    assert_eq!(value["notes"][0]["form"], "full");
    assert_eq!(value["notes"][1]["citation"], "Ibid., 52.");

    let err = FormatNotesTool.execute(&ctx, json!({"notes": []})).await.unwrap_err();
    assert!(matches!(err, CiteError::Validation { .. }));
}

#[tokio::test]
async fn test_format_references_tool() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crossref/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"items": [{
                "type": "monograph",
                "title": ["The Structure of Scientific Revolutions"],
                "author": [{"given": "Thomas S.", "family": "Kuhn"}],
                "issued": {"date-parts": [[1962]]},
                "publisher": "University of Chicago Press",
                "DOI": KUHN_DOI
            }]}
        })))
        .mount(&mock_server)
        .await;
    let ctx = setup_test_context(&mock_server);

    let result = FormatReferencesTool
        .execute(&ctx, json!({"text": "Paradigms shift (Kuhn, 1962).", "style": "Chicago", "responseFormat": "json"}))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&result).unwrap();

    assert_eq!(value["heading"], "Bibliography");
    assert_eq!(value["found"], 1);
    assert!(value["entries"][0]["reference"].as_str().unwrap().starts_with("Kuhn, Thomas S."));

    let err = FormatReferencesTool.execute(&ctx, json!({"text": "  "})).await.unwrap_err();
    assert!(matches!(err, CiteError::Validation { .. }));
}
