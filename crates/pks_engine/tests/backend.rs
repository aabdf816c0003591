use pks_engine::{
    BackendSettings, ChatMessage, ChatRequest, ClientError, IngestMetadata, IngestRequest,
    KnowledgeBackend, RestBackend,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> RestBackend {
    let settings = BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    };
    RestBackend::new(settings).expect("client")
}

fn url_request(url: &str) -> IngestRequest {
    IngestRequest {
        url: Some(url.to_string()),
        text: None,
        metadata: IngestMetadata {
            title: "Example Page".to_string(),
            timestamp: "2026-08-06T12:00:00Z".to_string(),
            source: "pks-cli".to_string(),
            url: None,
        },
    }
}

#[tokio::test]
async fn ingest_posts_payload_and_parses_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/ingest"))
        .and(body_partial_json(json!({
            "url": "https://example.com",
            "metadata": {
                "title": "Example Page",
                "timestamp": "2026-08-06T12:00:00Z",
                "source": "pks-cli",
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "document_id": "doc-1",
            "chunks_count": 3,
            "point_ids": ["p1", "p2", "p3"],
            "status": "success"
        })))
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .ingest(url_request("https://example.com"))
        .await
        .expect("ingest ok");

    assert_eq!(response.document_id, "doc-1");
    assert_eq!(response.chunks_count, 3);
    assert_eq!(response.point_ids.len(), 3);
    assert_eq!(response.status, "success");
}

#[tokio::test]
async fn backend_detail_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/ingest"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "embedding provider down"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .ingest(url_request("https://example.com"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Backend {
            status: 500,
            detail: "embedding provider down".to_string(),
        }
    );
}

#[tokio::test]
async fn unparsable_error_body_falls_back_to_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/ingest"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream dead"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .ingest(url_request("https://example.com"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Backend {
            status: 503,
            detail: "http status 503".to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let settings = BackendSettings {
        // Nothing listens here.
        base_url: "http://127.0.0.1:9".to_string(),
        ..BackendSettings::default()
    };
    let backend = RestBackend::new(settings).expect("client");

    let err = backend
        .ingest(url_request("https://example.com"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ClientError::Transport(_)),
        "expected transport error, got {err:?}"
    );
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/ingest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .ingest(url_request("https://example.com"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ClientError::Parse(_)),
        "expected parse error, got {err:?}"
    );
}

#[tokio::test]
async fn ingest_without_url_or_text_is_rejected_before_the_wire() {
    // No mock server at all: validation must short-circuit.
    let settings = BackendSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        ..BackendSettings::default()
    };
    let backend = RestBackend::new(settings).expect("client");
    let request = IngestRequest {
        url: None,
        text: None,
        metadata: IngestMetadata {
            title: String::new(),
            timestamp: String::new(),
            source: "pks-cli".to_string(),
            url: None,
        },
    };

    let err = backend.ingest(request).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn chat_sends_query_and_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .and(body_partial_json(json!({
            "query": "What is PKS?",
            "history": [
                {"role": "user", "content": "earlier question"},
                {"role": "assistant", "content": "earlier answer"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "A personal knowledge system.",
            "sources": [
                {"title": "PKS docs", "url": "https://example.com/docs", "source": "web"}
            ],
            "context_used": 2
        })))
        .mount(&server)
        .await;

    let request = ChatRequest {
        query: "What is PKS?".to_string(),
        history: vec![
            ChatMessage {
                role: "user".to_string(),
                content: "earlier question".to_string(),
            },
            ChatMessage {
                role: "assistant".to_string(),
                content: "earlier answer".to_string(),
            },
        ],
    };
    let response = backend_for(&server).chat(request).await.expect("chat ok");

    assert_eq!(response.response, "A personal knowledge system.");
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].title, "PKS docs");
    assert_eq!(response.context_used, 2);
}

#[tokio::test]
async fn empty_chat_query_is_rejected_before_the_wire() {
    let settings = BackendSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        ..BackendSettings::default()
    };
    let backend = RestBackend::new(settings).expect("client");

    let err = backend
        .chat(ChatRequest {
            query: "   ".to_string(),
            history: Vec::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn document_listing_parses_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                {
                    "id": "doc-1",
                    "title": "First",
                    "url": "https://example.com/1",
                    "source": "web",
                    "timestamp": "2026-08-01T00:00:00Z"
                },
                {"id": "doc-2", "title": "Second", "source": "direct"}
            ]
        })))
        .mount(&server)
        .await;

    let listing = backend_for(&server)
        .list_documents()
        .await
        .expect("listing ok");

    assert_eq!(listing.documents.len(), 2);
    assert_eq!(listing.documents[0].title, "First");
    // Optional fields default to empty strings, matching the server model.
    assert_eq!(listing.documents[1].url, "");
    assert_eq!(listing.documents[1].timestamp, "");
}

#[tokio::test]
async fn deletion_hits_the_document_path_and_reports_chunks() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/documents/doc-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "deleted_count": 4})),
        )
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .delete_document("doc-1")
        .await
        .expect("delete ok");

    assert_eq!(response.status, "success");
    assert_eq!(response.deleted_count, 4);
}

#[tokio::test]
async fn health_reports_backend_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "qdrant_connected": true,
            "collection_name": "knowledge"
        })))
        .mount(&server)
        .await;

    let health = backend_for(&server).health().await.expect("health ok");

    assert_eq!(health.status, "healthy");
    assert!(health.qdrant_connected);
    assert_eq!(health.collection_name, "knowledge");
}
