use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::extract::{ExtractedContent, Extractor};

/// Request half of the capture-surface contract. On the wire:
/// `{"action": "getContent"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ContentRequest {
    #[serde(rename = "getContent")]
    GetContent,
}

/// Response half of the capture-surface contract. On the wire either
/// `{"success": true, "data": {…}}` or `{"success": false, "error": "…"}`;
/// the two shapes are told apart by their payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentReply {
    Success {
        success: bool,
        data: ExtractedContent,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl ContentReply {
    pub fn success(data: ExtractedContent) -> Self {
        Self::Success {
            success: true,
            data,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            success: false,
            error: error.into(),
        }
    }
}

/// Serves a capture surface's content request against a page. Extraction is
/// total, so the failure arm exists only for the contract's sake and for
/// transports that can fail before reaching the extractor.
pub fn handle_content_request(
    request: ContentRequest,
    extractor: &dyn Extractor,
    html: &str,
    url: &str,
) -> ContentReply {
    match request {
        ContentRequest::GetContent => {
            let doc = Html::parse_document(html);
            ContentReply::success(extractor.extract(&doc, url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{handle_content_request, ContentReply, ContentRequest};
    use crate::extract::PageExtractor;

    #[test]
    fn request_wire_format_is_the_action_tag() {
        let encoded = serde_json::to_string(&ContentRequest::GetContent).unwrap();
        assert_eq!(encoded, r#"{"action":"getContent"}"#);
        let decoded: ContentRequest = serde_json::from_str(r#"{"action":"getContent"}"#).unwrap();
        assert_eq!(decoded, ContentRequest::GetContent);
    }

    #[test]
    fn reply_variants_are_told_apart_by_payload_field() {
        let failure: ContentReply =
            serde_json::from_str(r#"{"success":false,"error":"no page"}"#).unwrap();
        assert_eq!(failure, ContentReply::failure("no page"));

        let success_json = r#"{
            "success": true,
            "data": {
                "title": "T",
                "url": "https://example.com",
                "content": "body text",
                "author": null,
                "description": null
            }
        }"#;
        let success: ContentReply = serde_json::from_str(success_json).unwrap();
        match success {
            ContentReply::Success { success, data } => {
                assert!(success);
                assert_eq!(data.content, "body text");
                assert_eq!(data.author, None);
            }
            other => panic!("expected success reply, got {other:?}"),
        }
    }

    #[test]
    fn handler_answers_get_content_with_extracted_data() {
        let extractor = PageExtractor::default();
        let html = "<html><head><title>Note</title></head><body><p>hello there</p></body></html>";
        let reply = handle_content_request(
            ContentRequest::GetContent,
            &extractor,
            html,
            "https://example.com/note",
        );
        match reply {
            ContentReply::Success { data, .. } => {
                assert_eq!(data.title, "Note");
                assert_eq!(data.url, "https://example.com/note");
                assert_eq!(data.content, "hello there");
            }
            other => panic!("expected success reply, got {other:?}"),
        }
    }
}
