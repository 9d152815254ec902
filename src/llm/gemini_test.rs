use super::*;

fn make_response(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 60 }
    })
    .to_string()
}

#[test]
fn parse_text_response() {
    let text = parse_response(&make_response("{\"headline\":\"Oi\"}")).unwrap();
    assert_eq!(text, "{\"headline\":\"Oi\"}");
}

#[test]
fn parse_keeps_fences_for_the_caller() {
    let text = parse_response(&make_response("```json\n{}\n```")).unwrap();
    assert!(text.starts_with("```json"));
}

#[test]
fn parse_no_candidates_is_empty() {
    let err = parse_response(r#"{"candidates":[]}"#).unwrap_err();
    assert!(matches!(err, LlmError::EmptyCandidate));
    let err = parse_response("{}").unwrap_err();
    assert!(matches!(err, LlmError::EmptyCandidate));
}

#[test]
fn parse_blocked_candidate_is_empty() {
    let json = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
    assert!(matches!(parse_response(json).unwrap_err(), LlmError::EmptyCandidate));
}

#[test]
fn parse_blank_text_is_empty() {
    assert!(matches!(parse_response(&make_response("  ")).unwrap_err(), LlmError::EmptyCandidate));
}

#[test]
fn parse_invalid_json() {
    assert!(matches!(parse_response("not json").unwrap_err(), LlmError::ApiParse(_)));
}

#[test]
fn request_body_wraps_prompt() {
    let v = serde_json::to_value(request_body("make a card")).unwrap();
    assert_eq!(v["contents"][0]["parts"][0]["text"], "make a card");
}
