use chat_api::{normalize_chat_completions_url, ChatApiClient, ChatApiConfig, ChatMessage, ChatRequest};
use serde_json::Value;

#[test]
fn http_request_targets_completions_endpoint_with_json_body() {
    let config = ChatApiConfig::new("sk-test").with_base_url("http://127.0.0.1:9/v1/");
    let client = ChatApiClient::new(config).expect("client");
    let request = ChatRequest::new("m", vec![ChatMessage::new("user", Some("hi".to_string()))]);

    let http_request = client
        .build_request(&request)
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(
        http_request.url().as_str(),
        normalize_chat_completions_url("http://127.0.0.1:9/v1")
    );
    assert_eq!(http_request.method(), "POST");
    assert_eq!(
        http_request
            .headers()
            .get("authorization")
            .expect("authorization"),
        "Bearer sk-test"
    );

    let body = http_request
        .body()
        .and_then(|body| body.as_bytes())
        .expect("buffered body");
    let json: Value = serde_json::from_slice(body).expect("json body");
    assert_eq!(json["messages"][0]["content"], "hi");
}

#[test]
fn http_request_fails_without_api_key() {
    let client = ChatApiClient::new(ChatApiConfig::default()).expect("client");
    let request = ChatRequest::new("m", Vec::new());

    assert!(client.build_request(&request).is_err());
}
