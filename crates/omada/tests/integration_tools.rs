use homelab_mcp_omada::{Credentials, OmadaAdapter, OmadaSession, build_adapter};
use homelab_rest_tools::{CallToolResult, ClientOptions, RestClient, ToolHandler};
use homelab_test_support::MockUpstream;
use serde_json::{Map, Value, json};

fn args(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap_or_default()
}

fn credentials() -> Credentials {
    Credentials {
        username: "admin".to_string(),
        password: "pw".to_string(),
    }
}

fn text_and_error(result: &CallToolResult) -> (String, bool) {
    let v = serde_json::to_value(result).expect("CallToolResult serializes");
    let text = v["content"][0]["text"].as_str().unwrap_or_default().to_string();
    (text, v["isError"].as_bool().unwrap_or(false))
}

fn script_login(upstream: &MockUpstream) {
    upstream.on(
        "POST",
        "/api/v2/login",
        200,
        json!({"errorCode": 0, "result": {"token": "tok-1"}}),
    );
    upstream.on(
        "GET",
        "/api/v2/info",
        200,
        json!({"errorCode": 0, "result": {"omadacId": "cid1"}}),
    );
}

fn fresh_adapter(upstream: &MockUpstream) -> OmadaAdapter {
    build_adapter(ClientOptions::new(upstream.base_url()), credentials(), "Default")
        .expect("adapter")
}

fn paths(upstream: &MockUpstream) -> Vec<String> {
    upstream
        .requests()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect()
}

#[tokio::test]
async fn logs_in_once_before_the_first_request() {
    let upstream = MockUpstream::start().await.expect("mock upstream");
    script_login(&upstream);
    upstream.on(
        "GET",
        "/cid1/api/v2/sites",
        200,
        json!({"errorCode": 0, "result": {"data": [{"name": "Default"}]}}),
    );
    let adapter = fresh_adapter(&upstream);

    for _ in 0..2 {
        let result = adapter.call_tool("list_sites", Map::new()).await;
        let (text, is_error) = text_and_error(&result);
        assert!(!is_error, "unexpected error: {text}");
        assert_eq!(
            text,
            "{\n  \"data\": [\n    {\n      \"name\": \"Default\"\n    }\n  ]\n}"
        );
    }

    assert_eq!(
        paths(&upstream),
        vec![
            "POST /api/v2/login",
            "GET /api/v2/info",
            "GET /cid1/api/v2/sites",
            "GET /cid1/api/v2/sites",
        ]
    );
    let sites = upstream.requests_to("/cid1/api/v2/sites");
    assert!(sites.iter().all(|r| r.header("csrf-token") == Some("tok-1")));
    assert_eq!(
        adapter.session().await,
        OmadaSession::authenticated("tok-1", "cid1")
    );
}

#[tokio::test]
async fn injected_session_skips_login() {
    let upstream = MockUpstream::start().await.expect("mock upstream");
    upstream.on(
        "POST",
        "/c9/api/v2/sites/Lab/cmd/clients/AA-BB/block",
        200,
        json!({"errorCode": 0}),
    );
    let client = RestClient::new(ClientOptions::new(upstream.base_url())).expect("client");
    let adapter = OmadaAdapter::new(
        client,
        credentials(),
        "Lab",
        OmadaSession::authenticated("tok-9", "c9"),
    );

    let result = adapter
        .call_tool("block_client", args(json!({"mac": "AA-BB"})))
        .await;
    let (text, is_error) = text_and_error(&result);
    assert!(!is_error, "unexpected error: {text}");
    assert_eq!(text, "Client AA-BB blocked successfully");
    assert_eq!(
        paths(&upstream),
        vec!["POST /c9/api/v2/sites/Lab/cmd/clients/AA-BB/block"]
    );
}

#[tokio::test]
async fn expired_session_is_renewed_and_retried_once() {
    let upstream = MockUpstream::start().await.expect("mock upstream");
    script_login(&upstream);
    let devices = "/cid1/api/v2/sites/Default/devices";
    upstream.on_once("GET", devices, 401, json!({"errorCode": -1200}));
    upstream.on(
        "GET",
        devices,
        200,
        json!({"errorCode": 0, "result": [{"mac": "AA", "type": "ap"}]}),
    );
    let adapter = OmadaAdapter::new(
        RestClient::new(ClientOptions::new(upstream.base_url())).expect("client"),
        credentials(),
        "Default",
        OmadaSession::authenticated("stale", "cid1"),
    );

    let result = adapter
        .call_tool("list_devices", args(json!({"type": "ap"})))
        .await;
    let (text, is_error) = text_and_error(&result);
    assert!(!is_error, "unexpected error: {text}");
    assert!(text.contains("\"mac\": \"AA\""));

    assert_eq!(
        paths(&upstream),
        vec![
            format!("GET {devices}"),
            "POST /api/v2/login".to_string(),
            "GET /api/v2/info".to_string(),
            format!("GET {devices}"),
        ]
    );
    let retried = upstream.requests_to(devices);
    assert_eq!(retried[0].header("csrf-token"), Some("stale"));
    assert_eq!(retried[1].header("csrf-token"), Some("tok-1"));
    assert_eq!(retried[1].target(), format!("{devices}?type=ap"));
}

#[tokio::test]
async fn failed_login_still_attempts_the_call() {
    let upstream = MockUpstream::start().await.expect("mock upstream");
    upstream.on("POST", "/api/v2/login", 500, json!({"msg": "down"}));
    upstream.respond_json(401, json!({"errorCode": -1200}));
    let adapter = fresh_adapter(&upstream);

    let result = adapter.call_tool("list_ssids", Map::new()).await;
    let (text, is_error) = text_and_error(&result);
    assert!(is_error);
    assert!(text.starts_with("Error: API returned 401 Unauthorized"), "{text}");

    assert_eq!(
        paths(&upstream),
        vec![
            "POST /api/v2/login",
            "GET /api/v2/sites/Default/setting/wlans",
            "POST /api/v2/login",
        ]
    );
    assert!(!adapter.session().await.is_authenticated());
}

#[tokio::test]
async fn invalid_arguments_skip_login_and_request() {
    let upstream = MockUpstream::start().await.expect("mock upstream");
    let adapter = fresh_adapter(&upstream);

    let result = adapter.call_tool("reboot_device", Map::new()).await;
    let (text, is_error) = text_and_error(&result);
    assert!(is_error);
    assert!(text.starts_with("Error: Invalid arguments:"), "{text}");

    let result = adapter.call_tool("factory_reset", Map::new()).await;
    assert_eq!(text_and_error(&result).0, "Error: Unknown tool: factory_reset");
    assert!(upstream.requests().is_empty());
}

#[test]
fn catalog_lists_nine_tools() {
    let adapter =
        build_adapter(ClientOptions::new("https://127.0.0.1:1"), credentials(), "Default")
            .expect("adapter");
    let tools = adapter.list_tools();
    assert_eq!(tools.len(), 9);
    assert_eq!(tools[0].name, "list_sites");
    assert_eq!(tools[8].name, "unblock_client");
}

#[tokio::test]
async fn controller_error_codes_become_error_results() {
    let upstream = MockUpstream::start().await.expect("mock upstream");
    upstream.on(
        "GET",
        "/c1/api/v2/sites/Default/devices/AA-BB",
        200,
        json!({"errorCode": -39002, "msg": "Device not found"}),
    );
    upstream.on(
        "POST",
        "/c1/api/v2/sites/Default/cmd/devices/AA-BB/reboot",
        200,
        json!({"errorCode": -1, "msg": ""}),
    );
    let adapter = OmadaAdapter::new(
        RestClient::new(ClientOptions::new(upstream.base_url())).expect("client"),
        credentials(),
        "Default",
        OmadaSession::authenticated("tok", "c1"),
    );

    let result = adapter
        .call_tool("get_device_info", args(json!({"mac": "AA-BB"})))
        .await;
    let (text, is_error) = text_and_error(&result);
    assert!(is_error);
    assert_eq!(text, "Error: API error -39002: Device not found");

    let result = adapter
        .call_tool("reboot_device", args(json!({"mac": "AA-BB"})))
        .await;
    let (text, is_error) = text_and_error(&result);
    assert!(is_error);
    assert_eq!(text, "Error: API error -1: request failed");

    assert_eq!(upstream.requests().len(), 2);
}

#[tokio::test]
async fn blank_mac_is_rejected_before_login() {
    let upstream = MockUpstream::start().await.expect("mock upstream");
    let adapter = fresh_adapter(&upstream);

    let result = adapter
        .call_tool("reboot_device", args(json!({"mac": ""})))
        .await;
    let (text, is_error) = text_and_error(&result);
    assert!(is_error);
    assert_eq!(
        text,
        "Error: Invalid arguments: parameter 'mac' must not be empty"
    );
    assert!(upstream.requests().is_empty());
}
