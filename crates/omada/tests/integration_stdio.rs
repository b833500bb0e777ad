use homelab_test_support::{MockUpstream, StdioSession, tool_is_error, tool_text};
use serde_json::json;

const BIN: &str = env!("CARGO_BIN_EXE_omada-mcp-server");

#[tokio::test]
async fn stdio_session_logs_in_at_startup() -> anyhow::Result<()> {
    let upstream = MockUpstream::start().await?;
    upstream.on(
        "POST",
        "/api/v2/login",
        200,
        json!({"errorCode": 0, "result": {"token": "boot-tok"}}),
    );
    upstream.on(
        "GET",
        "/api/v2/info",
        200,
        json!({"errorCode": 0, "result": {"omadacId": "ctl"}}),
    );
    upstream.on(
        "GET",
        "/ctl/api/v2/sites/Home/devices/AA-BB-CC",
        200,
        json!({"errorCode": 0, "result": {"mac": "AA-BB-CC", "name": "attic-ap"}}),
    );

    let session = StdioSession::spawn(
        BIN,
        &[
            ("OMADA_URL", upstream.base_url()),
            ("OMADA_USERNAME", "admin"),
            ("OMADA_PASSWORD", "pw"),
            ("OMADA_SITE_ID", "Home"),
        ],
    )
    .await?;

    let init = session.server_info().cloned().expect("initialize result");
    assert_eq!(init.server_info.name, "omada-mcp-server");

    let called = session
        .call_tool("get_device_info", json!({"mac": "AA-BB-CC"}))
        .await?;
    assert!(!tool_is_error(&called));
    assert_eq!(
        tool_text(&called),
        Some("{\n  \"mac\": \"AA-BB-CC\",\n  \"name\": \"attic-ap\"\n}")
    );

    let methods: Vec<String> = upstream
        .requests()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(
        methods,
        vec![
            "POST /api/v2/login",
            "GET /api/v2/info",
            "GET /ctl/api/v2/sites/Home/devices/AA-BB-CC",
        ]
    );

    session.shutdown().await
}
