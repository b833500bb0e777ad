//! The controller's `{errorCode, msg, result}` response envelope.
//!
//! The controller reports most failures with HTTP 200 and a non-zero `errorCode`.

use homelab_rest_tools::{Result, ToolError};
use serde_json::Value;

/// Fail with [`ToolError::Api`] when `body` carries a non-zero `errorCode`.
///
/// Bodies without an integer `errorCode` are accepted as they are.
///
/// # Errors
///
/// Returns [`ToolError::Api`] with the code and the controller's `msg`.
pub fn check(body: &Value) -> Result<()> {
    match body.get("errorCode").and_then(Value::as_i64) {
        Some(code) if code != 0 => Err(ToolError::Api {
            code,
            message: body
                .get("msg")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("request failed")
                .to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::check;
    use homelab_rest_tools::ToolError;
    use serde_json::json;

    #[test]
    fn zero_or_missing_code_passes() {
        assert!(check(&json!({"errorCode": 0, "result": []})).is_ok());
        assert!(check(&json!({"result": []})).is_ok());
        assert!(check(&json!([1, 2])).is_ok());
    }

    #[test]
    fn non_zero_code_is_an_error() {
        let err = check(&json!({"errorCode": -39002, "msg": "Device not found"})).unwrap_err();
        assert!(matches!(err, ToolError::Api { code: -39002, .. }));
        assert_eq!(err.to_string(), "API error -39002: Device not found");

        let err = check(&json!({"errorCode": -1})).unwrap_err();
        assert_eq!(err.to_string(), "API error -1: request failed");
    }
}
