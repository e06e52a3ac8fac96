use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::{error::PushError, models::*};

pub const DEFAULT_ENDPOINT: &str = "https://fcm.googleapis.com/v1";

pub fn send_url(endpoint: &str, project_id: &str) -> String {
    format!("{}/projects/{}/messages:send", endpoint.trim_end_matches('/'), project_id)
}

pub async fn send_message(
    http: &reqwest::Client,
    url: &str,
    access_token: &str,
    message: &Message,
    validate_only: bool,
) -> Result<String, PushError> {
    let res = http
        .post(url)
        .header(AUTHORIZATION, format!("Bearer {}", access_token))
        .json(&SendRequest { validate_only, message })
        .send()
        .await?;
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(classify_error(status.as_u16(), &body));
    }
    delivery_id(&body)
}

/// Extract the message name (`projects/<id>/messages/<n>`) from a success body.
pub fn delivery_id(body: &str) -> Result<String, PushError> {
    let v: Value = serde_json::from_str(body).map_err(|e| PushError::Api {
        status: 200,
        message: format!("unreadable response: {}", e),
    })?;
    v.get("name")
        .and_then(|n| n.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| PushError::Api { status: 200, message: "response has no message name".into() })
}

/// Map an FCM error response to a [`PushError`].
pub fn classify_error(status: u16, body: &str) -> PushError {
    let v: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let err = v.get("error");
    let message = err
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| body.trim().to_string());
    let fcm_code = err
        .and_then(|e| e.get("details"))
        .and_then(|d| d.as_array())
        .and_then(|details| {
            details.iter().find_map(|d| d.get("errorCode").and_then(|c| c.as_str()))
        });

    match (status, fcm_code) {
        (_, Some("UNREGISTERED")) | (404, _) => PushError::Unregistered,
        (_, Some("INVALID_ARGUMENT")) | (400, _) => PushError::InvalidArgument(message),
        (401 | 403, _) => PushError::Auth(message),
        _ => PushError::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_send_url() {
        assert_eq!(
            send_url("https://fcm.googleapis.com/v1/", "my-app"),
            "https://fcm.googleapis.com/v1/projects/my-app/messages:send"
        );
    }

    #[test]
    fn reads_delivery_id() {
        let id = delivery_id(r#"{"name":"projects/my-app/messages/0:123"}"#).unwrap();
        assert_eq!(id, "projects/my-app/messages/0:123");
        assert!(matches!(delivery_id("{}"), Err(PushError::Api { .. })));
    }

    #[test]
    fn classifies_unregistered_from_details() {
        let body = r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND",
            "details":[{"@type":"type.googleapis.com/google.firebase.fcm.v1.FcmError","errorCode":"UNREGISTERED"}]}}"#;
        assert!(matches!(classify_error(404, body), PushError::Unregistered));
    }

    #[test]
    fn classifies_auth_and_invalid_argument() {
        let body = r#"{"error":{"code":401,"message":"Request had invalid authentication credentials."}}"#;
        match classify_error(401, body) {
            PushError::Auth(m) => assert!(m.contains("invalid authentication")),
            other => panic!("unexpected {:?}", other),
        }
        let body = r#"{"error":{"code":400,"message":"bad token","details":[{"errorCode":"INVALID_ARGUMENT"}]}}"#;
        assert!(matches!(classify_error(400, body), PushError::InvalidArgument(m) if m == "bad token"));
    }

    #[test]
    fn falls_back_to_raw_body() {
        match classify_error(503, "upstream unavailable\n") {
            PushError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
