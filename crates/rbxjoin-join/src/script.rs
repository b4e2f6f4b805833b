//! Join scripts: the payload the game client connects with.

use std::fmt;

use rbxjoin_protocol::{
    AUTH_NEGOTIATION_HEADER, CSRF_HEADER, JoinGameRequest, JoinGameResponse, RemoteErrorBody,
    decode,
};
use rbxjoin_session::{SessionContext, acquire_token};
use rbxjoin_transport::{HttpRequest, HttpResponse, HttpTransport};
use serde_json::Value;

use crate::JoinError;

/// An opaque join payload, handed to the game client verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinScript(Value);

impl JoinScript {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl fmt::Display for JoinScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fetches the join script for a public place.
///
/// # Errors
/// - [`JoinError::InvalidFormat`]: `place_id` is not a number
/// - [`JoinError::JoinRejected`]: non-200, or a 200 without a script
pub async fn join_script<T: HttpTransport>(
    session: &mut SessionContext<T>,
    place_id: &str,
) -> Result<JoinScript, JoinError> {
    let body = JoinGameRequest::public(parse_place_id(place_id)?);
    let request = HttpRequest::post(session.endpoints().join_game())
        .header("Accept", "application/json")
        .json_body(&body)?;

    let response = send_join(session, request).await?;
    let script = extract_script(&response, false)?;
    tracing::info!(place_id, "join script received");
    Ok(script)
}

/// Fetches the join script for a private server.
///
/// Stricter than [`join_script`]: an empty script counts as no script.
pub async fn private_join_script<T: HttpTransport>(
    session: &mut SessionContext<T>,
    place_id: &str,
    server_code: &str,
) -> Result<JoinScript, JoinError> {
    let body = JoinGameRequest::private(parse_place_id(place_id)?, server_code);
    let request = HttpRequest::post(session.endpoints().join_game())
        .header("Accept", "application/json")
        .header("Referer", format!("https://www.roblox.com/games/{place_id}"))
        .header(AUTH_NEGOTIATION_HEADER, "1")
        .json_body(&body)?;

    let response = send_join(session, request).await?;
    let script = extract_script(&response, true)?;
    tracing::info!(place_id, "private join script received");
    Ok(script)
}

fn parse_place_id(place_id: &str) -> Result<u64, JoinError> {
    place_id
        .trim()
        .parse()
        .map_err(|_| JoinError::InvalidFormat(format!("place id is not a number: {place_id}")))
}

async fn send_join<T: HttpTransport>(
    session: &mut SessionContext<T>,
    request: HttpRequest,
) -> Result<HttpResponse, JoinError> {
    let token = acquire_token(session).await?;
    let response = session
        .send(request.header(CSRF_HEADER, token.into_inner()))
        .await?;

    if response.status != 200 {
        let reason = RemoteErrorBody::parse(&response.body)
            .map(|e| e.to_string())
            .unwrap_or_else(|| response.text());
        tracing::warn!(status = response.status, %reason, "join request rejected");
        return Err(JoinError::JoinRejected {
            status: response.status,
            reason,
        });
    }
    Ok(response)
}

fn extract_script(response: &HttpResponse, reject_empty: bool) -> Result<JoinScript, JoinError> {
    let body: JoinGameResponse = decode(&response.body)?;

    let script = match body.join_script {
        Some(Value::Null) | None => None,
        Some(script) if reject_empty && is_empty(&script) => None,
        Some(script) => Some(script),
    };

    script.map(JoinScript).ok_or_else(|| {
        let reason = match (body.status, body.message) {
            (_, Some(message)) if !message.is_empty() => message,
            (Some(status), _) => format!("no join script (join status {status})"),
            _ => "no join script in response".to_string(),
        };
        tracing::warn!(%reason, "join response had no script");
        JoinError::JoinRejected {
            status: response.status,
            reason,
        }
    })
}

fn is_empty(script: &Value) -> bool {
    match script {
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: Value) -> HttpResponse {
        HttpResponse::new(200).with_json(&body)
    }

    #[test]
    fn test_place_id_must_be_numeric() {
        assert_eq!(parse_place_id("9999").unwrap(), 9999);
        assert_eq!(parse_place_id(" 12 ").unwrap(), 12);
        assert!(matches!(
            parse_place_id("abc"),
            Err(JoinError::InvalidFormat(_))
        ));
        assert!(matches!(parse_place_id(""), Err(JoinError::InvalidFormat(_))));
    }

    #[test]
    fn test_script_present() {
        let script = extract_script(&response(json!({"joinScript": {"a": 1}})), true).unwrap();
        assert_eq!(script.as_value(), &json!({"a": 1}));
    }

    #[test]
    fn test_null_or_absent_script_rejected() {
        for body in [json!({"joinScript": null}), json!({})] {
            assert!(matches!(
                extract_script(&response(body.clone()), false),
                Err(JoinError::JoinRejected { status: 200, .. })
            ));
            assert!(extract_script(&response(body), true).is_err());
        }
    }

    #[test]
    fn test_empty_script_only_rejected_when_strict() {
        for empty in [json!(""), json!({}), json!([])] {
            let body = json!({"joinScript": empty});
            assert!(extract_script(&response(body.clone()), false).is_ok());
            assert!(extract_script(&response(body), true).is_err());
        }
    }

    #[test]
    fn test_remote_message_becomes_reason() {
        let body = json!({"joinScript": null, "status": 12, "message": "Server is full"});
        match extract_script(&response(body), true) {
            Err(JoinError::JoinRejected { reason, .. }) => assert_eq!(reason, "Server is full"),
            other => panic!("expected JoinRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_status_without_message_becomes_reason() {
        let body = json!({"status": 12});
        match extract_script(&response(body), true) {
            Err(JoinError::JoinRejected { reason, .. }) => assert!(reason.contains("12")),
            other => panic!("expected JoinRejected, got {other:?}"),
        }
    }
}
