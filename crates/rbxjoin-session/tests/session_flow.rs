//! Integration tests for the session layer against a scripted transport.

use std::sync::atomic::{AtomicU32, Ordering};

use rbxjoin_protocol::{Endpoints, UserId};
use rbxjoin_session::{
    SessionConfig, SessionContext, SessionCredential, SessionError, ValidationMethod,
    acquire_token, get_identity, get_user_id, get_username, validate,
};
use rbxjoin_transport::{HttpRequest, HttpResponse, Method, MockTransport, TransportError};
use serde_json::json;

// =========================================================================
// Helpers
// =========================================================================

const COOKIE: &str = "_|WARNING:-DO-NOT-SHARE-THIS.--test-cookie";

fn session(mock: &MockTransport) -> SessionContext<MockTransport> {
    let config = SessionConfig::default().with_endpoints(Endpoints::uniform("https://api.test"));
    SessionContext::new(SessionCredential::new(COOKIE), config, mock.clone())
}

/// A logout route that hands out `token-1`, `token-2`, ... on each call.
fn counting_csrf(mock: MockTransport) -> MockTransport {
    let counter = AtomicU32::new(0);
    mock.on(Method::Post, "/v2/logout", move |_| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        HttpResponse::new(403).with_header("x-csrf-token", format!("token-{n}"))
    })
}

fn authenticated(mock: MockTransport) -> MockTransport {
    mock.on(Method::Get, "/v1/users/authenticated", |_| {
        HttpResponse::new(200).with_json(&json!({"id": 42, "name": "builder", "displayName": "B"}))
    })
}

fn unauthorized(mock: MockTransport, path: &str) -> MockTransport {
    mock.on(Method::Get, path, |_| {
        HttpResponse::new(401).with_json(&json!({
            "errors": [{"code": 0, "message": "Authorization has been denied for this request."}]
        }))
    })
}

// =========================================================================
// Context
// =========================================================================

#[tokio::test]
async fn test_requests_carry_base_headers_and_credential_cookie() {
    let mock = MockTransport::new().on(Method::Get, "/ping", |_| HttpResponse::new(200));
    let mut s = session(&mock);

    s.get("https://api.test/ping".into(), &[]).await.unwrap();

    let sent = &mock.requests()[0];
    assert_eq!(sent.header_value("User-Agent"), Some("Roblox/WinInet"));
    assert_eq!(sent.header_value("Referer"), Some("https://www.roblox.com/"));
    assert_eq!(sent.header_value("Origin"), Some("https://www.roblox.com"));
    assert_eq!(
        sent.header_value("Cookie"),
        Some(format!(".ROBLOSECURITY={COOKIE}").as_str())
    );
}

#[tokio::test]
async fn test_request_headers_override_base_headers() {
    let mock = MockTransport::new().on(Method::Get, "/ping", |_| HttpResponse::new(200));
    let mut s = session(&mock);

    let request = HttpRequest::get("https://api.test/ping").header("Referer", "https://x.test/");
    s.send(request).await.unwrap();

    assert_eq!(mock.requests()[0].header_value("Referer"), Some("https://x.test/"));
}

#[tokio::test]
async fn test_set_cookie_updates_jar_for_later_requests() {
    let mock = MockTransport::new()
        .on(Method::Get, "/first", |_| {
            HttpResponse::new(200).with_header("Set-Cookie", "RBXEventTrackerV2=abc; path=/")
        })
        .on(Method::Get, "/second", |_| HttpResponse::new(200));
    let mut s = session(&mock);

    s.get("https://api.test/first".into(), &[]).await.unwrap();
    assert_eq!(s.cookies().get("RBXEventTrackerV2"), Some("abc"));

    s.get("https://api.test/second".into(), &[]).await.unwrap();
    let cookie = mock.requests_to("/second")[0]
        .header_value("Cookie")
        .unwrap()
        .to_string();
    assert!(cookie.contains("RBXEventTrackerV2=abc"));
    assert!(cookie.contains(".ROBLOSECURITY="));
}

#[tokio::test]
async fn test_expired_cookie_is_not_sent_again() {
    let mock = MockTransport::new()
        .on(Method::Get, "/first", |_| {
            HttpResponse::new(200).with_header("Set-Cookie", "RBXSessionTracker=old; path=/")
        })
        .on(Method::Get, "/second", |_| {
            HttpResponse::new(200).with_header(
                "Set-Cookie",
                "RBXSessionTracker=stale; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/",
            )
        })
        .on(Method::Get, "/third", |_| HttpResponse::new(200));
    let mut s = session(&mock);

    s.get("https://api.test/first".into(), &[]).await.unwrap();
    s.get("https://api.test/second".into(), &[]).await.unwrap();
    assert_eq!(s.cookies().get("RBXSessionTracker"), None);

    s.get("https://api.test/third".into(), &[]).await.unwrap();
    let cookie = mock.requests_to("/third")[0]
        .header_value("Cookie")
        .unwrap()
        .to_string();
    assert!(!cookie.contains("RBXSessionTracker"));
}

#[tokio::test]
async fn test_debug_never_prints_credential() {
    let mock = MockTransport::new();
    let s = session(&mock);
    assert!(!format!("{s:?}").contains("test-cookie"));
}

// =========================================================================
// CSRF handshake
// =========================================================================

#[tokio::test]
async fn test_token_read_from_rejected_logout() {
    let mock = counting_csrf(MockTransport::new());
    let mut s = session(&mock);

    let token = acquire_token(&mut s).await.unwrap();
    assert_eq!(token.as_str(), "token-1");

    let sent = mock.requests_to("/v2/logout");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::Post);
}

#[tokio::test]
async fn test_each_acquire_makes_a_fresh_request() {
    let mock = counting_csrf(MockTransport::new());
    let mut s = session(&mock);

    let first = acquire_token(&mut s).await.unwrap();
    let second = acquire_token(&mut s).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(mock.requests_to("/v2/logout").len(), 2);
}

#[tokio::test]
async fn test_missing_token_header_is_csrf_unavailable() {
    let mock = MockTransport::new().on(Method::Post, "/v2/logout", |_| HttpResponse::new(200));
    let mut s = session(&mock);

    let err = acquire_token(&mut s).await.unwrap_err();
    assert!(matches!(err, SessionError::CsrfUnavailable { status: Some(200), source: None }));
}

#[tokio::test]
async fn test_empty_token_header_is_csrf_unavailable() {
    let mock = MockTransport::new().on(Method::Post, "/v2/logout", |_| {
        HttpResponse::new(403).with_header("x-csrf-token", "")
    });
    let mut s = session(&mock);

    let err = acquire_token(&mut s).await.unwrap_err();
    assert!(matches!(err, SessionError::CsrfUnavailable { status: Some(403), source: None }));
}

#[tokio::test]
async fn test_handshake_transport_failure_is_csrf_unavailable() {
    let mock = MockTransport::new().fail(
        Method::Post,
        "/v2/logout",
        TransportError::RequestFailed("dns".into()),
    );
    let mut s = session(&mock);

    let err = acquire_token(&mut s).await.unwrap_err();
    match &err {
        SessionError::CsrfUnavailable { status, source } => {
            assert_eq!(*status, None);
            assert_eq!(*source, Some(TransportError::RequestFailed("dns".into())));
        }
        other => panic!("expected CsrfUnavailable, got {other:?}"),
    }
    // The transport failure stays visible through the error chain.
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("dns"));
    assert!(err.to_string().contains("dns"));
}

// =========================================================================
// Identity
// =========================================================================

#[tokio::test]
async fn test_get_user_id() {
    let mock = authenticated(MockTransport::new());
    let mut s = session(&mock);

    assert_eq!(get_user_id(&mut s).await.unwrap(), UserId(42));
    assert_eq!(
        mock.requests()[0].header_value("Accept"),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_get_user_id_rejected_is_not_authenticated() {
    let mock = unauthorized(MockTransport::new(), "/v1/users/authenticated");
    let mut s = session(&mock);

    match get_user_id(&mut s).await.unwrap_err() {
        SessionError::NotAuthenticated { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Authorization has been denied"));
        }
        other => panic!("expected NotAuthenticated, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_username() {
    let mock = MockTransport::new().on(Method::Get, "/v1/users/42", |_| {
        HttpResponse::new(200).with_json(&json!({"id": 42, "name": "builder"}))
    });
    let mut s = session(&mock);

    assert_eq!(get_username(&mut s, UserId(42)).await.unwrap(), "builder");
}

#[tokio::test]
async fn test_get_username_missing_is_not_found() {
    let mock = MockTransport::new();
    let mut s = session(&mock);

    let err = get_username(&mut s, UserId(7)).await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound(UserId(7))));
}

#[tokio::test]
async fn test_get_identity_tolerates_name_failure() {
    let mock = authenticated(MockTransport::new())
        .on(Method::Get, "/v1/users/42", |_| HttpResponse::new(500));
    let mut s = session(&mock);

    let identity = get_identity(&mut s).await.unwrap();
    assert_eq!(identity.id, UserId(42));
    assert_eq!(identity.name, None);
}

// =========================================================================
// Validation
// =========================================================================

#[tokio::test]
async fn test_validate_primary() {
    let mock = authenticated(MockTransport::new()).on(Method::Get, "/v1/users/42", |_| {
        HttpResponse::new(200).with_json(&json!({"name": "builder"}))
    });
    let mut s = session(&mock);

    let result = validate(&mut s).await.unwrap();
    assert!(result.ok);
    assert_eq!(result.method, Some(ValidationMethod::Primary));
    let identity = result.identity.unwrap();
    assert_eq!(identity.id, UserId(42));
    assert_eq!(identity.name.as_deref(), Some("builder"));
    assert!(mock.requests_to("/v1/user/currency").is_empty());
}

#[tokio::test]
async fn test_validate_primary_with_failed_name_lookup() {
    let mock = authenticated(MockTransport::new());
    let mut s = session(&mock);

    let result = validate(&mut s).await.unwrap();
    assert!(result.ok);
    assert_eq!(result.identity.unwrap().name, None);
}

#[tokio::test]
async fn test_validate_backup_only() {
    let mock = unauthorized(MockTransport::new(), "/v1/users/authenticated")
        .on(Method::Get, "/v1/user/currency", |_| {
            HttpResponse::new(200).with_json(&json!({"robux": 0}))
        });
    let mut s = session(&mock);

    let result = validate(&mut s).await.unwrap();
    assert!(result.ok);
    assert_eq!(result.method, Some(ValidationMethod::Backup));
    assert!(result.identity.is_none());
    assert_eq!(mock.requests_to("/v1/user/currency").len(), 1);
}

#[tokio::test]
async fn test_validate_both_rejected() {
    let mock = unauthorized(MockTransport::new(), "/v1/users/authenticated");
    let mock = unauthorized(mock, "/v1/user/currency");
    let mut s = session(&mock);

    let result = validate(&mut s).await.unwrap();
    assert!(!result.ok);
    assert!(result.identity.is_none());
    let failure = result.failure.unwrap();
    assert_eq!(failure.status, 401);
    assert_eq!(failure.backup_status, 401);
    let remote = failure.remote_error.unwrap();
    assert_eq!(
        remote.errors[0].message,
        "Authorization has been denied for this request."
    );
    // One backup attempt, no retries.
    assert_eq!(mock.requests().len(), 2);
}

#[tokio::test]
async fn test_validate_transport_failure_is_an_error() {
    let mock = MockTransport::new().fail(
        Method::Get,
        "/v1/users/authenticated",
        TransportError::RequestFailed("connection reset".into()),
    );
    let mut s = session(&mock);

    let err = validate(&mut s).await.unwrap_err();
    assert!(matches!(err, SessionError::Transport(_)));
}
