use wavegate_license::{ActivationResult, ReflectorClient, ValidationResult};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MAC: &str = "AA:BB:CC:DD:EE:FF";

// ── activate ────────────────────────────────────────────────────

#[tokio::test]
async fn activate_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.activate("ABC-123", MAC).await;
    assert!(result.is_activated());
    assert_eq!(result.message(), "License activated successfully");
}

#[tokio::test]
async fn activate_success_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Welcome aboard"
        })))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.activate("ABC-123", MAC).await;
    assert_eq!(result, ActivationResult::Activated("Welcome aboard".to_string()));
}

#[tokio::test]
async fn activate_sends_canonicalized_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/activate"))
        .and(body_json(serde_json::json!({
            "license_key": "ABC-123",
            "mac_address": MAC
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.activate("  abc-123 ", MAC).await;
    assert!(result.is_activated());
}

#[tokio::test]
async fn activate_rejection_carries_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": "Key already bound to another device"
        })))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.activate("ABC-123", MAC).await;
    assert_eq!(
        result,
        ActivationResult::Rejected("Key already bound to another device".to_string())
    );
}

#[tokio::test]
async fn activate_rejection_without_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false
        })))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.activate("ABC-123", MAC).await;
    assert_eq!(result, ActivationResult::Rejected("Activation failed".to_string()));
}

#[tokio::test]
async fn activate_unauthorized_maps_to_mismatch_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/activate"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.activate("ABC-123", MAC).await;
    assert_eq!(
        result,
        ActivationResult::Rejected("Invalid license key or MAC address mismatch".to_string())
    );
}

#[tokio::test]
async fn activate_forbidden_maps_to_revoked_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/activate"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.activate("ABC-123", MAC).await;
    assert_eq!(
        result,
        ActivationResult::Rejected("License has been revoked".to_string())
    );
}

#[tokio::test]
async fn activate_other_status_uses_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/activate"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "reflector database unavailable"
        })))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.activate("ABC-123", MAC).await;
    assert_eq!(
        result,
        ActivationResult::Rejected("reflector database unavailable".to_string())
    );
}

#[tokio::test]
async fn activate_other_status_without_body_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/activate"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.activate("ABC-123", MAC).await;
    assert_eq!(
        result,
        ActivationResult::Rejected("Activation failed (HTTP 502)".to_string())
    );
}

#[tokio::test]
async fn activate_unreachable_is_rejected() {
    // Activation has no grace period: not reaching the authority means no
    // activation.
    let client = ReflectorClient::new("http://127.0.0.1:1");
    let result = client.activate("ABC-123", MAC).await;
    assert_eq!(
        result,
        ActivationResult::Rejected("Cannot connect to reflector server".to_string())
    );
}

// ── validate ────────────────────────────────────────────────────

#[tokio::test]
async fn validate_valid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/validate"))
        .and(body_json(serde_json::json!({
            "license_key": "ABC-123",
            "mac_address": MAC
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "valid": true
        })))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.validate("ABC-123", MAC).await;
    assert_eq!(result, ValidationResult::Valid("License is valid".to_string()));
}

#[tokio::test]
async fn validate_invalid_carries_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "valid": false,
            "error": "License expired"
        })))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.validate("ABC-123", MAC).await;
    assert_eq!(result, ValidationResult::Invalid("License expired".to_string()));
}

#[tokio::test]
async fn validate_invalid_without_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "valid": false
        })))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.validate("ABC-123", MAC).await;
    assert_eq!(result, ValidationResult::Invalid("License invalid".to_string()));
}

#[tokio::test]
async fn validate_revocation_is_structural_with_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/validate"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "revoked_reason": "payment lapsed"
        })))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.validate("ABC-123", MAC).await;
    assert_eq!(result, ValidationResult::Revoked("payment lapsed".to_string()));
}

#[tokio::test]
async fn validate_revocation_without_reason_uses_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/validate"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.validate("ABC-123", MAC).await;
    assert_eq!(
        result,
        ValidationResult::Revoked("License has been revoked".to_string())
    );
}

#[tokio::test]
async fn validate_other_status_is_ordinary_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/validate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.validate("ABC-123", MAC).await;
    assert_eq!(
        result,
        ValidationResult::Error("Validation failed (HTTP 500)".to_string())
    );
}

#[tokio::test]
async fn validate_malformed_ok_body_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/license/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ReflectorClient::new(server.uri());
    let result = client.validate("ABC-123", MAC).await;
    assert!(matches!(result, ValidationResult::Error(_)));
}

#[tokio::test]
async fn validate_unreachable_is_a_grace_condition() {
    let client = ReflectorClient::new("http://127.0.0.1:1");
    let result = client.validate("ABC-123", MAC).await;
    assert_eq!(
        result,
        ValidationResult::Unreachable("Cannot connect to reflector server".to_string())
    );
}
