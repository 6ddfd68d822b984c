//! Integration tests for the request pipeline against a local HTTP server

mod common;

use common::{sandbox_config, PUBLISHABLE_KEY, TOKEN};
use intasend::http::RequestOptions;
use intasend::{
    CheckoutResponse, ClientConfig, IntaSendClient, IntaSendError, Paginated, PaymentStatus,
    RequestBody, Wallet,
};
use mockito::{Matcher, Server};
use serde_json::{json, Value};

fn client() -> IntaSendClient {
    IntaSendClient::new(sandbox_config()).unwrap()
}

#[tokio::test]
async fn test_api_error_uses_envelope_message() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/invoices/NOPE/")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(json!({"message": "not found", "errors": {}}).to_string())
        .create_async()
        .await;

    let err = client()
        .get_json::<Value>(&format!("{}/api/v1/invoices/NOPE/", server.url()), true, false)
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err {
        IntaSendError::Api { status, message, errors } => {
            assert_eq!(status, 404);
            assert_eq!(message, "not found");
            assert_eq!(errors, Some(serde_json::Map::new()));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_error_falls_back_to_raw_body() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/gone")
        .with_status(404)
        .with_header("content-type", "text/html")
        .with_body("<h1>Not Found</h1>")
        .create_async()
        .await;

    let err = client()
        .get_json::<Value>(&format!("{}/gone", server.url()), false, false)
        .await
        .unwrap_err();

    assert!(
        matches!(err, IntaSendError::Api { status: 404, ref message, .. } if message == "<h1>Not Found</h1>"),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_field_errors_are_kept() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/v1/checkout/")
        .with_status(400)
        .with_body(
            json!({
                "message": "Invalid request",
                "errors": {"amount": ["Ensure this value is greater than or equal to 1."]}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = client()
        .post_json::<_, CheckoutResponse>(
            &format!("{}/api/v1/checkout/", server.url()),
            &json!({"amount": 0}),
            false,
            true,
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    if let IntaSendError::Api { errors: Some(errors), .. } = err {
        assert!(errors.contains_key("amount"));
    } else {
        panic!("expected field errors");
    }
}

#[tokio::test]
async fn test_credentials_and_body_reach_the_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/payment/status/")
        .match_header("accept", "application/json")
        .match_header("content-type", "application/json")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .match_header("x-intasend-public-api-key", PUBLISHABLE_KEY)
        .match_header("x-intasend-public-key-id", PUBLISHABLE_KEY)
        .match_body(Matcher::Json(json!({"invoice_id": "XMSLWOS"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "invoice": {
                    "id": "XMSLWOS",
                    "invoice_id": "XMSLWOS",
                    "state": "PENDING",
                    "provider": "M-PESA",
                    "charges": "0.00",
                    "net_amount": 10.36,
                    "currency": "KES",
                    "value": "10.36"
                },
                "meta": {"id": "5aec8e0b", "customer": {"first_name": "FELIX"}}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let status: PaymentStatus = client()
        .post_json(
            &format!("{}/api/v1/payment/status/", server.url()),
            &json!({"invoice_id": "XMSLWOS"}),
            true,
            true,
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(status.is_pending());
    assert_eq!(status.customer_name().as_deref(), Some("FELIX"));
}

#[tokio::test]
async fn test_api_key_only_request_has_no_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/checkout/")
        .match_header("authorization", Matcher::Missing)
        .match_header("x-intasend-public-api-key", PUBLISHABLE_KEY)
        .with_status(201)
        .with_body(json!({"id": "c1", "url": "https://sandbox.intasend.com/checkout/c1/"}).to_string())
        .create_async()
        .await;

    let response: CheckoutResponse = client()
        .post_json(
            &format!("{}/api/v1/checkout/", server.url()),
            &json!({"amount": 10}),
            false,
            true,
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.id, "c1");
}

#[tokio::test]
async fn test_query_params_override_embedded_ones() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/wallets/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("currency".into(), "KES".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "count": 1,
                "next": null,
                "previous": format!("{}/api/v1/wallets/?page=1", server.url()),
                "results": [{
                    "wallet_id": "XQ8Y2ZA",
                    "label": "default",
                    "can_disburse": true,
                    "currency": "KES",
                    "wallet_type": "SETTLEMENT",
                    "current_balance": 100,
                    "available_balance": 100,
                    "updated_at": "2024-12-24T10:05:00+03:00"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let options = RequestOptions::get(format!("{}/api/v1/wallets/?page=1&currency=KES", server.url()))
        .query("page", "2")
        .with_token();
    let page: Paginated<Wallet> = client().execute_json(options).await.unwrap();

    mock.assert_async().await;
    assert!(page.has_previous());
    assert_eq!(page.results[0].wallet_id, "XQ8Y2ZA");
}

#[tokio::test]
async fn test_custom_header_overrides_default() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/export")
        .match_header("accept", "text/csv")
        .with_status(200)
        .with_body("invoice_id,state\nY23RDWZ,COMPLETE\n")
        .create_async()
        .await;

    let options = RequestOptions::get(format!("{}/export", server.url())).header("Accept", "text/csv");
    let bytes = client().execute_bytes(options).await.unwrap();

    mock.assert_async().await;
    assert_eq!(bytes, b"invoice_id,state\nY23RDWZ,COMPLETE\n");
}

#[tokio::test]
async fn test_raw_verbs_return_response_whatever_the_status() {
    let mut server = Server::new_async().await;
    let _put = server
        .mock("PUT", "/resource/1/")
        .match_body("plain text body")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let _delete = server
        .mock("DELETE", "/resource/1/")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let _patch = server
        .mock("PATCH", "/resource/1/")
        .match_body(Matcher::Json(json!({"label": "ops"})))
        .with_status(202)
        .create_async()
        .await;

    let client = client();
    let url = format!("{}/resource/1/", server.url());

    let put = client
        .put(&url, Some(RequestBody::from("plain text body")), true, false)
        .await
        .unwrap();
    assert_eq!(put.status.as_u16(), 200);

    let delete = client.delete(&url, true, false).await.unwrap();
    assert!(delete.is_error());
    assert_eq!(delete.text(), "boom");

    let patch = client
        .patch(&url, Some(RequestBody::json(&json!({"label": "ops"})).unwrap()), true, false)
        .await
        .unwrap();
    assert_eq!(patch.status.as_u16(), 202);
}

#[tokio::test]
async fn test_malformed_success_body_is_deserialization_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/wallets/")
        .with_status(200)
        .with_body(r#"{"count": "many"}"#)
        .create_async()
        .await;

    let err = client()
        .get_json::<Paginated<Wallet>>(&format!("{}/api/v1/wallets/", server.url()), true, false)
        .await
        .unwrap_err();

    assert!(matches!(err, IntaSendError::Deserialization(_)));
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let err = client()
        .get("http://127.0.0.1:1/unreachable", false, false)
        .await
        .unwrap_err();

    assert!(matches!(err, IntaSendError::Transport { .. }));
    assert!(!err.is_api_error());
}

#[tokio::test]
async fn test_logging_does_not_change_results() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/ping")
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .expect(2)
        .create_async()
        .await;

    let url = format!("{}/ping", server.url());
    let quiet = IntaSendClient::new(sandbox_config()).unwrap();
    let verbose = IntaSendClient::new(sandbox_config().with_logs(true)).unwrap();

    let a: Value = quiet.get_json(&url, true, true).await.unwrap();
    let b: Value = verbose.get_json(&url, true, true).await.unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_config_from_env() {
    std::env::set_var("INTASEND_PUBLISHABLE_KEY", "ISPubKey_env");
    std::env::set_var("INTASEND_TOKEN", "");
    std::env::set_var("INTASEND_TEST_MODE", "true");
    std::env::remove_var("INTASEND_SHOW_LOGS");

    let config = ClientConfig::from_env();
    assert_eq!(config.publishable_key.as_deref(), Some("ISPubKey_env"));
    assert!(config.token.is_none());
    assert_eq!(config.base_url(), "https://sandbox.intasend.com");
    assert!(!config.show_logs);
}
