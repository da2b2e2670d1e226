//! Integration tests for carrier, transport and shape errors

use crate::mock_server::{messages_body, MockServerFixture, CUSTOMER};
use canadapost_client::{Error, TransportError};
use mockito::Matcher;

#[tokio::test]
async fn test_carrier_error_on_bad_request() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_xml(
            "GET",
            "/rs/ship/service",
            Matcher::Any,
            400,
            &messages_body(&[("E002", "Invalid origin postal code")]),
        )
        .await;

    let client = fixture.create_test_client(Some(CUSTOMER)).unwrap();
    let err = client.discover_services("XXX", "CA", None).await.unwrap_err();

    let carrier = err.carrier().expect("carrier error");
    assert_eq!(carrier.code, "E002");
    assert_eq!(carrier.message, "Invalid origin postal code");
    assert_eq!(carrier.messages.len(), 1);
}

#[tokio::test]
async fn test_multiple_carrier_messages_in_success_body() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_xml(
            "GET",
            "/rs/ship/service",
            Matcher::Any,
            200,
            &messages_body(&[("1", "bad origin"), ("2", "bad country")]),
        )
        .await;

    let client = fixture.create_test_client(None).unwrap();
    let err = client.discover_services("K2B8J6", "ZZ", None).await.unwrap_err();

    let carrier = err.carrier().expect("carrier error");
    assert_eq!(carrier.code, "1,2");
    assert_eq!(carrier.message, "bad origin - (code 1)\nbad country - (code 2)");
}

#[tokio::test]
async fn test_plain_error_body_stays_transport_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response("/vis/track/pin/1/summary", 503, "Service Unavailable")
        .await;

    let client = fixture.create_test_client(None).unwrap();
    let err = client
        .get_tracking_summary(&canadapost_client::TrackingId::Pin("1".into()))
        .await
        .unwrap_err();

    match err {
        Error::Transport(transport) => {
            assert_eq!(transport.status(), Some(503));
            assert_eq!(transport.response_body(), Some("Service Unavailable"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_success_shape() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_xml(
            "GET",
            "/vis/track/pin/1/summary",
            Matcher::Missing,
            200,
            "<tracking-detail><pin>1</pin></tracking-detail>",
        )
        .await;

    let client = fixture.create_test_client(None).unwrap();
    let err = client
        .get_tracking_summary(&canadapost_client::TrackingId::Pin("1".into()))
        .await
        .unwrap_err();

    match err {
        Error::Shape {
            expected_path,
            actual,
        } => {
            assert_eq!(expected_path, "trackingSummary.pinSummary");
            assert!(actual.contains("trackingDetail"));
        }
        other => panic!("expected shape error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = canadapost_client::CanadaPostClient::builder()
        .credentials("user", "secret")
        .base_url("http://127.0.0.1:9")
        .build()
        .unwrap();
    let err = client
        .get_tracking_summary(&canadapost_client::TrackingId::Pin("1".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Http(_))));
}
