use crate::mock_server::{MockServerFixture, CUSTOMER};
use canadapost_client::{Error, LinkTarget};
use chrono::{TimeZone, Utc};
use mockito::Matcher;
use serde_json::json;

fn shipment_info(base_url: &str, labels: &[(&str, &str)]) -> String {
    let labels: String = labels
        .iter()
        .map(|(index, artifact)| {
            format!(
                "<link rel=\"label\" href=\"{base_url}/ers/artifact/{artifact}\" media-type=\"application/pdf\" index=\"{index}\"/>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<non-contract-shipment-info xmlns="http://www.canadapost.ca/ws/ncshipment-v4">
  <shipment-id>406951321983787352</shipment-id>
  <tracking-pin>123456789012</tracking-pin>
  <links>
    <link rel="self" href="{base_url}/rs/{CUSTOMER}/ncshipment/406951321983787352" media-type="application/vnd.cpc.ncshipment-v4+xml"/>
    <link rel="refund" href="{base_url}/rs/{CUSTOMER}/ncshipment/406951321983787352/refund" media-type="application/vnd.cpc.ncshipment-v4+xml"/>
    {labels}
  </links>
</non-contract-shipment-info>"#
    )
}

#[tokio::test]
async fn test_create_shipment_with_two_labels() {
    let fixture = MockServerFixture::new().await;
    let body = shipment_info(&fixture.base_url, &[("1", "b/1"), ("0", "a/0")]);
    let mock = fixture
        .mock_xml_with_body(
            "POST",
            "/rs/0001234567/ncshipment",
            r#"<non-contract-shipment xmlns="http://www.canadapost.ca/ws/ncshipment-v4"><requested-shipping-point>K2B8J6</requested-shipping-point>"#,
            200,
            &body,
        )
        .await;

    let client = fixture.create_test_client(Some(CUSTOMER)).unwrap();
    let info = client
        .create_non_contract_shipment(json!({
            "requestedShippingPoint": "K2B8J6",
            "deliverySpec": {
                "serviceCode": "DOM.EP",
                "parcelCharacteristics": { "weight": 15 }
            }
        }))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(info.shipment_id, "406951321983787352");
    assert_eq!(info.tracking_pin.as_deref(), Some("123456789012"));
    assert_eq!(
        info.links["label"],
        LinkTarget::Many(vec![
            Some(format!("{}/ers/artifact/a/0", fixture.base_url)),
            Some(format!("{}/ers/artifact/b/1", fixture.base_url)),
        ])
    );
}

#[tokio::test]
async fn test_refund_is_two_sequential_requests() {
    let fixture = MockServerFixture::new().await;
    let body = shipment_info(&fixture.base_url, &[("0", "a/0")]);
    let get = fixture
        .mock_xml(
            "GET",
            "/rs/0001234567/ncshipment/406951321983787352",
            Matcher::Missing,
            200,
            &body,
        )
        .await;
    let refund = fixture
        .mock_xml_with_body(
            "POST",
            "/rs/0001234567/ncshipment/406951321983787352/refund",
            "<email>user@example.com</email>",
            200,
            r#"<non-contract-shipment-refund-request-info xmlns="http://www.canadapost.ca/ws/ncshipment-v4">
  <service-ticket-date>2024-03-06</service-ticket-date>
  <service-ticket-id>GT12345678RT</service-ticket-id>
</non-contract-shipment-refund-request-info>"#,
        )
        .await;

    let client = fixture.create_test_client(Some(CUSTOMER)).unwrap();
    let ticket = client
        .refund_non_contract_shipment("406951321983787352", "user@example.com")
        .await
        .unwrap();

    get.assert_async().await;
    refund.assert_async().await;
    assert_eq!(ticket.service_ticket_id, "GT12345678RT");
    assert_eq!(ticket.service_ticket_date, "2024-03-06");
}

#[tokio::test]
async fn test_list_shipments_in_range() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_xml(
            "GET",
            "/rs/0001234567/ncshipment",
            Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), "202401010000".into()),
                Matcher::UrlEncoded("to".into(), "202401312359".into()),
            ]),
            200,
            r#"<non-contract-shipments xmlns="http://www.canadapost.ca/ws/ncshipment-v4">
  <link rel="shipment" href="https://ct.soa-gw.canadapost.ca/rs/0001234567/ncshipment/340531309186521749" media-type="application/vnd.cpc.ncshipment-v4+xml"/>
</non-contract-shipments>"#,
        )
        .await;

    let client = fixture.create_test_client(Some(CUSTOMER)).unwrap();
    let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 0).unwrap();
    let shipments = client.get_shipments(&from, Some(&to)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(shipments.len(), 1);
    assert_eq!(shipments[0].shipment_id, "340531309186521749");
}

#[tokio::test]
async fn test_shipment_details() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_xml(
            "GET",
            "/rs/0001234567/ncshipment/9/details",
            Matcher::Missing,
            200,
            r#"<non-contract-shipment-details xmlns="http://www.canadapost.ca/ws/ncshipment-v4">
  <tracking-pin>123456789012</tracking-pin>
  <delivery-spec><service-code>DOM.EP</service-code></delivery-spec>
</non-contract-shipment-details>"#,
        )
        .await;

    let client = fixture.create_test_client(Some(CUSTOMER)).unwrap();
    let details = client.get_shipment_details("9").await.unwrap();
    assert_eq!(
        details["nonContractShipmentDetails"]["deliverySpec"]["serviceCode"],
        "DOM.EP"
    );
}

#[tokio::test]
async fn test_refund_without_refund_link() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_xml(
            "GET",
            "/rs/0001234567/ncshipment/9",
            Matcher::Missing,
            200,
            "<non-contract-shipment-info><shipment-id>9</shipment-id></non-contract-shipment-info>",
        )
        .await;

    let client = fixture.create_test_client(Some(CUSTOMER)).unwrap();
    let err = client
        .refund_non_contract_shipment("9", "user@example.com")
        .await
        .unwrap_err();
    match err {
        Error::Shape { expected_path, .. } => {
            assert_eq!(expected_path, "nonContractShipmentInfo.links.refund")
        }
        other => panic!("expected shape error, got {other:?}"),
    }
}
