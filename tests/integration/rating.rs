use crate::mock_server::{MockServerFixture, CUSTOMER};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_discover_services_with_customer() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_xml(
            "GET",
            "/rs/ship/service",
            Matcher::AllOf(vec![
                Matcher::UrlEncoded("origpc".into(), "K2B8J6".into()),
                Matcher::UrlEncoded("country".into(), "US".into()),
            ]),
            200,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<services xmlns="http://www.canadapost.ca/ws/ship/rate-v3">
  <service><service-code>USA.EP</service-code><service-name>Expedited Parcel USA</service-name></service>
  <service><service-code>USA.XP</service-code><service-name>Xpresspost USA</service-name></service>
</services>"#,
        )
        .await;

    let client = fixture.create_test_client(Some(CUSTOMER)).unwrap();
    let services = client.discover_services("K2B8J6", "US", None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(services.len(), 2);
    assert_eq!(services[1].service_code, "USA.XP");
    assert_eq!(services[1].service_name, "Xpresspost USA");
}

#[tokio::test]
async fn test_get_rates_posts_namespaced_scenario() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_xml_with_body(
            "POST",
            "/rs/ship/price",
            r#"<mailing-scenario xmlns="http://www.canadapost.ca/ws/ship/rate-v3"><customer-number>0001234567</customer-number>"#,
            200,
            r#"<price-quotes xmlns="http://www.canadapost.ca/ws/ship/rate-v3">
  <price-quote>
    <service-code>DOM.PC</service-code>
    <service-link rel="service" href="https://x/DOM.PC" media-type="application/vnd.cpc.ship.rate-v3+xml"/>
    <service-name>Priority</service-name>
    <price-details>
      <base>21.08</base>
      <due>24.67</due>
      <options><option><option-code>DC</option-code><option-price>0.00</option-price></option></options>
      <adjustments>
        <adjustment><adjustment-code>FUELSC</adjustment-code><adjustment-cost>1.36</adjustment-cost></adjustment>
        <adjustment><adjustment-code>AUTDISC</adjustment-code><adjustment-cost>-0.63</adjustment-cost></adjustment>
      </adjustments>
    </price-details>
    <service-standard><expected-transit-time>1</expected-transit-time></service-standard>
  </price-quote>
</price-quotes>"#,
        )
        .await;

    let client = fixture.create_test_client(Some(CUSTOMER)).unwrap();
    let quotes = client
        .get_rates(json!({
            "parcelCharacteristics": { "weight": 2 },
            "originPostalCode": "K2B8J6",
            "destination": { "domestic": { "postalCode": "J0E1X0" } }
        }))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(quotes.len(), 1);
    let quote = &quotes[0];
    assert!(quote.get("serviceLink").is_none());
    assert_eq!(quote["serviceStandard"]["expectedTransitTime"], "1");
    assert_eq!(quote["priceDetails"]["adjustments"][1]["adjustmentCode"], "AUTDISC");
    assert_eq!(
        quote["priceDetails"]["options"],
        json!([{ "optionCode": "DC", "optionPrice": "0.00" }])
    );
}
