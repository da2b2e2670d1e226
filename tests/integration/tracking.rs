use crate::mock_server::MockServerFixture;
use canadapost_client::TrackingId;
use mockito::Matcher;

#[tokio::test]
async fn test_tracking_summary_without_customer() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_xml(
            "GET",
            "/vis/track/pin/1371134583769923/summary",
            Matcher::Missing,
            200,
            r#"<tracking-summary xmlns="http://www.canadapost.ca/ws/track">
  <pin-summary>
    <pin>1371134583769923</pin>
    <origin-postal-id>K2B8J6</origin-postal-id>
    <event-type>DELIVERED</event-type>
  </pin-summary>
</tracking-summary>"#,
        )
        .await;

    let client = fixture.create_test_client(None).unwrap();
    let summary = client
        .get_tracking_summary(&TrackingId::Pin("1371134583769923".into()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0]["originPostalId"], "K2B8J6");
    assert_eq!(summary[0]["eventType"], "DELIVERED");
}

#[tokio::test]
async fn test_tracking_detail_by_dnc() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_xml(
            "GET",
            "/vis/track/dnc/315052413796541/detail",
            Matcher::Missing,
            200,
            r#"<tracking-detail xmlns="http://www.canadapost.ca/ws/track">
  <pin>7023210039414604</pin>
  <significant-events>
    <occurrence><event-identifier>1496</event-identifier><event-description>Delivered</event-description></occurrence>
    <occurrence><event-identifier>0174</event-identifier><event-description>Out for delivery</event-description></occurrence>
  </significant-events>
</tracking-detail>"#,
        )
        .await;

    let client = fixture.create_test_client(None).unwrap();
    let detail = client
        .get_tracking_detail(&TrackingId::Dnc("315052413796541".into()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(detail["pin"], "7023210039414604");
    assert_eq!(detail["significantEvents"][1]["eventIdentifier"], "0174");
    assert!(detail.get("deliveryOptions").is_none());
}
