use storefront_api::routes::health::health_check;

#[tokio::test]
async fn health_check_reports_ok_with_timestamp() {
    let before = chrono::Utc::now();
    let response = health_check().await;
    assert_eq!(response.0.message, "Storefront API is running");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert!(data.timestamp >= before);
}
