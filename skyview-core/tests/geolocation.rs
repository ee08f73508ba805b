use skyview_core::{
    Coordinates, GeolocationError,
    geo::{Geolocator, IpGeolocator},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn locator_answering(response: ResponseTemplate) -> (MockServer, IpGeolocator) {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/json")).respond_with(response).mount(&server).await;

    let locator = IpGeolocator::new(format!("{}/json", server.uri())).expect("locator builds");
    (server, locator)
}

#[tokio::test]
async fn successful_lookup_yields_coordinates() {
    let (_server, locator) = locator_answering(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({ "status": "success", "city": "Lisbon", "lat": 38.72, "lon": -9.14 }),
    ))
    .await;

    let position = locator.current_position().await.unwrap();
    assert_eq!(position, Coordinates { lat: 38.72, lon: -9.14 });
}

#[tokio::test]
async fn failed_lookup_status_is_unavailable() {
    let (_server, locator) = locator_answering(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({ "status": "fail", "message": "private range" }),
    ))
    .await;

    let err = locator.current_position().await.unwrap_err();
    assert_eq!(err, GeolocationError::Unavailable("private range".to_string()));
}

#[tokio::test]
async fn forbidden_is_permission_denied() {
    let (_server, locator) = locator_answering(ResponseTemplate::new(403)).await;

    let err = locator.current_position().await.unwrap_err();
    assert_eq!(err, GeolocationError::PermissionDenied);
}

#[tokio::test]
async fn missing_coordinates_is_unavailable() {
    let (_server, locator) =
        locator_answering(ResponseTemplate::new(200).set_body_json(serde_json::json!({}))).await;

    assert!(matches!(
        locator.current_position().await,
        Err(GeolocationError::Unavailable(_))
    ));
}
