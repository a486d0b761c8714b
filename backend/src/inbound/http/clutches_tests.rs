//! Tests for clutch HTTP handlers.

use super::*;
use crate::domain::ports::ProductRepository;
use crate::domain::NOT_PICKED_UP;
use crate::test_support::fixtures::{clutch, may};
use crate::test_support::http::{InMemoryBackend, bearer, multipart_body, png_part};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use uuid::Uuid;

type TestResponse = actix_web::dev::ServiceResponse;

fn test_app(
    backend: &InMemoryBackend,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = TestResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(backend.state()))
        .service(web::scope("/api/v1").configure(configure))
}

#[fixture]
fn backend() -> InMemoryBackend {
    InMemoryBackend::new()
}

async fn call(
    app: &impl actix_web::dev::Service<actix_http::Request, Response = TestResponse, Error = actix_web::Error>,
    request: actix_test::TestRequest,
) -> TestResponse {
    actix_test::call_service(app, request.insert_header(bearer()).to_request()).await
}

#[rstest]
#[actix_web::test]
async fn create_names_clutch_from_colour_and_model(backend: InMemoryBackend) {
    let app = actix_test::init_service(test_app(&backend)).await;
    let (content_type, body) = multipart_body(
        &[("rentPrice", "45"), ("color", "Prata"), ("model", "Carteira")],
        Some(png_part()),
    );

    let response = call(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/clutches")
            .insert_header(("Content-Type", content_type))
            .set_payload(body),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: ClutchResponse = actix_test::read_body_json(response).await;
    assert_eq!(created.name, "Prata, Carteira");
    assert_eq!(created.rent_price, 45.0);
    assert!(created.image_url.contains("clutches/"));
}

#[rstest]
#[case("", "rentPrice", "missing_field")]
#[case("quarenta", "rentPrice", "invalid_amount")]
#[actix_web::test]
async fn create_validates_rent_price(
    backend: InMemoryBackend,
    #[case] rent_price: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(&backend)).await;
    let (content_type, body) = multipart_body(
        &[("rentPrice", rent_price), ("color", "Prata"), ("model", "Carteira")],
        Some(png_part()),
    );

    let response = call(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/clutches")
            .insert_header(("Content-Type", content_type))
            .set_payload(body),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
    assert!(backend.storage.is_empty());
}

#[rstest]
#[actix_web::test]
async fn drop_off_requires_pick_up(backend: InMemoryBackend) {
    let clutch = clutch();
    backend.clutches.save(&clutch).await.expect("clutch saved");
    let app = actix_test::init_service(test_app(&backend)).await;

    let response = call(
        &app,
        actix_test::TestRequest::post().uri(&format!("/api/v1/clutches/{}/drop-off", clutch.id())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(response).await;
    assert!(body["details"].to_string().contains(NOT_PICKED_UP));
}

#[rstest]
#[actix_web::test]
async fn patch_updates_colour(backend: InMemoryBackend) {
    let clutch = clutch();
    backend.clutches.save(&clutch).await.expect("clutch saved");
    let app = actix_test::init_service(test_app(&backend)).await;

    let response = call(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/clutches/{}", clutch.id()))
            .set_json(json!({ "color": "Prata" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated: ClutchResponse = actix_test::read_body_json(response).await;
    assert_eq!(updated.name, "Prata, Envelope");
}

#[rstest]
#[actix_web::test]
async fn deleting_unknown_clutch_is_not_found(backend: InMemoryBackend) {
    let app = actix_test::init_service(test_app(&backend)).await;
    let missing = Uuid::new_v4();

    let response = call(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/clutches/{missing}")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], format!("Clutch with id(s) {missing} not found"));
    assert!(backend.storage.is_empty());
}

#[rstest]
#[actix_web::test]
async fn list_sorts_by_rent_price(backend: InMemoryBackend) {
    let cheap = clutch();
    backend.clutches.save(&cheap).await.expect("clutch saved");
    let app = actix_test::init_service(test_app(&backend)).await;
    let (content_type, body) = multipart_body(
        &[("rentPrice", "90"), ("color", "Preta"), ("model", "Baguete")],
        Some(png_part()),
    );
    call(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/clutches")
            .insert_header(("Content-Type", content_type))
            .set_payload(body),
    )
    .await;

    let response = call(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/clutches?sort=rentPrice&sortDir=desc"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["color"], "Preta");
    assert_eq!(body["data"][1]["color"], "Dourada");
}

#[rstest]
#[actix_web::test]
async fn pick_up_then_drop_off_toggles_state(backend: InMemoryBackend) {
    let clutch = clutch();
    backend.clutches.save(&clutch).await.expect("clutch saved");
    let app = actix_test::init_service(test_app(&backend)).await;

    let picked: ClutchResponse = actix_test::read_body_json(
        call(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/clutches/{}/pick-up", clutch.id())),
        )
        .await,
    )
    .await;
    assert!(picked.is_picked_up);

    let response = call(
        &app,
        actix_test::TestRequest::post().uri(&format!("/api/v1/clutches/{}/drop-off", clutch.id())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let dropped: ClutchResponse = actix_test::read_body_json(response).await;
    assert!(!dropped.is_picked_up);
}

#[rstest]
#[actix_web::test]
async fn availability_names_the_clutch(backend: InMemoryBackend) {
    let mut clutch = clutch();
    clutch.add_reservation_period(Period::new(may(3), may(6)).expect("ordered dates"));
    backend.clutches.save(&clutch).await.expect("clutch saved");
    let app = actix_test::init_service(test_app(&backend)).await;

    let response = call(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/clutches/{}/availability?date=2026-05-05", clutch.id())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: AvailabilityResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.product_id, clutch.core().id());
    assert!(!body.available);
}

#[rstest]
#[actix_web::test]
async fn malformed_id_is_bad_request(backend: InMemoryBackend) {
    let app = actix_test::init_service(test_app(&backend)).await;

    let response = call(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/clutches/not-a-uuid"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
