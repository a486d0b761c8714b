//! Tests for the product service.

use std::sync::Arc;

use pagination::RawSearchParams;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    FixtureDomainEventPublisher, ImageStorageError, MockImageStorage, MockProductRepository,
    ProductRepositoryError,
};
use crate::domain::{Clutch, ClutchId, Dress, DressChanges, DressDraft, DressId, ErrorCode, Money};
use crate::test_support::clock::MutableClock;
use crate::test_support::fixtures::{clutch, dress, dress_draft, may, png_upload};

fn service<P: Product>(
    repo: MockProductRepository<P>,
    storage: MockImageStorage,
) -> ProductService<P, MockProductRepository<P>> {
    ProductService::new(
        Arc::new(repo),
        Arc::new(storage),
        Arc::new(FixtureDomainEventPublisher),
        Arc::new(MutableClock::at_fixture_now()),
    )
}

fn presigning_storage() -> MockImageStorage {
    let mut storage = MockImageStorage::new();
    storage
        .expect_presigned_url()
        .returning(|key, _| Ok(format!("https://signed.test/{key}")));
    storage
}

#[rstest]
#[case("image/png", "photo.PNG", "png")]
#[case("image/jpeg", "photo", "jpg")]
#[case("application/octet-stream", "photo.WebP", "webp")]
#[case("application/octet-stream", "photo", "bin")]
fn extension_prefers_content_type(
    #[case] content_type: &str,
    #[case] name: &str,
    #[case] expected: &str,
) {
    let upload = ImageUpload {
        content_type: content_type.to_owned(),
        ..png_upload(name)
    };
    assert_eq!(image_extension(&upload), expected);
}

#[rstest]
#[tokio::test]
async fn create_uploads_under_kind_prefix_and_presigns() {
    let mut repo = MockProductRepository::<Dress>::new();
    repo.expect_save().times(1).return_once(|_| Ok(()));
    let mut storage = presigning_storage();
    storage
        .expect_upload()
        .withf(|upload| upload.name.starts_with("dresses/") && upload.name.ends_with(".png"))
        .times(1)
        .returning(|upload| Ok(upload.name));
    storage.expect_delete().times(0);

    let view = service(repo, storage)
        .create(dress_draft(), png_upload("azul.png"))
        .await
        .expect("create succeeds");

    assert_eq!(view.product.name(), "Azul, Tomara que caia, Seda");
    assert!(view.image_url.starts_with("https://signed.test/dresses/"));
}

#[rstest]
#[tokio::test]
async fn invalid_product_removes_uploaded_image() {
    let mut repo = MockProductRepository::<Dress>::new();
    repo.expect_save().times(0);
    let mut storage = MockImageStorage::new();
    storage
        .expect_upload()
        .times(1)
        .returning(|upload| Ok(upload.name));
    storage.expect_delete().times(1).returning(|_| Ok(()));

    let mut draft: DressDraft = dress_draft();
    draft.product.rent_price = Money::ZERO;
    let error = service(repo, storage)
        .create(draft, png_upload("azul.png"))
        .await
        .expect_err("zero price is rejected");

    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
}

#[rstest]
#[tokio::test]
async fn failed_save_removes_uploaded_image() {
    let mut repo = MockProductRepository::<Clutch>::new();
    repo.expect_save()
        .times(1)
        .return_once(|_| Err(ProductRepositoryError::connection("refused")));
    let mut storage = MockImageStorage::new();
    storage
        .expect_upload()
        .times(1)
        .returning(|upload| Ok(upload.name));
    storage.expect_delete().times(1).returning(|_| Ok(()));

    let error = service(repo, storage)
        .create(crate::test_support::fixtures::clutch_draft(), png_upload("c.png"))
        .await
        .expect_err("save fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn upload_failure_stops_before_saving() {
    let mut repo = MockProductRepository::<Dress>::new();
    repo.expect_save().times(0);
    let mut storage = MockImageStorage::new();
    storage
        .expect_upload()
        .times(1)
        .returning(|_| Err(ImageStorageError::upload("bucket missing")));

    let error = service(repo, storage)
        .create(dress_draft(), png_upload("azul.png"))
        .await
        .expect_err("upload fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn deleting_unknown_clutch_is_not_found_and_keeps_images() {
    let mut repo = MockProductRepository::<Clutch>::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_delete().times(0);
    let mut storage = MockImageStorage::new();
    storage.expect_delete().times(0);
    let id = ClutchId::random();

    let error = service(repo, storage)
        .delete(id)
        .await
        .expect_err("unknown clutch");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), format!("Clutch with id(s) {id} not found"));
}

#[rstest]
#[tokio::test]
async fn delete_removes_row_then_image() {
    let stored = clutch();
    let image = stored.image_path().to_owned();
    let mut repo = MockProductRepository::<Clutch>::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_delete().times(1).return_once(|_| Ok(true));
    let mut storage = MockImageStorage::new();
    storage
        .expect_delete()
        .withf(move |key| *key == image)
        .times(1)
        .returning(|_| Ok(()));

    service(repo, storage)
        .delete(ClutchId::random())
        .await
        .expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn replace_image_discards_previous_object() {
    let stored = dress();
    let previous = stored.image_path().to_owned();
    let mut repo = MockProductRepository::<Dress>::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_save().times(1).return_once(|_| Ok(()));
    let mut storage = presigning_storage();
    storage
        .expect_upload()
        .times(1)
        .returning(|upload| Ok(upload.name));
    storage
        .expect_delete()
        .withf(move |key| *key == previous)
        .times(1)
        .returning(|_| Ok(()));

    let view = service(repo, storage)
        .replace_image(DressId::random(), png_upload("new.png"))
        .await
        .expect("replace succeeds");

    assert_ne!(view.product.image_path(), "dresses/azul.png");
}

#[rstest]
#[tokio::test]
async fn update_rejects_invalid_changes_without_saving() {
    let stored = dress();
    let mut repo = MockProductRepository::<Dress>::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_save().times(0);

    let error = service(repo, MockImageStorage::new())
        .update(
            DressId::random(),
            DressChanges {
                fabric: Some(String::new()),
                ..DressChanges::default()
            },
        )
        .await
        .expect_err("blank fabric fails");

    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
}

#[rstest]
#[tokio::test]
async fn pick_up_twice_is_unprocessable() {
    let mut stored = dress();
    stored.pick_up();
    let mut repo = MockProductRepository::<Dress>::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_save().times(0);

    let error = service(repo, MockImageStorage::new())
        .pick_up(DressId::random())
        .await
        .expect_err("already picked up");

    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
}

#[rstest]
#[tokio::test]
async fn availability_reflects_reservations() {
    let mut stored = dress();
    stored.add_reservation_period(
        crate::domain::Period::new(may(10), may(12)).expect("ordered period"),
    );
    let mut repo = MockProductRepository::<Dress>::new();
    repo.expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(Some(stored.clone())));
    let service = service(repo, MockImageStorage::new());

    assert!(
        !service
            .check_availability(DressId::random(), may(11))
            .await
            .expect("lookup succeeds")
    );
    assert!(
        service
            .check_availability(DressId::random(), may(13))
            .await
            .expect("lookup succeeds")
    );
}

#[rstest]
#[tokio::test]
async fn search_presigns_every_item() {
    let mut repo = MockProductRepository::<Dress>::new();
    repo.expect_search()
        .times(1)
        .return_once(|params| Ok(SearchResult::new(vec![dress(), dress()], 7, params.page(), 2)));

    let result = service(repo, presigning_storage())
        .search(SearchParams::create(RawSearchParams {
            per_page: Some(2),
            ..RawSearchParams::default()
        }))
        .await
        .expect("search succeeds");

    assert_eq!(result.total(), 7);
    assert_eq!(result.last_page(), 4);
    assert!(
        result
            .items()
            .iter()
            .all(|view| view.image_url == "https://signed.test/dresses/azul.png")
    );
}
