//! Integration tests for the Diesel dress and clutch repositories against
//! embedded PostgreSQL.
//!
//! Reservation periods are stored as JSONB next to the product row, so the
//! availability answers given after a reload are the main contract here.

use atelier::domain::ports::ProductRepository;
use atelier::domain::{
    AggregateRoot, Clutch, Dress, DressDraft, DressFilter, Period, Product,
};
use atelier::outbound::persistence::{DieselClutchRepository, DieselDressRepository};
use atelier::test_support::clock::fixture_now;
use atelier::test_support::fixtures::{clutch, dress, dress_draft, may};
use pagination::{RawSearchParams, SearchParams};
use rstest::{fixture, rstest};

mod support;

use support::embedded_postgres::{TestDatabase, provision};
use support::handle_cluster_setup_failure;

#[fixture]
fn database() -> Option<TestDatabase> {
    match provision() {
        Ok(db) => Some(db),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn period(start: u32, end: u32) -> Period {
    Period::new(may(start), may(end)).expect("ordered fixture period")
}

fn dress_in(fabric: &str) -> Dress {
    let mut dress = Dress::create(
        DressDraft {
            fabric: fabric.to_owned(),
            ..dress_draft()
        },
        format!("dresses/{fabric}.png"),
        fixture_now(),
    );
    dress.drain_events();
    dress
}

#[rstest]
fn dress_round_trips_with_reservations(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let repo = DieselDressRepository::new(db.pool.clone());
    let mut stored = dress();
    stored.add_reservation_period(period(18, 21));
    stored.add_reservation_period(period(25, 26));

    db.block_on(repo.save(&stored)).expect("save succeeds");
    let loaded = db
        .block_on(repo.find_by_id(&stored.id()))
        .expect("lookup succeeds")
        .expect("dress exists");

    assert_eq!(loaded.id(), stored.id());
    assert_eq!(loaded.fabric(), "Seda");
    assert_eq!(loaded.rent_price(), stored.rent_price());
    assert_eq!(loaded.image_path(), "dresses/azul.png");
    assert_eq!(
        loaded.core().reservation_periods(),
        stored.core().reservation_periods()
    );
    assert_eq!(loaded.core().created_at(), stored.core().created_at());
}

#[rstest]
#[case(may(17), true)]
#[case(may(18), false)]
#[case(may(21), false)]
#[case(may(22), true)]
#[case(may(26), false)]
fn reloaded_dress_answers_availability(
    database: Option<TestDatabase>,
    #[case] date: chrono::NaiveDate,
    #[case] available: bool,
) {
    let Some(db) = database else { return };
    let repo = DieselDressRepository::new(db.pool.clone());
    let mut stored = dress();
    stored.add_reservation_period(period(18, 21));
    stored.add_reservation_period(period(25, 26));
    db.block_on(repo.save(&stored)).expect("save succeeds");

    let loaded = db
        .block_on(repo.find_by_id(&stored.id()))
        .expect("lookup succeeds")
        .expect("dress exists");

    assert_eq!(loaded.is_available_for(date), available);
}

#[rstest]
fn saving_again_overwrites_state(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let repo = DieselDressRepository::new(db.pool.clone());
    let mut stored = dress();
    stored.add_reservation_period(period(18, 21));
    db.block_on(repo.save(&stored)).expect("first save succeeds");

    stored.pick_up();
    assert!(stored.release_reservation(&period(18, 21)));
    db.block_on(repo.save(&stored)).expect("second save succeeds");

    let loaded = db
        .block_on(repo.find_by_id(&stored.id()))
        .expect("lookup succeeds")
        .expect("dress exists");
    assert!(loaded.core().is_picked_up());
    assert!(loaded.core().reservation_periods().is_empty());
}

#[rstest]
fn find_by_ids_skips_unknown_ids(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let repo = DieselDressRepository::new(db.pool.clone());
    let first = dress();
    let second = dress_in("Renda");
    let missing = dress();
    for stored in [&first, &second] {
        db.block_on(repo.save(stored)).expect("save succeeds");
    }

    let found = db
        .block_on(repo.find_by_ids(&[first.id(), missing.id(), second.id()]))
        .expect("lookup succeeds");

    let mut ids: Vec<_> = found.iter().map(|dress| dress.id()).collect();
    ids.sort_by_key(|id| id.to_string());
    let mut expected = vec![first.id(), second.id()];
    expected.sort_by_key(|id| id.to_string());
    assert_eq!(ids, expected);
}

#[rstest]
fn search_filters_and_pages(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let repo = DieselDressRepository::new(db.pool.clone());
    for fabric in ["Seda", "Seda pura", "Renda"] {
        db.block_on(repo.save(&dress_in(fabric))).expect("save succeeds");
    }
    let params = SearchParams::create(RawSearchParams {
        page: Some(2),
        per_page: Some(1),
        sort: Some("fabric".to_owned()),
        sort_dir: Some("asc".to_owned()),
        filter: Some(DressFilter {
            fabric: Some("seda".to_owned()),
            ..DressFilter::default()
        }),
    });

    let page = db.block_on(repo.search(&params)).expect("search succeeds");

    assert_eq!(page.total(), 2);
    assert_eq!(page.current_page(), 2);
    let fabrics: Vec<_> = page.items().iter().map(|dress| dress.fabric()).collect();
    assert_eq!(fabrics, ["Seda pura"]);
}

#[rstest]
fn delete_reports_whether_a_row_was_removed(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let repo = DieselDressRepository::new(db.pool.clone());
    let stored = dress();
    db.block_on(repo.save(&stored)).expect("save succeeds");

    assert!(db.block_on(repo.delete(&stored.id())).expect("delete succeeds"));
    assert!(!db.block_on(repo.delete(&stored.id())).expect("delete succeeds"));
    assert!(
        db.block_on(repo.find_by_id(&stored.id()))
            .expect("lookup succeeds")
            .is_none()
    );
}

#[rstest]
fn clutch_round_trips_without_fabric(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let repo = DieselClutchRepository::new(db.pool.clone());
    let mut stored: Clutch = clutch();
    stored.add_reservation_period(period(18, 21));
    db.block_on(repo.save(&stored)).expect("save succeeds");

    let loaded = db
        .block_on(repo.find_by_id(&stored.id()))
        .expect("lookup succeeds")
        .expect("clutch exists");

    assert_eq!(loaded.name(), stored.name());
    assert_eq!(loaded.core().color(), "Dourada");
    assert!(!loaded.is_available_for(may(19)));
}

#[rstest]
fn unfiltered_search_counts_every_row(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let repo = DieselClutchRepository::new(db.pool.clone());
    for _ in 0..3 {
        db.block_on(repo.save(&clutch())).expect("save succeeds");
    }
    let params = SearchParams::create(RawSearchParams {
        per_page: Some(2),
        ..RawSearchParams::default()
    });

    let page = db.block_on(repo.search(&params)).expect("search succeeds");

    assert_eq!(page.total(), 3);
    assert_eq!(page.items().len(), 2);
    assert_eq!(page.last_page(), 2);
}
