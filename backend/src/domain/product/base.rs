//! State and behaviour shared by every rentable product.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::ProductKind;
use crate::domain::{
    DomainEvent, Money, Notification, Outbox, Period, ProductEvent, Rule, ValidationRules,
    is_present, max_chars,
};

/// Maximum length of descriptive text fields.
pub const DESCRIPTION_MAX: usize = 100;

/// Recorded when the image key is blank.
pub const IMAGE_PATH_REQUIRED: &str = "Image path is required";
/// Recorded when the rent price is zero or negative.
pub const RENT_PRICE_NOT_POSITIVE: &str = "Rent price must be greater than zero";
/// Recorded when a reservation overlaps an existing one.
pub const RESERVATION_OVERLAP: &str = "Product is already reserved for an overlapping period";
/// Recorded when picking up a product that is already out.
pub const ALREADY_PICKED_UP: &str = "Product is already picked up";
/// Recorded when dropping off a product that is in the shop.
pub const NOT_PICKED_UP: &str = "Product is not picked up";

static RULES: LazyLock<ValidationRules<ProductCore>> = LazyLock::new(|| {
    ValidationRules::new()
        .field(
            "image_path",
            [Rule::new(IMAGE_PATH_REQUIRED, |p: &ProductCore| {
                is_present(&p.image_path)
            })],
        )
        .field(
            "rent_price",
            [Rule::new(RENT_PRICE_NOT_POSITIVE, |p: &ProductCore| {
                p.rent_price.is_positive()
            })],
        )
        .field(
            "color",
            [
                Rule::new("Color is required", |p: &ProductCore| is_present(&p.color)),
                Rule::new("Color must be at most 100 characters", |p: &ProductCore| {
                    max_chars(&p.color, DESCRIPTION_MAX)
                }),
            ],
        )
        .field(
            "model",
            [
                Rule::new("Model is required", |p: &ProductCore| is_present(&p.model)),
                Rule::new("Model must be at most 100 characters", |p: &ProductCore| {
                    max_chars(&p.model, DESCRIPTION_MAX)
                }),
            ],
        )
});

/// Descriptive fields common to every product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Rent price.
    pub rent_price: Money,
    /// Colour.
    pub color: String,
    /// Model or cut.
    pub model: String,
}

/// Persisted state common to every product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// Identifier.
    pub id: Uuid,
    /// Storage key of the image.
    pub image_path: String,
    /// Rent price.
    pub rent_price: Money,
    /// Colour.
    pub color: String,
    /// Model or cut.
    pub model: String,
    /// True while a customer holds the product.
    pub is_picked_up: bool,
    /// Reserved ranges.
    pub reservation_periods: Vec<Period>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Shared product state with its notification and outbox.
#[derive(Debug, Clone)]
pub struct ProductCore {
    kind: ProductKind,
    id: Uuid,
    image_path: String,
    rent_price: Money,
    color: String,
    model: String,
    is_picked_up: bool,
    reservation_periods: Vec<Period>,
    created_at: DateTime<Utc>,
    notification: Notification,
    outbox: Outbox<DomainEvent>,
}

impl ProductCore {
    pub(super) fn create(
        kind: ProductKind,
        draft: ProductDraft,
        image_path: String,
        now: DateTime<Utc>,
    ) -> Self {
        let mut core = Self {
            kind,
            id: Uuid::new_v4(),
            image_path,
            rent_price: draft.rent_price,
            color: draft.color,
            model: draft.model,
            is_picked_up: false,
            reservation_periods: Vec::new(),
            created_at: now,
            notification: Notification::new(),
            outbox: Outbox::default(),
        };
        core.revalidate(None);
        let id = core.id;
        core.record(ProductEvent::Created { kind, id });
        core
    }

    pub(super) fn restore(kind: ProductKind, record: ProductRecord) -> Self {
        Self {
            kind,
            id: record.id,
            image_path: record.image_path,
            rent_price: record.rent_price,
            color: record.color,
            model: record.model,
            is_picked_up: record.is_picked_up,
            reservation_periods: record.reservation_periods,
            created_at: record.created_at,
            notification: Notification::new(),
            outbox: Outbox::default(),
        }
    }

    /// Product kind.
    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    /// Raw identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Storage key of the image.
    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    /// Rent price.
    pub fn rent_price(&self) -> Money {
        self.rent_price
    }

    /// Colour.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Model or cut.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// True while a customer holds the product.
    pub fn is_picked_up(&self) -> bool {
        self.is_picked_up
    }

    /// Reserved ranges, in insertion order.
    pub fn reservation_periods(&self) -> &[Period] {
        &self.reservation_periods
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Accumulated validation messages.
    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub(super) fn notification_mut(&mut self) -> &mut Notification {
        &mut self.notification
    }

    pub(super) fn drain_events(&mut self) -> Vec<DomainEvent> {
        self.outbox.drain()
    }

    /// True when no reservation covers `date`.
    pub fn is_available_for(&self, date: NaiveDate) -> bool {
        !self
            .reservation_periods
            .iter()
            .any(|period| period.contains(date))
    }

    /// Hand the product to a customer.
    pub fn pick_up(&mut self) {
        if self.is_picked_up {
            self.notification.add_error(ALREADY_PICKED_UP, Some("is_picked_up"));
            return;
        }
        self.is_picked_up = true;
        let (kind, id) = (self.kind, self.id);
        self.record(ProductEvent::PickedUp { kind, id });
    }

    /// Take the product back.
    pub fn drop_off(&mut self) {
        if !self.is_picked_up {
            self.notification.add_error(NOT_PICKED_UP, Some("is_picked_up"));
            return;
        }
        self.is_picked_up = false;
        let (kind, id) = (self.kind, self.id);
        self.record(ProductEvent::DroppedOff { kind, id });
    }

    /// Reserve the product for `period`, rejecting overlaps.
    pub fn add_reservation_period(&mut self, period: Period) {
        if self
            .reservation_periods
            .iter()
            .any(|existing| existing.overlaps(&period))
        {
            self.notification
                .add_error(RESERVATION_OVERLAP, Some("reservation_periods"));
            return;
        }
        self.reservation_periods.push(period);
        let (kind, id) = (self.kind, self.id);
        self.record(ProductEvent::Reserved { kind, id, period });
    }

    /// Drop a reservation matching `period` exactly. Returns whether one
    /// was removed.
    pub fn release_reservation(&mut self, period: &Period) -> bool {
        let before = self.reservation_periods.len();
        self.reservation_periods.retain(|existing| existing != period);
        let removed = self.reservation_periods.len() != before;
        if removed {
            let (kind, id) = (self.kind, self.id);
            self.record(ProductEvent::Released {
                kind,
                id,
                period: *period,
            });
        }
        removed
    }

    /// Replace the rent price.
    pub fn change_rent_price(&mut self, rent_price: Money) {
        self.rent_price = rent_price;
        self.revalidate(Some(&["rent_price"]));
    }

    /// Replace the colour.
    pub fn change_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
        self.revalidate(Some(&["color"]));
    }

    /// Replace the model.
    pub fn change_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
        self.revalidate(Some(&["model"]));
    }

    /// Point at a new stored image.
    pub fn change_image_path(&mut self, image_path: impl Into<String>) {
        self.image_path = image_path.into();
        self.revalidate(Some(&["image_path"]));
        let (kind, id) = (self.kind, self.id);
        self.record(ProductEvent::ImageChanged { kind, id });
    }

    pub(super) fn revalidate(&mut self, fields: Option<&[&str]>) {
        for field in fields.into_iter().flatten() {
            self.notification.clear_field(field);
        }
        let found = RULES.check(self, fields);
        self.notification.copy_errors(&found);
    }

    fn record(&mut self, event: ProductEvent) {
        self.outbox.record(DomainEvent::from(event));
    }
}
