//! Rentable products: dresses and clutches.
//!
//! Both share [`ProductCore`] for price, description, pick-up state and
//! reservations. The [`Product`] trait lets repositories and services stay
//! generic over the concrete kind.

mod base;
mod clutch;
mod dress;

use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, Utc};
use pagination::SearchFilter;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::shared::string_enum;
use crate::domain::{AggregateRoot, Money, Period};

pub use base::{
    ALREADY_PICKED_UP, DESCRIPTION_MAX, IMAGE_PATH_REQUIRED, NOT_PICKED_UP, ProductCore,
    ProductDraft, ProductRecord, RENT_PRICE_NOT_POSITIVE, RESERVATION_OVERLAP,
};
pub use clutch::{Clutch, ClutchChanges, ClutchDraft, ClutchFilter, ClutchId};
pub use dress::{Dress, DressChanges, DressDraft, DressFilter, DressId};

/// Product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductKind {
    /// A dress.
    Dress,
    /// A clutch bag.
    Clutch,
}

string_enum!(ProductKind {
    Dress => "DRESS",
    Clutch => "CLUTCH",
});

/// Behaviour shared by dresses and clutches.
///
/// The provided methods forward to [`ProductCore`]; implementors only
/// describe their identity, descriptive name and kind-specific fields.
pub trait Product: AggregateRoot + Clone + Debug + Send + Sync + 'static {
    /// Typed identifier.
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync + From<Uuid> + Into<Uuid> + 'static;
    /// Search criteria.
    type Filter: SearchFilter + Clone + Debug + Send + Sync + 'static;
    /// Input for [`Product::create`].
    type Draft: Send + 'static;
    /// Partial update applied by [`Product::apply_changes`].
    type Changes: Send + 'static;

    /// Product family.
    const KIND: ProductKind;
    /// Entity name used in messages, e.g. `Dress`.
    const ENTITY_NAME: &'static str;

    /// Build and validate a new product pointing at `image_path`.
    fn create(draft: Self::Draft, image_path: String, now: DateTime<Utc>) -> Self;

    /// Apply a partial update, re-validating the touched fields.
    fn apply_changes(&mut self, changes: Self::Changes);

    /// Shared state.
    fn core(&self) -> &ProductCore;

    /// Shared state, mutable.
    fn core_mut(&mut self) -> &mut ProductCore;

    /// Descriptive fields joined with `", "`.
    fn name(&self) -> String;

    /// Typed identifier.
    fn id(&self) -> Self::Id {
        Self::Id::from(self.core().id())
    }

    /// Rent price.
    fn rent_price(&self) -> Money {
        self.core().rent_price()
    }

    /// Storage key of the image.
    fn image_path(&self) -> &str {
        self.core().image_path()
    }

    /// True when no reservation covers `date`.
    fn is_available_for(&self, date: NaiveDate) -> bool {
        self.core().is_available_for(date)
    }

    /// Hand the product to a customer.
    fn pick_up(&mut self) {
        self.core_mut().pick_up();
    }

    /// Take the product back.
    fn drop_off(&mut self) {
        self.core_mut().drop_off();
    }

    /// Reserve the product for `period`.
    fn add_reservation_period(&mut self, period: Period) {
        self.core_mut().add_reservation_period(period);
    }

    /// Release a reservation made for `period`.
    fn release_reservation(&mut self, period: &Period) -> bool {
        self.core_mut().release_reservation(period)
    }

    /// Point at a new stored image.
    fn change_image_path(&mut self, image_path: String) {
        self.core_mut().change_image_path(image_path);
    }
}
