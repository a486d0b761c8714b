//! Products held by a booking, with their requested adjustments.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::shared::define_identifier;
use crate::domain::{Money, Product, ProductKind, is_present};

define_identifier! {
    /// Booking item identifier.
    BookingItemId
}

/// Tailoring requested for a booked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Adjustment {
    /// Short label, e.g. `Barra`.
    pub label: String,
    /// Free-text details.
    pub description: String,
}

/// A product snapshot inside a booking.
///
/// Price, name and image are copied from the product when the booking is
/// made so later product edits do not change the booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingItem {
    id: BookingItemId,
    product_id: Uuid,
    kind: ProductKind,
    product_name: String,
    rent_price: Money,
    image_path: String,
    adjustments: Vec<Adjustment>,
}

impl BookingItem {
    /// Snapshot `product` with the requested adjustments.
    pub fn from_product<P: Product>(product: &P, adjustments: Vec<Adjustment>) -> Self {
        Self {
            id: BookingItemId::random(),
            product_id: product.core().id(),
            kind: P::KIND,
            product_name: product.name(),
            rent_price: product.rent_price(),
            image_path: product.image_path().to_owned(),
            adjustments,
        }
    }

    /// Rebuild from stored columns.
    pub fn restore(
        id: BookingItemId,
        product_id: Uuid,
        kind: ProductKind,
        product_name: String,
        rent_price: Money,
        image_path: String,
        adjustments: Vec<Adjustment>,
    ) -> Self {
        Self {
            id,
            product_id,
            kind,
            product_name,
            rent_price,
            image_path,
            adjustments,
        }
    }

    /// Identifier.
    pub fn id(&self) -> BookingItemId {
        self.id
    }

    /// Booked product id.
    pub fn product_id(&self) -> Uuid {
        self.product_id
    }

    /// Product family.
    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    /// Product name at booking time.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Rent price at booking time.
    pub fn rent_price(&self) -> Money {
        self.rent_price
    }

    /// Storage key of the product image at booking time.
    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    /// Requested adjustments.
    pub fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }

    /// True when the snapshot and its adjustments are well formed.
    pub fn is_valid(&self) -> bool {
        self.rent_price.is_positive()
            && is_present(&self.product_name)
            && self
                .adjustments
                .iter()
                .all(|adjustment| is_present(&adjustment.label))
    }
}
