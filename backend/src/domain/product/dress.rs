//! Dress aggregate.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use pagination::{SearchFilter, normalize_text};
use serde::Deserialize;

use super::{DESCRIPTION_MAX, Product, ProductCore, ProductDraft, ProductKind, ProductRecord};
use crate::domain::shared::define_identifier;
use crate::domain::{
    AggregateRoot, DomainEvent, Money, Notification, Rule, ValidationRules, is_present, max_chars,
};

define_identifier! {
    /// Dress identifier.
    DressId
}

static RULES: LazyLock<ValidationRules<Dress>> = LazyLock::new(|| {
    ValidationRules::new().field(
        "fabric",
        [
            Rule::new("Fabric is required", |d: &Dress| is_present(&d.fabric)),
            Rule::new("Fabric must be at most 100 characters", |d: &Dress| {
                max_chars(&d.fabric, DESCRIPTION_MAX)
            }),
        ],
    )
});

/// Input for a new dress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DressDraft {
    /// Shared product fields.
    pub product: ProductDraft,
    /// Fabric.
    pub fabric: String,
}

/// Partial update for a dress; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DressChanges {
    /// New rent price.
    pub rent_price: Option<Money>,
    /// New colour.
    pub color: Option<String>,
    /// New model.
    pub model: Option<String>,
    /// New fabric.
    pub fabric: Option<String>,
}

/// Dress aggregate root.
///
/// # Examples
/// ```
/// use atelier::domain::{Dress, DressDraft, Money, Product, ProductDraft};
/// use chrono::Utc;
///
/// let dress = Dress::create(
///     DressDraft {
///         product: ProductDraft {
///             rent_price: Money::from_cents(20_000),
///             color: "Azul".into(),
///             model: "Tomara que caia".into(),
///         },
///         fabric: "Seda".into(),
///     },
///     "dresses/azul.png".into(),
///     Utc::now(),
/// );
/// assert_eq!(dress.name(), "Azul, Tomara que caia, Seda");
/// ```
#[derive(Debug, Clone)]
pub struct Dress {
    core: ProductCore,
    fabric: String,
}

impl Dress {
    /// Rebuild from persisted state without re-running validation.
    pub fn restore(record: ProductRecord, fabric: String) -> Self {
        Self {
            core: ProductCore::restore(ProductKind::Dress, record),
            fabric,
        }
    }

    /// Fabric.
    pub fn fabric(&self) -> &str {
        &self.fabric
    }

    /// Replace the fabric.
    pub fn change_fabric(&mut self, fabric: impl Into<String>) {
        self.fabric = fabric.into();
        self.revalidate(Some(&["fabric"]));
    }

    fn revalidate(&mut self, fields: Option<&[&str]>) {
        for field in fields.into_iter().flatten() {
            self.core.notification_mut().clear_field(field);
        }
        let found = RULES.check(self, fields);
        self.core.notification_mut().copy_errors(&found);
    }
}

impl AggregateRoot for Dress {
    fn notification(&self) -> &Notification {
        self.core.notification()
    }

    fn drain_events(&mut self) -> Vec<DomainEvent> {
        self.core.drain_events()
    }
}

impl Product for Dress {
    type Id = DressId;
    type Filter = DressFilter;
    type Draft = DressDraft;
    type Changes = DressChanges;

    const KIND: ProductKind = ProductKind::Dress;
    const ENTITY_NAME: &'static str = "Dress";

    fn create(draft: DressDraft, image_path: String, now: DateTime<Utc>) -> Self {
        let mut dress = Self {
            core: ProductCore::create(ProductKind::Dress, draft.product, image_path, now),
            fabric: draft.fabric,
        };
        dress.revalidate(None);
        dress
    }

    fn apply_changes(&mut self, changes: DressChanges) {
        let DressChanges {
            rent_price,
            color,
            model,
            fabric,
        } = changes;
        if let Some(rent_price) = rent_price {
            self.core.change_rent_price(rent_price);
        }
        if let Some(color) = color {
            self.core.change_color(color);
        }
        if let Some(model) = model {
            self.core.change_model(model);
        }
        if let Some(fabric) = fabric {
            self.change_fabric(fabric);
        }
    }

    fn core(&self) -> &ProductCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProductCore {
        &mut self.core
    }

    fn name(&self) -> String {
        [self.core.color(), self.core.model(), self.fabric.as_str()].join(", ")
    }
}

/// Search criteria for dresses; text fields match case-insensitive
/// substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DressFilter {
    /// Colour contains.
    pub color: Option<String>,
    /// Model contains.
    pub model: Option<String>,
    /// Fabric contains.
    pub fabric: Option<String>,
}

impl SearchFilter for DressFilter {
    const SORTABLE_FIELDS: &'static [&'static str] =
        &["color", "model", "fabric", "rent_price", "created_at"];

    fn is_empty(&self) -> bool {
        self.color.is_none() && self.model.is_none() && self.fabric.is_none()
    }

    fn normalized(self) -> Option<Self> {
        let filter = Self {
            color: normalize_text(self.color),
            model: normalize_text(self.model),
            fabric: normalize_text(self.fabric),
        };
        if filter.is_empty() { None } else { Some(filter) }
    }
}
