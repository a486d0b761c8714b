//! Clutch aggregate.

use chrono::{DateTime, Utc};
use pagination::{SearchFilter, normalize_text};
use serde::Deserialize;

use super::{Product, ProductCore, ProductDraft, ProductKind, ProductRecord};
use crate::domain::shared::define_identifier;
use crate::domain::{AggregateRoot, DomainEvent, Money, Notification};

define_identifier! {
    /// Clutch identifier.
    ClutchId
}

/// Input for a new clutch.
pub type ClutchDraft = ProductDraft;

/// Partial update for a clutch; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClutchChanges {
    /// New rent price.
    pub rent_price: Option<Money>,
    /// New colour.
    pub color: Option<String>,
    /// New model.
    pub model: Option<String>,
}

/// Clutch aggregate root.
#[derive(Debug, Clone)]
pub struct Clutch {
    core: ProductCore,
}

impl Clutch {
    /// Rebuild from persisted state without re-running validation.
    pub fn restore(record: ProductRecord) -> Self {
        Self {
            core: ProductCore::restore(ProductKind::Clutch, record),
        }
    }
}

impl AggregateRoot for Clutch {
    fn notification(&self) -> &Notification {
        self.core.notification()
    }

    fn drain_events(&mut self) -> Vec<DomainEvent> {
        self.core.drain_events()
    }
}

impl Product for Clutch {
    type Id = ClutchId;
    type Filter = ClutchFilter;
    type Draft = ClutchDraft;
    type Changes = ClutchChanges;

    const KIND: ProductKind = ProductKind::Clutch;
    const ENTITY_NAME: &'static str = "Clutch";

    fn create(draft: ClutchDraft, image_path: String, now: DateTime<Utc>) -> Self {
        Self {
            core: ProductCore::create(ProductKind::Clutch, draft, image_path, now),
        }
    }

    fn apply_changes(&mut self, changes: ClutchChanges) {
        if let Some(rent_price) = changes.rent_price {
            self.core.change_rent_price(rent_price);
        }
        if let Some(color) = changes.color {
            self.core.change_color(color);
        }
        if let Some(model) = changes.model {
            self.core.change_model(model);
        }
    }

    fn core(&self) -> &ProductCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProductCore {
        &mut self.core
    }

    fn name(&self) -> String {
        [self.core.color(), self.core.model()].join(", ")
    }
}

/// Search criteria for clutches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClutchFilter {
    /// Colour contains.
    pub color: Option<String>,
    /// Model contains.
    pub model: Option<String>,
}

impl SearchFilter for ClutchFilter {
    const SORTABLE_FIELDS: &'static [&'static str] = &["color", "model", "rent_price", "created_at"];

    fn is_empty(&self) -> bool {
        self.color.is_none() && self.model.is_none()
    }

    fn normalized(self) -> Option<Self> {
        let filter = Self {
            color: normalize_text(self.color),
            model: normalize_text(self.model),
        };
        if filter.is_empty() { None } else { Some(filter) }
    }
}
