//! Filter and sort rules for aggregates held in memory.
//!
//! Mirrors the SQL adapters: text filters match case-insensitive
//! substrings, enums and dates match exactly, and ties fall back to the id.

use std::cmp::Ordering;

use pagination::InMemorySearch;

use crate::domain::{
    Appointment, AppointmentFilter, Booking, BookingFilter, Clutch, ClutchFilter, Dress,
    DressFilter, Product,
};

use super::contains_ignore_case;

fn text_matches(value: &str, wanted: Option<&str>) -> bool {
    wanted.is_none_or(|needle| contains_ignore_case(value, needle))
}

fn exact_matches<T: PartialEq>(value: T, wanted: Option<T>) -> bool {
    wanted.is_none_or(|expected| value == expected)
}

impl InMemorySearch<AppointmentFilter> for Appointment {
    fn matches(&self, filter: &AppointmentFilter) -> bool {
        exact_matches(
            self.appointment_date().date_naive(),
            filter.appointment_date,
        ) && text_matches(self.customer_name(), filter.customer_name.as_deref())
            && exact_matches(self.status(), filter.status)
            && exact_matches(self.kind(), filter.kind)
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        let ordering = match field {
            "customer_name" => self.customer_name().cmp(other.customer_name()),
            "event_date" => self.event_date().cmp(&other.event_date()),
            "created_at" => self.created_at().cmp(&other.created_at()),
            _ => self.appointment_date().cmp(&other.appointment_date()),
        };
        ordering.then_with(|| self.id().cmp(&other.id()))
    }

    fn default_order(&self, other: &Self) -> Ordering {
        self.appointment_date()
            .cmp(&other.appointment_date())
            .then_with(|| self.id().cmp(&other.id()))
    }
}

impl InMemorySearch<BookingFilter> for Booking {
    fn matches(&self, filter: &BookingFilter) -> bool {
        text_matches(self.customer_name(), filter.customer_name.as_deref())
            && exact_matches(self.status(), filter.status)
            && exact_matches(self.event_date(), filter.event_date)
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        let ordering = match field {
            "customer_name" => self.customer_name().cmp(other.customer_name()),
            "event_date" => self.event_date().cmp(&other.event_date()),
            "pick_up_date" => self
                .expected_period()
                .pick_up_date()
                .cmp(&other.expected_period().pick_up_date()),
            _ => self.created_at().cmp(&other.created_at()),
        };
        ordering.then_with(|| self.id().cmp(&other.id()))
    }

    fn default_order(&self, other: &Self) -> Ordering {
        other
            .created_at()
            .cmp(&self.created_at())
            .then_with(|| self.id().cmp(&other.id()))
    }
}

/// Ordering on the columns dresses and clutches share.
fn compare_products<P: Product>(left: &P, right: &P, field: &str) -> Ordering {
    let (a, b) = (left.core(), right.core());
    let ordering = match field {
        "color" => a.color().cmp(b.color()),
        "model" => a.model().cmp(b.model()),
        "rent_price" => a.rent_price().cmp(&b.rent_price()),
        _ => a.created_at().cmp(&b.created_at()),
    };
    ordering.then_with(|| a.id().cmp(&b.id()))
}

fn newest_products_first<P: Product>(left: &P, right: &P) -> Ordering {
    let (a, b) = (left.core(), right.core());
    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| a.id().cmp(&b.id()))
}

impl InMemorySearch<DressFilter> for Dress {
    fn matches(&self, filter: &DressFilter) -> bool {
        text_matches(self.core().color(), filter.color.as_deref())
            && text_matches(self.core().model(), filter.model.as_deref())
            && text_matches(self.fabric(), filter.fabric.as_deref())
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        if field == "fabric" {
            return self
                .fabric()
                .cmp(other.fabric())
                .then_with(|| self.core().id().cmp(&other.core().id()));
        }
        compare_products(self, other, field)
    }

    fn default_order(&self, other: &Self) -> Ordering {
        newest_products_first(self, other)
    }
}

impl InMemorySearch<ClutchFilter> for Clutch {
    fn matches(&self, filter: &ClutchFilter) -> bool {
        text_matches(self.core().color(), filter.color.as_deref())
            && text_matches(self.core().model(), filter.model.as_deref())
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        compare_products(self, other, field)
    }

    fn default_order(&self, other: &Self) -> Ordering {
        newest_products_first(self, other)
    }
}
