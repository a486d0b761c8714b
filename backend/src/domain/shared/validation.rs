//! Explicit field validation rules for aggregates.
//!
//! Each aggregate builds one [`ValidationRules`] registry (usually behind a
//! `LazyLock`) mapping field names to ordered predicates. Running the
//! registry never fails; it records messages into a [`Notification`] and the
//! caller decides whether to abort.

use super::Notification;

/// A pure predicate paired with the message recorded when it fails.
pub struct Rule<T> {
    message: &'static str,
    check: fn(&T) -> bool,
}

impl<T> Rule<T> {
    /// Rule that passes when `check` returns `true`.
    #[must_use]
    pub const fn new(message: &'static str, check: fn(&T) -> bool) -> Self {
        Self { message, check }
    }

    /// Message recorded on failure.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }

    fn passes(&self, target: &T) -> bool {
        (self.check)(target)
    }
}

struct FieldRules<T> {
    field: &'static str,
    rules: Vec<Rule<T>>,
}

/// Ordered `field -> [rule]` registry for one aggregate type.
///
/// # Examples
/// ```
/// use atelier::domain::{Notification, Rule, ValidationRules};
///
/// struct Fitting {
///     customer_name: String,
/// }
///
/// let rules = ValidationRules::new().field(
///     "customer_name",
///     [Rule::new("Customer name is required", |f: &Fitting| {
///         !f.customer_name.trim().is_empty()
///     })],
/// );
///
/// let mut notification = Notification::new();
/// rules.validate(&Fitting { customer_name: " ".into() }, &mut notification, None);
/// assert_eq!(notification.field_errors("customer_name"), ["Customer name is required"]);
/// ```
pub struct ValidationRules<T> {
    fields: Vec<FieldRules<T>>,
}

impl<T> Default for ValidationRules<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> ValidationRules<T> {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rules for `field`, keeping registration order.
    #[must_use]
    pub fn field(mut self, field: &'static str, rules: impl IntoIterator<Item = Rule<T>>) -> Self {
        let rules = rules.into_iter();
        match self.fields.iter_mut().find(|entry| entry.field == field) {
            Some(existing) => existing.rules.extend(rules),
            None => self.fields.push(FieldRules {
                field,
                rules: rules.collect(),
            }),
        }
        self
    }

    /// Registered field names in order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|entry| entry.field)
    }

    /// Run every rule when `only` is `None`, otherwise just the named fields.
    pub fn validate(&self, target: &T, notification: &mut Notification, only: Option<&[&str]>) {
        let selected = self
            .fields
            .iter()
            .filter(|entry| only.is_none_or(|names| names.contains(&entry.field)));
        for entry in selected {
            for rule in entry.rules.iter().filter(|rule| !rule.passes(target)) {
                notification.add_error(rule.message(), Some(entry.field));
            }
        }
    }

    /// Convenience wrapper returning a fresh notification.
    #[must_use]
    pub fn check(&self, target: &T, only: Option<&[&str]>) -> Notification {
        let mut notification = Notification::new();
        self.validate(target, &mut notification, only);
        notification
    }
}

/// True when `value` has visible characters.
#[must_use]
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// True when `value` has at most `max` characters.
#[must_use]
pub fn max_chars(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    struct Gown {
        color: String,
        price: i64,
    }

    #[fixture]
    fn rules() -> ValidationRules<Gown> {
        ValidationRules::new()
            .field(
                "color",
                [
                    Rule::new("Color is required", |g: &Gown| is_present(&g.color)),
                    Rule::new("Color is too long", |g: &Gown| max_chars(&g.color, 5)),
                ],
            )
            .field(
                "price",
                [Rule::new("Price must be positive", |g: &Gown| g.price > 0)],
            )
    }

    #[rstest]
    fn all_fields_run_without_filter(rules: ValidationRules<Gown>) {
        let gown = Gown {
            color: String::new(),
            price: 0,
        };
        let notification = rules.check(&gown, None);
        assert_eq!(notification.field_errors("color"), ["Color is required"]);
        assert_eq!(notification.field_errors("price"), ["Price must be positive"]);
    }

    #[rstest]
    fn only_named_fields_run(rules: ValidationRules<Gown>) {
        let gown = Gown {
            color: "turquoise".to_owned(),
            price: 0,
        };
        let notification = rules.check(&gown, Some(&["color"]));
        assert_eq!(notification.field_errors("color"), ["Color is too long"]);
        assert!(notification.field_errors("price").is_empty());
    }

    #[rstest]
    fn field_registration_order_is_kept(rules: ValidationRules<Gown>) {
        assert_eq!(rules.fields().collect::<Vec<_>>(), ["color", "price"]);
    }

    #[rstest]
    fn valid_target_records_nothing(rules: ValidationRules<Gown>) {
        let gown = Gown {
            color: "azul".to_owned(),
            price: 100,
        };
        assert!(!rules.check(&gown, None).has_errors());
    }
}
