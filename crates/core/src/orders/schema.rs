//! Order schema validation.
//!
//! Checks an untyped candidate against the order shape and reports every
//! failing field by path, so callers can render precise errors without ever
//! seeing a panic or a serde message.

use std::fmt;

use jiff::Timestamp;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::orders::{
    DownloadToken, EmailAddress, NewOrder, OrderId, OrderItem, OrderStatus, email::is_valid_email,
};

/// Largest total the order store can hold, in minor units.
pub const MAX_STORED_AMOUNT: u64 = i64::MAX.unsigned_abs();

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Required field is absent or null
    #[error("is required")]
    Missing,

    /// Field has the wrong JSON type
    #[error("must be {expected}")]
    WrongType {
        /// Expected JSON type
        expected: &'static str,
    },

    /// Required string is empty
    #[error("must not be empty")]
    Empty,

    /// Not a syntactically valid email address
    #[error("must be a valid email address")]
    InvalidEmail,

    /// Not one of pending, paid, failed
    #[error("must be one of pending, paid, failed")]
    InvalidStatus,

    /// Negative amount
    #[error("must not be negative")]
    Negative,

    /// Fractional or out of range amount
    #[error("must be a whole number of minor units")]
    NotAnInteger,

    /// Larger than the store can hold
    #[error("exceeds the largest storable amount")]
    OutOfRange,

    /// Not an ISO-8601 timestamp
    #[error("must be an ISO-8601 timestamp")]
    InvalidTimestamp,
}

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON path of the field, e.g. `items[0].fontName`
    pub path: String,

    /// Failure reason
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.kind)
    }
}

/// Every field that failed validation, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("order is invalid: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// A single failure at `path`.
    pub fn field(path: impl Into<String>, kind: FieldErrorKind) -> Self {
        let mut errors = Self::default();

        errors.push(path, kind);

        errors
    }

    /// The failing fields.
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// The failure recorded for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&FieldErrorKind> {
        self.0
            .iter()
            .find(|error| error.path == path)
            .map(|error| &error.kind)
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, path: impl Into<String>, kind: FieldErrorKind) {
        self.0.push(FieldError {
            path: path.into(),
            kind,
        });
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Validate an untyped order candidate.
///
/// A missing `status` defaults to pending and a missing `createdAt` is
/// accepted. Unknown fields are ignored.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every field that does not match the
/// order shape.
pub fn validate(candidate: &Value) -> Result<NewOrder, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(object) = candidate.as_object() else {
        errors.push("$", FieldErrorKind::WrongType { expected: "object" });

        return Err(errors);
    };

    let mut fields = Fields {
        object,
        prefix: String::new(),
        errors: &mut errors,
    };

    let id = fields.required_string("id");
    let user_id = fields.required_string("userId");
    let email = fields.email("email");
    let total_cents = fields.stored_amount("totalCents");
    let status = fields.status("status");
    let stripe_payment_intent_id = fields.optional_string("stripePaymentIntentId");
    let stripe_session_id = fields.optional_string("stripeSessionId");
    let download_token = fields.required_string("downloadToken");
    let created_at = fields.timestamp("createdAt");
    let items = fields.items("items", FileUrls::Required);

    match (id, user_id, email, total_cents, download_token, items) {
        (
            Some(id),
            Some(user_id),
            Some(email),
            Some(total_cents),
            Some(download_token),
            Some(items),
        ) if errors.is_empty() => Ok(NewOrder {
            id: OrderId::new(id),
            user_id,
            email,
            items,
            total_cents,
            status,
            stripe_payment_intent_id,
            stripe_session_id,
            download_token: DownloadToken::new(download_token),
            created_at,
        }),
        _ => Err(errors),
    }
}

/// A buyer's submitted selection, checked but not yet priced into an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Buyer identifier
    pub user_id: String,

    /// Buyer email address
    pub email: EmailAddress,

    /// Selected licenses in submission order, repeats included
    pub items: Vec<OrderItem>,

    /// Whether the buyer asked to join the newsletter
    pub subscribe: bool,
}

/// Validate a checkout submission: `userId`, `email`, `items` and an optional
/// `subscribe` flag.
///
/// Items follow the order item shape, except that `salesFileUrls` may be
/// left out. An empty `items` array passes; refusing an empty cart is up to
/// the caller.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every field that does not match.
pub fn validate_selection(candidate: &Value) -> Result<Selection, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(object) = candidate.as_object() else {
        errors.push("$", FieldErrorKind::WrongType { expected: "object" });

        return Err(errors);
    };

    let mut fields = Fields {
        object,
        prefix: String::new(),
        errors: &mut errors,
    };

    let user_id = fields.required_string("userId");
    let email = fields.email("email");
    let items = fields.items("items", FileUrls::Optional);
    let subscribe = fields.optional_bool("subscribe");

    match (user_id, email, items) {
        (Some(user_id), Some(email), Some(items)) if errors.is_empty() => Ok(Selection {
            user_id,
            email,
            items,
            subscribe,
        }),
        _ => Err(errors),
    }
}

/// Run the order schema over an already typed draft.
///
/// Types rule out most failures, leaving the non-empty string constraints.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every empty required field.
pub fn check(order: &NewOrder) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    non_empty(&mut errors, "id", order.id.as_str());
    non_empty(&mut errors, "userId", &order.user_id);
    non_empty(&mut errors, "downloadToken", order.download_token.as_str());

    if order.total_cents > MAX_STORED_AMOUNT {
        errors.push("totalCents", FieldErrorKind::OutOfRange);
    }

    for (index, item) in order.items.iter().enumerate() {
        let prefix = format!("items[{index}].");

        for (name, value) in [
            ("fontId", &item.font_id),
            ("typefaceName", &item.typeface_name),
            ("typefaceSlug", &item.typeface_slug),
            ("studioId", &item.studio_id),
            ("studioSlug", &item.studio_slug),
            ("fontName", &item.font_name),
            ("fullName", &item.full_name),
        ] {
            non_empty(&mut errors, format!("{prefix}{name}"), value);
        }
    }

    errors.into_result(())
}

fn non_empty(errors: &mut ValidationErrors, path: impl Into<String>, value: &str) {
    if value.trim().is_empty() {
        errors.push(path, FieldErrorKind::Empty);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileUrls {
    Required,
    Optional,
}

struct Fields<'a> {
    object: &'a Map<String, Value>,
    prefix: String,
    errors: &'a mut ValidationErrors,
}

impl<'a> Fields<'a> {
    fn path(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|value| !value.is_null())
    }

    fn fail(&mut self, key: &str, kind: FieldErrorKind) {
        let path = self.path(key);

        self.errors.push(path, kind);
    }

    fn required_string(&mut self, key: &str) -> Option<String> {
        match self.present(key) {
            None => {
                self.fail(key, FieldErrorKind::Missing);

                None
            }
            Some(Value::String(value)) if value.trim().is_empty() => {
                self.fail(key, FieldErrorKind::Empty);

                None
            }
            Some(Value::String(value)) => Some(value.clone()),
            Some(_) => {
                self.fail(key, FieldErrorKind::WrongType { expected: "string" });

                None
            }
        }
    }

    fn optional_string(&mut self, key: &str) -> Option<String> {
        match self.present(key) {
            None => None,
            Some(Value::String(value)) => Some(value.clone()),
            Some(_) => {
                self.fail(key, FieldErrorKind::WrongType { expected: "string" });

                None
            }
        }
    }

    fn email(&mut self, key: &str) -> Option<EmailAddress> {
        let value = self.required_string(key)?;

        if is_valid_email(&value) {
            EmailAddress::parse(value).ok()
        } else {
            self.fail(key, FieldErrorKind::InvalidEmail);

            None
        }
    }

    fn amount(&mut self, key: &str) -> Option<u64> {
        let number = match self.present(key) {
            None => {
                self.fail(key, FieldErrorKind::Missing);

                return None;
            }
            Some(Value::Number(number)) => number,
            Some(_) => {
                self.fail(key, FieldErrorKind::WrongType { expected: "number" });

                return None;
            }
        };

        if let Some(amount) = number.as_u64() {
            return Some(amount);
        }

        let negative = number.as_i64().is_some_and(|amount| amount < 0)
            || number.as_f64().is_some_and(|amount| amount < 0.0);

        self.fail(
            key,
            if negative {
                FieldErrorKind::Negative
            } else {
                FieldErrorKind::NotAnInteger
            },
        );

        None
    }

    fn status(&mut self, key: &str) -> OrderStatus {
        match self.present(key) {
            None => OrderStatus::default(),
            Some(Value::String(value)) => value.parse().unwrap_or_else(|_invalid| {
                self.fail(key, FieldErrorKind::InvalidStatus);

                OrderStatus::default()
            }),
            Some(_) => {
                self.fail(key, FieldErrorKind::InvalidStatus);

                OrderStatus::default()
            }
        }
    }

    fn timestamp(&mut self, key: &str) -> Option<Timestamp> {
        match self.present(key) {
            None => None,
            Some(Value::String(value)) => value.parse().map_or_else(
                |_invalid| {
                    self.fail(key, FieldErrorKind::InvalidTimestamp);

                    None
                },
                Some,
            ),
            Some(_) => {
                self.fail(key, FieldErrorKind::WrongType { expected: "string" });

                None
            }
        }
    }

    fn stored_amount(&mut self, key: &str) -> Option<u64> {
        let amount = self.amount(key)?;

        if amount > MAX_STORED_AMOUNT {
            self.fail(key, FieldErrorKind::OutOfRange);

            return None;
        }

        Some(amount)
    }

    fn optional_bool(&mut self, key: &str) -> bool {
        match self.present(key) {
            None => false,
            Some(Value::Bool(value)) => *value,
            Some(_) => {
                self.fail(key, FieldErrorKind::WrongType { expected: "boolean" });

                false
            }
        }
    }

    fn string_list(&mut self, key: &str) -> Option<Vec<String>> {
        let values = match self.present(key) {
            None => {
                self.fail(key, FieldErrorKind::Missing);

                return None;
            }
            Some(Value::Array(values)) => values,
            Some(_) => {
                self.fail(key, FieldErrorKind::WrongType { expected: "array" });

                return None;
            }
        };

        let mut strings = Vec::with_capacity(values.len());

        for (index, value) in values.iter().enumerate() {
            match value {
                Value::String(value) => strings.push(value.clone()),
                _ => self.fail(
                    &format!("{key}[{index}]"),
                    FieldErrorKind::WrongType { expected: "string" },
                ),
            }
        }

        Some(strings)
    }

    fn items(&mut self, key: &str, files: FileUrls) -> Option<Vec<OrderItem>> {
        let values = match self.present(key) {
            None => {
                self.fail(key, FieldErrorKind::Missing);

                return None;
            }
            Some(Value::Array(values)) => values,
            Some(_) => {
                self.fail(key, FieldErrorKind::WrongType { expected: "array" });

                return None;
            }
        };

        let mut items = Vec::with_capacity(values.len());

        for (index, value) in values.iter().enumerate() {
            let item_key = format!("{key}[{index}]");

            let Some(object) = value.as_object() else {
                self.fail(&item_key, FieldErrorKind::WrongType { expected: "object" });

                continue;
            };

            let prefix = format!("{}{item_key}.", self.prefix);

            let mut fields = Fields {
                object,
                prefix,
                errors: &mut *self.errors,
            };

            if let Some(item) = fields.item(files) {
                items.push(item);
            }
        }

        Some(items)
    }

    fn item(&mut self, files: FileUrls) -> Option<OrderItem> {
        let font_id = self.required_string("fontId");
        let typeface_name = self.required_string("typefaceName");
        let typeface_slug = self.required_string("typefaceSlug");
        let studio_id = self.required_string("studioId");
        let studio_slug = self.required_string("studioSlug");
        let font_name = self.required_string("fontName");
        let full_name = self.required_string("fullName");
        let price = self.amount("price");
        let sales_file_urls = match (files, self.present("salesFileUrls")) {
            (FileUrls::Optional, None) => Some(Vec::new()),
            _ => self.string_list("salesFileUrls"),
        };

        Some(OrderItem {
            font_id: font_id?,
            typeface_name: typeface_name?,
            typeface_slug: typeface_slug?,
            studio_id: studio_id?,
            studio_slug: studio_slug?,
            font_name: font_name?,
            full_name: full_name?,
            price: price?,
            sales_file_urls: sales_file_urls?,
        })
    }
}
