//! Orders
//!
//! The order record, its schema and the download token issued with it.

mod email;
mod id;
mod model;
mod payment;
pub mod schema;
mod status;
mod token;

pub use email::{EmailAddress, EmailAddressError, is_valid_email};
pub use id::OrderId;
pub use model::{NewOrder, Order, OrderItem};
pub use payment::PaymentEvent;
pub use schema::{
    FieldError, FieldErrorKind, MAX_STORED_AMOUNT, Selection, ValidationErrors, check, validate,
    validate_selection,
};
pub use status::{OrderStatus, OrderStatusError};
pub use token::{DOWNLOAD_TOKEN_BYTES, DownloadToken};
