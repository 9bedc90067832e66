//! Results email: request validation, message composition, and delivery.

pub mod composer;
pub mod request;
pub mod router;
pub mod service;
pub mod transport;

#[cfg(test)]
mod tests;

pub use composer::{compose, MailMessage};
pub use request::{SendResultsRequest, ValidatedRequest, ValidationError};
pub use router::{failure_response, results_router, SEND_RESULTS_PATH};
pub use service::{MailDispatchError, MailReceipt, ResultsMailer};
pub use transport::{DeliveryError, MailTransport, SmtpMailTransport};
