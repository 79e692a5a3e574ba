pub mod response;
pub mod webhook;

pub use response::{Acknowledgement, ErrorBody, Rejection};
pub use webhook::{DecodeError, SIGNUP_ACTION, WebhookEnvelope, WebhookEvent, WebhookUser};
