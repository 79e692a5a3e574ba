//! Inbound webhook payload types.
//!
//! Open WebUI delivers the user identity as a JSON document encoded inside a
//! string field, not as a nested object:
//!
//! ```text
//! { "action": "signup", "message": "...", "user": "{\"name\":\"alice\",\"email\":\"a@x.com\"}" }
//! ```
//!
//! Decoding is therefore two independent passes: [`WebhookEnvelope::decode`]
//! for the outer body, then [`WebhookEnvelope::decode_user`] for the embedded
//! identity. [`WebhookEvent::decode`] runs both.

use serde::{Deserialize, Deserializer, Serialize};

/// The only action that triggers account provisioning.
pub const SIGNUP_ACTION: &str = "signup";

/// Errors produced while decoding a webhook delivery.
///
/// The display text is the exact message returned to the sender.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid request body")]
    InvalidRequestBody(#[source] serde_json::Error),
    #[error("invalid user payload")]
    InvalidUserPayload(#[source] serde_json::Error),
}

/// The outer webhook body as it appears on the wire.
///
/// Missing or `null` fields decode to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default, deserialize_with = "nullable_string")]
    pub action: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub message: String,
    /// JSON-encoded [`WebhookUser`].
    #[serde(default, deserialize_with = "nullable_string")]
    pub user: String,
}

/// Identity of the user who signed up upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookUser {
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
}

/// A fully decoded webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    pub action: String,
    pub message: String,
    pub user: WebhookUser,
}

impl WebhookEnvelope {
    /// Decode the outer request body.
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(body).map_err(DecodeError::InvalidRequestBody)
    }

    /// Decode the string-encoded identity carried in `user`.
    ///
    /// A `null` document yields an empty identity.
    pub fn decode_user(&self) -> Result<WebhookUser, DecodeError> {
        serde_json::from_str::<Option<WebhookUser>>(&self.user)
            .map(Option::unwrap_or_default)
            .map_err(DecodeError::InvalidUserPayload)
    }
}

impl WebhookEvent {
    /// Decode the envelope, then the embedded identity.
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        let envelope = WebhookEnvelope::decode(body)?;
        let user = envelope.decode_user()?;
        Ok(Self {
            action: envelope.action,
            message: envelope.message,
            user,
        })
    }

    pub fn is_signup(&self) -> bool {
        self.action == SIGNUP_ACTION
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
