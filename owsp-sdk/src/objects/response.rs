//! Response bodies returned to the webhook sender.
//!
//! Three shapes exist on purpose:
//!
//! - [`Acknowledgement`] — `{"status":"success"}` for handled deliveries,
//!   including ignored actions.
//! - [`Rejection`] — `{"success":false,"message":...}`, sent with HTTP 200 for
//!   business rejections the sender must not retry, and with an error status
//!   for processing faults.
//! - [`ErrorBody`] — `{"error":...}` for undecodable deliveries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub status: String,
}

impl Acknowledgement {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub success: bool,
    pub message: String,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shapes() {
        assert_eq!(
            serde_json::to_value(Acknowledgement::success()).unwrap(),
            json!({"status": "success"})
        );
        assert_eq!(
            serde_json::to_value(Rejection::new("email is empty")).unwrap(),
            json!({"success": false, "message": "email is empty"})
        );
        assert_eq!(
            serde_json::to_value(ErrorBody::new("invalid request body")).unwrap(),
            json!({"error": "invalid request body"})
        );
    }
}
