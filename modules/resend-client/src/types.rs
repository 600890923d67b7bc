use serde::{Deserialize, Serialize};

/// Payload for `POST /emails`. Plain-text only; the notification body is
/// preformatted by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SendResponse {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_email_serializes_expected_shape() {
        let email = OutboundEmail {
            from: "watch@example.com".into(),
            to: vec!["ops@example.com".into()],
            subject: "subject".into(),
            text: "body".into(),
        };
        let value = serde_json::to_value(&email).unwrap();
        assert_eq!(value["from"], "watch@example.com");
        assert_eq!(value["to"][0], "ops@example.com");
        assert_eq!(value["text"], "body");
    }
}
