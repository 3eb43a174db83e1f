/// Header names the receiving transport hands over verbatim.
pub mod headers {
    /// Reply-to-unsubscribe messages carry the action token as their subject.
    pub const SUBJECT: &str = "Subject";
}

/// SMTP envelope of an inbound message, as seen by the receiving transport.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub mail_from: String,
    pub rcpt_tos: Vec<String>,
}

impl Envelope {
    pub fn new(mail_from: impl Into<String>, rcpt_tos: Vec<String>) -> Self {
        Self {
            mail_from: mail_from.into(),
            rcpt_tos,
        }
    }
}

/// Header view of an inbound message. The engine never needs the body.
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    headers: Vec<(String, String)>,
}

impl InboundMessage {
    pub fn new(headers: Vec<(String, String)>) -> Self {
        Self { headers }
    }

    /// First occurrence of `name`, compared ASCII case-insensitively as
    /// header names are on the wire.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let message = InboundMessage::new(vec![
            ("subject".to_string(), "token-value".to_string()),
            ("Subject".to_string(), "second".to_string()),
        ]);
        assert_eq!(message.header(headers::SUBJECT), Some("token-value"));
        assert_eq!(message.header("SUBJECT"), Some("token-value"));
        assert_eq!(message.header("From"), None);
    }
}
