use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// The closed set of actions an unsubscribe token can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsubscribeAction {
    DisableAlias,
    DisableContact,
    UnsubscribeNewsletter,
    OriginalUnsubscribeMailto,
}

/// Action tag plus its payload, fixed at encode time. The payload shape is
/// fully determined by the tag; a token whose payload does not match its tag
/// fails to decode.
///
/// Routing matches on this type exhaustively, so an unknown action cannot
/// reach a handler: the decode step is the only place garbled input is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "act", rename_all = "kebab-case")]
pub enum UnsubscribeData {
    DisableAlias {
        #[serde(rename = "aid")]
        alias_id: i64,
    },
    DisableContact {
        #[serde(rename = "cid")]
        contact_id: i64,
    },
    UnsubscribeNewsletter {
        #[serde(rename = "uid")]
        user_id: i64,
    },
    /// Pass-through for providers that expect a plain mailto unsubscribe
    /// reply instead of the token scheme.
    OriginalUnsubscribeMailto {
        #[serde(rename = "aid")]
        alias_id: i64,
        #[serde(rename = "rcpt")]
        recipient: String,
        #[serde(rename = "subj")]
        subject: String,
    },
}

impl UnsubscribeData {
    pub fn action(&self) -> UnsubscribeAction {
        match self {
            UnsubscribeData::DisableAlias { .. } => UnsubscribeAction::DisableAlias,
            UnsubscribeData::DisableContact { .. } => UnsubscribeAction::DisableContact,
            UnsubscribeData::UnsubscribeNewsletter { .. } => {
                UnsubscribeAction::UnsubscribeNewsletter
            }
            UnsubscribeData::OriginalUnsubscribeMailto { .. } => {
                UnsubscribeAction::OriginalUnsubscribeMailto
            }
        }
    }
}

/// Token codec. A successfully decoded token is trusted to have been produced
/// by this system for the embedded payload; any corrupted, tampered or
/// expired input decodes to `None`.
pub trait UnsubscribeEncoder: Send + Sync {
    fn encode(&self, data: &UnsubscribeData) -> String;
    fn decode(&self, token: &str) -> Option<UnsubscribeData>;
}

#[derive(Serialize, Deserialize)]
struct TokenClaims {
    exp: u64,
    #[serde(flatten)]
    data: UnsubscribeData,
}

/// HS256 JWT codec with an expiry claim.
pub struct JwtUnsubscribeEncoder {
    secret_key: Vec<u8>,
    validity: Duration,
}

impl JwtUnsubscribeEncoder {
    pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(60 * 60 * 24 * 30);

    pub fn new(secret_key: Vec<u8>) -> Self {
        Self::with_validity(secret_key, Self::DEFAULT_VALIDITY)
    }

    pub fn with_validity(secret_key: Vec<u8>, validity: Duration) -> Self {
        Self {
            secret_key,
            validity,
        }
    }
}

impl UnsubscribeEncoder for JwtUnsubscribeEncoder {
    fn encode(&self, data: &UnsubscribeData) -> String {
        let claims = TokenClaims {
            exp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs()
                + self.validity.as_secs(),
            data: data.clone(),
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret_key),
        )
        .unwrap()
    }

    fn decode(&self, token: &str) -> Option<UnsubscribeData> {
        match jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(&self.secret_key),
            &Validation::default(),
        ) {
            Ok(token) => Some(token.claims.data),
            Err(error) => {
                debug!(%error, "Failed to decode unsubscribe token");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unsubscribe-test-secret";

    fn encoder() -> JwtUnsubscribeEncoder {
        JwtUnsubscribeEncoder::new(SECRET.to_vec())
    }

    #[test]
    fn round_trip_every_action() {
        let encoder = encoder();
        let payloads = [
            UnsubscribeData::DisableAlias { alias_id: 42 },
            UnsubscribeData::DisableContact { contact_id: 5 },
            UnsubscribeData::UnsubscribeNewsletter { user_id: 7 },
            UnsubscribeData::OriginalUnsubscribeMailto {
                alias_id: 42,
                recipient: "list@shop.example".to_string(),
                subject: "unsubscribe 123".to_string(),
            },
        ];

        for payload in payloads {
            let token = encoder.encode(&payload);
            assert_eq!(encoder.decode(&token), Some(payload));
        }
    }

    #[test]
    fn garbage_decodes_to_none() {
        let encoder = encoder();
        assert_eq!(encoder.decode(""), None);
        assert_eq!(encoder.decode("not-a-token"), None);
        assert_eq!(encoder.decode("a.b.c"), None);
    }

    #[test]
    fn tampered_token_decodes_to_none() {
        let encoder = encoder();
        let token = encoder.encode(&UnsubscribeData::DisableAlias { alias_id: 42 });

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert_eq!(encoder.decode(&tampered), None);
    }

    #[test]
    fn token_signed_with_other_key_decodes_to_none() {
        let other = JwtUnsubscribeEncoder::new(b"other-secret".to_vec());
        let token = other.encode(&UnsubscribeData::UnsubscribeNewsletter { user_id: 7 });
        assert_eq!(encoder().decode(&token), None);
    }

    #[test]
    fn expired_token_decodes_to_none() {
        #[derive(Serialize)]
        struct Expired {
            exp: u64,
            act: &'static str,
            aid: i64,
        }

        let token = jsonwebtoken::encode(
            &Header::default(),
            &Expired {
                exp: 1,
                act: "disable-alias",
                aid: 42,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(encoder().decode(&token), None);
    }

    #[test]
    fn payload_not_matching_tag_decodes_to_none() {
        #[derive(Serialize)]
        struct WrongShape {
            exp: u64,
            act: &'static str,
            // disable-alias expects `aid`, not `cid`
            cid: i64,
        }

        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;
        let token = jsonwebtoken::encode(
            &Header::default(),
            &WrongShape {
                exp,
                act: "disable-alias",
                cid: 5,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(encoder().decode(&token), None);
    }

    #[test]
    fn data_projects_its_action() {
        assert_eq!(
            UnsubscribeData::DisableContact { contact_id: 5 }.action(),
            UnsubscribeAction::DisableContact
        );
        assert_eq!(
            UnsubscribeData::OriginalUnsubscribeMailto {
                alias_id: 1,
                recipient: String::new(),
                subject: String::new(),
            }
            .action(),
            UnsubscribeAction::OriginalUnsubscribeMailto
        );
    }
}
