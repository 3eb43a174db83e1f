/// Protocol-level result of one unsubscribe dispatch. The variants and their
/// reply lines are a contract with the calling transport (SMTP handler or
/// HTTP layer), not user-visible text.
///
/// Alias and contact handlers deliberately report an ownership mismatch as
/// `EntityNotFound`, so that a guessed token cannot reveal whether another
/// account's entity exists. The newsletter and mailto handlers instead keep
/// not-found and unauthorized distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    /// Token header absent, or the token did not decode.
    MalformedToken,
    /// Mail path only: the envelope sender matches no mailbox.
    SenderUnknown,
    /// Target id does not resolve, or resolves to another user's entity.
    EntityNotFound,
    /// Entity exists and is owned correctly, but the claimed acting address
    /// lacks authorization, or the identity check failed.
    Unauthorized,
    /// Mutation performed (or confirmed idempotent) and notifications
    /// dispatched.
    Accepted,
}

impl DispatchStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DispatchStatus::Accepted)
    }

    /// SMTP reply line for the receiving transport.
    pub fn smtp_reply(&self) -> &'static str {
        match self {
            DispatchStatus::Accepted => "250 MM E202",
            DispatchStatus::MalformedToken => "550 MM E507",
            DispatchStatus::EntityNotFound => "550 MM E508",
            DispatchStatus::Unauthorized => "550 MM E509",
            DispatchStatus::SenderUnknown => "550 MM E512",
        }
    }
}
