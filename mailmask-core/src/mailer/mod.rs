pub mod memory;

use crate::error::EngineError;
use async_trait::async_trait;

/// A single outbound transactional email.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    /// Visible sender identity. `None` lets the transport use the service
    /// default sender.
    pub from: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

/// Outbound mail submission. Templating and delivery live behind this seam;
/// a failed send aborts the remaining notifications of the current dispatch
/// but never rolls back an already-committed store write.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), EngineError>;
}
