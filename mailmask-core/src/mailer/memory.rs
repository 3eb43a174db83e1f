use crate::error::EngineError;
use crate::mailer::{Mailer, OutboundEmail};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::debug;

/// Recording [`Mailer`] for tests. Can be switched into a failing mode to
/// exercise partial-failure paths after the commit boundary.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    failing: AtomicBool,
}

impl MemoryMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), EngineError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EngineError::Mailer("smtp submission refused".into()));
        }
        debug!(to = %email.to, subject = %email.subject, "Recorded outbound email");
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}
