pub mod memory;

use crate::error::EngineError;
use crate::model::{Alias, Contact, Mailbox, User};
use async_trait::async_trait;

/// Persistent records behind the engine. Lookups return snapshots;
/// mutations are single-record writes that become durable at [`commit`].
///
/// An id-based lookup never implies ownership: callers must check that the
/// returned entity belongs to the acting user before mutating it.
///
/// [`commit`]: Store::commit
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_alias(&self, id: i64) -> Result<Option<Alias>, EngineError>;

    async fn get_contact(&self, id: i64) -> Result<Option<Contact>, EngineError>;

    async fn get_user(&self, id: i64) -> Result<Option<User>, EngineError>;

    /// Resolves an address to the mailbox it may act as: the mailbox's own
    /// address, or one of its authorized addresses. Exact string match; any
    /// normalization happens before records reach the store.
    async fn get_mailbox_by_address(
        &self,
        address: &str,
    ) -> Result<Option<Mailbox>, EngineError>;

    async fn set_alias_enabled(&self, alias_id: i64, enabled: bool) -> Result<(), EngineError>;

    async fn set_contact_block_forward(
        &self,
        contact_id: i64,
        block: bool,
    ) -> Result<(), EngineError>;

    async fn set_user_notification(
        &self,
        user_id: i64,
        notification: bool,
    ) -> Result<(), EngineError>;

    /// Durably applies the pending writes of this unit of work.
    async fn commit(&self) -> Result<(), EngineError>;
}
