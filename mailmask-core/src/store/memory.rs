use crate::error::EngineError;
use crate::model::{Alias, Contact, Mailbox, User};
use crate::store::Store;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Clone)]
struct AliasRecord {
    user_id: i64,
    email: String,
    enabled: bool,
    mailbox_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
enum Write {
    AliasEnabled { alias_id: i64, enabled: bool },
    ContactBlockForward { contact_id: i64, block: bool },
    UserNotification { user_id: i64, notification: bool },
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<i64, User>,
    mailboxes: HashMap<i64, Mailbox>,
    aliases: HashMap<i64, AliasRecord>,
    contacts: HashMap<i64, Contact>,
    pending: Vec<Write>,
}

/// In-memory [`Store`] used for tests and local wiring. Mutations are staged
/// and only become visible at [`Store::commit`], mirroring the commit
/// boundary of a database-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn add_user(&self, user: User) {
        self.inner.write().unwrap().users.insert(user.id, user);
    }

    pub fn add_mailbox(&self, mailbox: Mailbox) {
        self.inner
            .write()
            .unwrap()
            .mailboxes
            .insert(mailbox.id, mailbox);
    }

    pub fn add_alias(&self, id: i64, user_id: i64, email: &str, mailbox_ids: &[i64]) {
        self.inner.write().unwrap().aliases.insert(
            id,
            AliasRecord {
                user_id,
                email: email.to_string(),
                enabled: true,
                mailbox_ids: mailbox_ids.to_vec(),
            },
        );
    }

    pub fn add_contact(&self, contact: Contact) {
        self.inner
            .write()
            .unwrap()
            .contacts
            .insert(contact.id, contact);
    }
}

impl Inner {
    fn materialize_alias(&self, id: i64, record: &AliasRecord) -> Alias {
        Alias {
            id,
            user_id: record.user_id,
            email: record.email.clone(),
            enabled: record.enabled,
            mailboxes: record
                .mailbox_ids
                .iter()
                .filter_map(|mailbox_id| self.mailboxes.get(mailbox_id).cloned())
                .collect(),
        }
    }

    fn apply(&mut self, write: Write) -> Result<(), EngineError> {
        match write {
            Write::AliasEnabled { alias_id, enabled } => {
                let record = self
                    .aliases
                    .get_mut(&alias_id)
                    .ok_or(EngineError::AliasNotFound(alias_id))?;
                record.enabled = enabled;
            }
            Write::ContactBlockForward { contact_id, block } => {
                let contact = self
                    .contacts
                    .get_mut(&contact_id)
                    .ok_or(EngineError::ContactNotFound(contact_id))?;
                contact.block_forward = block;
            }
            Write::UserNotification {
                user_id,
                notification,
            } => {
                let user = self
                    .users
                    .get_mut(&user_id)
                    .ok_or(EngineError::UserNotFound(user_id))?;
                user.notification = notification;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_alias(&self, id: i64) -> Result<Option<Alias>, EngineError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .aliases
            .get(&id)
            .map(|record| inner.materialize_alias(id, record)))
    }

    async fn get_contact(&self, id: i64) -> Result<Option<Contact>, EngineError> {
        Ok(self.inner.read().unwrap().contacts.get(&id).cloned())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, EngineError> {
        Ok(self.inner.read().unwrap().users.get(&id).cloned())
    }

    async fn get_mailbox_by_address(
        &self,
        address: &str,
    ) -> Result<Option<Mailbox>, EngineError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .mailboxes
            .values()
            .find(|mailbox| {
                mailbox.email == address
                    || mailbox.authorized_addresses.iter().any(|a| a == address)
            })
            .cloned())
    }

    async fn set_alias_enabled(&self, alias_id: i64, enabled: bool) -> Result<(), EngineError> {
        self.inner
            .write()
            .unwrap()
            .pending
            .push(Write::AliasEnabled { alias_id, enabled });
        Ok(())
    }

    async fn set_contact_block_forward(
        &self,
        contact_id: i64,
        block: bool,
    ) -> Result<(), EngineError> {
        self.inner
            .write()
            .unwrap()
            .pending
            .push(Write::ContactBlockForward { contact_id, block });
        Ok(())
    }

    async fn set_user_notification(
        &self,
        user_id: i64,
        notification: bool,
    ) -> Result<(), EngineError> {
        self.inner
            .write()
            .unwrap()
            .pending
            .push(Write::UserNotification {
                user_id,
                notification,
            });
        Ok(())
    }

    async fn commit(&self) -> Result<(), EngineError> {
        let mut inner = self.inner.write().unwrap();
        for write in std::mem::take(&mut inner.pending) {
            inner.apply(write)?;
        }
        Ok(())
    }
}
