use serde::{Deserialize, Serialize};

/// Account owning aliases and mailboxes. `notification` is the newsletter
/// opt-in flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub notification: bool,
}

/// A real destination address receiving mail forwarded through one or more
/// aliases. `authorized_addresses` are extra addresses permitted to act on
/// the mailbox's behalf without being its own address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub authorized_addresses: Vec<String>,
}

/// Snapshot of a forwarding address, with its attached mailboxes
/// materialized. Disabling an alias makes the service refuse mail sent to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub enabled: bool,
    pub mailboxes: Vec<Mailbox>,
}

/// A remembered external correspondent of a specific alias. When
/// `block_forward` is set, mail from `website_email` is no longer forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub alias_id: i64,
    pub website_email: String,
    pub block_forward: bool,
}
