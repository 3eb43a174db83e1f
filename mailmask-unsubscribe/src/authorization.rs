use mailmask_core::model::Alias;
use tracing::debug;

/// Whether `address` may trigger unsubscribe actions against `alias`: it must
/// be the address of one of the alias's mailboxes, or one of a mailbox's
/// extra authorized addresses.
///
/// Exact string comparison, no normalization at this layer; addresses are
/// normalized before records reach the store. Only used on the mail path; an
/// authenticated web request already proves identity.
pub fn is_email_authorized_for_alias(address: &str, alias: &Alias) -> bool {
    for mailbox in &alias.mailboxes {
        if mailbox.email == address {
            return true;
        }
        if mailbox.authorized_addresses.iter().any(|a| a == address) {
            debug!(
                alias_id = alias.id,
                mailbox_id = mailbox.id,
                address,
                "Sender matched an authorized address"
            );
            return true;
        }
    }

    debug!(alias_id = alias.id, address, "Address is not authorized for alias");
    false
}
