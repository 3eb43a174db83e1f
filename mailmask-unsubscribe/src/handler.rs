use crate::authorization::is_email_authorized_for_alias;
use crate::encoder::{UnsubscribeData, UnsubscribeEncoder};
use crate::status::DispatchStatus;
use mailmask_core::error::EngineError;
use mailmask_core::mailer::{Mailer, OutboundEmail};
use mailmask_core::message::{headers, Envelope, InboundMessage};
use mailmask_core::model::{Mailbox, User};
use mailmask_core::store::Store;
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// The party triggering an unsubscribe, with its proof of identity.
///
/// On the mail path identity is only claimed via the envelope sender, so the
/// claimed address must additionally pass the per-alias authorization check.
/// On the web path the surrounding HTTP layer has already authenticated the
/// user and that check is skipped.
#[derive(Debug, Clone)]
pub enum Actor {
    Mailbox {
        user: User,
        mailbox: Mailbox,
        address: String,
    },
    Authenticated {
        user: User,
    },
}

impl Actor {
    fn user(&self) -> &User {
        match self {
            Actor::Mailbox { user, .. } => user,
            Actor::Authenticated { user } => user,
        }
    }

    /// Address that must pass the authorization check, `None` on the
    /// authenticated path.
    fn authorizing_address(&self) -> Option<&str> {
        match self {
            Actor::Mailbox { address, .. } => Some(address),
            Actor::Authenticated { .. } => None,
        }
    }
}

/// Outcome of a request-triggered dispatch. `data` carries the decoded
/// payload when the action was accepted, so the caller can log or correlate
/// it.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub status: DispatchStatus,
    pub data: Option<UnsubscribeData>,
}

/// Decodes unsubscribe tokens, authorizes the presenting party and routes to
/// the matching action handler.
pub struct UnsubscribeHandler {
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    encoder: Arc<dyn UnsubscribeEncoder>,
    base_url: Url,
}

impl UnsubscribeHandler {
    pub fn new(
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        encoder: Arc<dyn UnsubscribeEncoder>,
        base_url: Url,
    ) -> Self {
        Self {
            store,
            mailer,
            encoder,
            base_url,
        }
    }

    /// Message-triggered entry point: a reply-to-unsubscribe message carrying
    /// the token as its subject.
    pub async fn handle_message(
        &self,
        envelope: &Envelope,
        message: &InboundMessage,
    ) -> Result<DispatchStatus, EngineError> {
        let subject = message.header(headers::SUBJECT);
        let Some(data) = subject.and_then(|token| self.encoder.decode(token)) else {
            warn!(subject, "Inbound unsubscribe with missing or malformed token");
            return Ok(DispatchStatus::MalformedToken);
        };

        let Some(mailbox) = self
            .store
            .get_mailbox_by_address(&envelope.mail_from)
            .await?
        else {
            warn!(mail_from = %envelope.mail_from, "Unsubscribe sender matches no mailbox");
            return Ok(DispatchStatus::SenderUnknown);
        };
        let user = self
            .store
            .get_user(mailbox.user_id)
            .await?
            .ok_or(EngineError::UserNotFound(mailbox.user_id))?;

        let actor = Actor::Mailbox {
            user,
            mailbox,
            address: envelope.mail_from.clone(),
        };
        self.dispatch(data, &actor).await
    }

    /// Request-triggered entry point: the caller has already authenticated
    /// `user`, so the mailbox-level authorization check is skipped.
    pub async fn handle_request(
        &self,
        user: &User,
        token: &str,
    ) -> Result<RequestOutcome, EngineError> {
        let Some(data) = self.encoder.decode(token) else {
            warn!(user_id = user.id, "Malformed unsubscribe token in request");
            return Ok(RequestOutcome {
                status: DispatchStatus::MalformedToken,
                data: None,
            });
        };

        let actor = Actor::Authenticated { user: user.clone() };
        let status = self.dispatch(data.clone(), &actor).await?;
        Ok(RequestOutcome {
            status,
            data: status.is_accepted().then_some(data),
        })
    }

    async fn dispatch(
        &self,
        data: UnsubscribeData,
        actor: &Actor,
    ) -> Result<DispatchStatus, EngineError> {
        match data {
            UnsubscribeData::DisableAlias { alias_id } => {
                self.disable_alias(alias_id, actor).await
            }
            UnsubscribeData::DisableContact { contact_id } => {
                self.disable_contact(contact_id, actor).await
            }
            UnsubscribeData::UnsubscribeNewsletter { user_id } => {
                self.unsubscribe_newsletter(user_id, actor).await
            }
            UnsubscribeData::OriginalUnsubscribeMailto {
                alias_id,
                recipient,
                subject,
            } => {
                self.original_unsubscribe_mailto(alias_id, &recipient, &subject, actor)
                    .await
            }
        }
    }

    async fn disable_alias(
        &self,
        alias_id: i64,
        actor: &Actor,
    ) -> Result<DispatchStatus, EngineError> {
        let Some(alias) = self.store.get_alias(alias_id).await? else {
            return Ok(DispatchStatus::EntityNotFound);
        };
        // Ownership mismatch reads like not-found, so a guessed token cannot
        // probe other accounts' aliases.
        if alias.user_id != actor.user().id {
            warn!(
                alias_id,
                user_id = actor.user().id,
                "Alias does not belong to the acting user"
            );
            return Ok(DispatchStatus::EntityNotFound);
        }
        if let Some(address) = actor.authorizing_address() {
            if !is_email_authorized_for_alias(address, &alias) {
                warn!(alias_id, address, "Address may not disable this alias");
                return Ok(DispatchStatus::Unauthorized);
            }
        }

        self.store.set_alias_enabled(alias.id, false).await?;
        self.store.commit().await?;

        let enable_url = self.dashboard_url(&format!("dashboard/?highlight_alias_id={}", alias.id));
        for mailbox in &alias.mailboxes {
            self.mailer
                .send(OutboundEmail {
                    to: mailbox.email.clone(),
                    from: None,
                    subject: format!("Alias {} has been disabled", alias.email),
                    body_text: format!(
                        "The alias {} has been disabled. Emails sent to it will now be refused.\n\n\
                         To enable it again, visit {}",
                        alias.email, enable_url
                    ),
                    body_html: Some(format!(
                        "<p>The alias <b>{}</b> has been disabled. Emails sent to it will now be refused.</p>\
                         <p><a href=\"{}\">Enable {}</a></p>",
                        alias.email, enable_url, alias.email
                    )),
                })
                .await?;
        }
        Ok(DispatchStatus::Accepted)
    }

    async fn disable_contact(
        &self,
        contact_id: i64,
        actor: &Actor,
    ) -> Result<DispatchStatus, EngineError> {
        let Some(contact) = self.store.get_contact(contact_id).await? else {
            return Ok(DispatchStatus::EntityNotFound);
        };
        if contact.user_id != actor.user().id {
            warn!(
                contact_id,
                user_id = actor.user().id,
                "Contact does not belong to the acting user"
            );
            return Ok(DispatchStatus::EntityNotFound);
        }
        // Authorization is checked against the contact's parent alias.
        let alias = self
            .store
            .get_alias(contact.alias_id)
            .await?
            .ok_or(EngineError::AliasNotFound(contact.alias_id))?;
        if let Some(address) = actor.authorizing_address() {
            if !is_email_authorized_for_alias(address, &alias) {
                warn!(contact_id, address, "Address may not block this contact");
                return Ok(DispatchStatus::Unauthorized);
            }
        }

        self.store
            .set_contact_block_forward(contact.id, true)
            .await?;
        self.store.commit().await?;

        let unblock_url = self.dashboard_url(&format!(
            "dashboard/alias_contact_manager/{}?highlight_contact_id={}",
            alias.id, contact.id
        ));
        for mailbox in &alias.mailboxes {
            self.mailer
                .send(OutboundEmail {
                    to: mailbox.email.clone(),
                    from: None,
                    subject: format!(
                        "Emails from {} to {} are now blocked",
                        contact.website_email, alias.email
                    ),
                    body_text: format!(
                        "Emails from {} to {} will no longer be forwarded.\n\n\
                         To unblock this contact, visit {}",
                        contact.website_email, alias.email, unblock_url
                    ),
                    body_html: None,
                })
                .await?;
        }
        Ok(DispatchStatus::Accepted)
    }

    async fn unsubscribe_newsletter(
        &self,
        user_id: i64,
        actor: &Actor,
    ) -> Result<DispatchStatus, EngineError> {
        let Some(target) = self.store.get_user(user_id).await? else {
            warn!(user_id, "No such user");
            return Ok(DispatchStatus::EntityNotFound);
        };
        // No mailbox-level authorization exists for this action; the only
        // check is identity equality, and the two failures stay distinct.
        if target.id != actor.user().id {
            warn!(
                target_user_id = user_id,
                user_id = actor.user().id,
                "Newsletter unsubscribe for another user"
            );
            return Ok(DispatchStatus::Unauthorized);
        }

        self.store.set_user_notification(target.id, false).await?;
        self.store.commit().await?;

        self.mailer
            .send(OutboundEmail {
                to: target.email.clone(),
                from: None,
                subject: "You have been unsubscribed from the MailMask newsletter".to_string(),
                body_text: "You will no longer receive the MailMask newsletter. \
                            You can opt back in from your account settings."
                    .to_string(),
                body_html: Some(
                    "<p>You will no longer receive the MailMask newsletter. \
                     You can opt back in from your account settings.</p>"
                        .to_string(),
                ),
            })
            .await?;
        Ok(DispatchStatus::Accepted)
    }

    /// Legacy pass-through for providers expecting a plain mailto reply: an
    /// empty message with the original subject, sent as the alias. No store
    /// mutation happens here.
    async fn original_unsubscribe_mailto(
        &self,
        alias_id: i64,
        recipient: &str,
        subject: &str,
        actor: &Actor,
    ) -> Result<DispatchStatus, EngineError> {
        let Some(alias) = self.store.get_alias(alias_id).await? else {
            return Ok(DispatchStatus::EntityNotFound);
        };
        if alias.user_id != actor.user().id {
            warn!(
                alias_id,
                user_id = actor.user().id,
                "Mailto unsubscribe for another user's alias"
            );
            return Ok(DispatchStatus::Unauthorized);
        }

        self.mailer
            .send(OutboundEmail {
                to: recipient.to_string(),
                from: Some(alias.email.clone()),
                subject: subject.to_string(),
                body_text: String::new(),
                body_html: None,
            })
            .await?;
        Ok(DispatchStatus::Accepted)
    }

    fn dashboard_url(&self, path_and_query: &str) -> Url {
        // Relative join: the path is built from entity ids only, so it is
        // always a valid reference.
        self.base_url.join(path_and_query).unwrap()
    }
}
