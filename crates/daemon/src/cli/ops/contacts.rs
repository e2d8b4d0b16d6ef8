use clap::{Args, Subcommand};

use trustvault_daemon::http_server::api::client::ApiError;
use trustvault_daemon::http_server::api::v0::contacts::{
    ListContactsRequest, ListContactsResponse, RequestContactRequest, RequestContactResponse,
    RespondRequest, RespondResponse,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (List, ListContactsRequest),
    (Request, RequestContactRequest),
    (Respond, RespondRequest),
}

pub type ContactsCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Contacts {
    #[command(subcommand)]
    pub command: ContactsCommand,
}

#[async_trait::async_trait]
impl Op for Contacts {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContactsOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for ListContactsRequest {
    type Error = ContactsOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: ListContactsResponse = client.call(self.clone()).await?;
        let list = response.list;

        let mut lines = Vec::new();

        lines.push(format!("Contacts ({}):", list.contacts.len()));
        for entry in &list.contacts {
            lines.push(format!(
                "  {} <{}> (id: {} | relation: {} | trust: {}{})",
                entry.user.username,
                entry.user.email,
                entry.user.id,
                entry.relation_id,
                entry.trust_level,
                if entry.initiated_by_me {
                    " | you asked"
                } else {
                    ""
                }
            ));
            for key in &entry.shared_keys {
                lines.push(format!("    shared key: {} (id: {})", key.name, key.id));
            }
        }

        lines.push(format!(
            "Pending, awaiting your answer ({}):",
            list.pending_received.len()
        ));
        for entry in &list.pending_received {
            lines.push(format!(
                "  {} <{}> (relation: {})",
                entry.user.username, entry.user.email, entry.relation_id
            ));
        }

        lines.push(format!("Pending, sent by you ({}):", list.pending_sent.len()));
        for entry in &list.pending_sent {
            lines.push(format!(
                "  {} <{}> (relation: {})",
                entry.user.username, entry.user.email, entry.relation_id
            ));
        }

        Ok(lines.join("\n"))
    }
}

#[async_trait::async_trait]
impl Op for RequestContactRequest {
    type Error = ContactsOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: RequestContactResponse = client.call(self.clone()).await?;

        Ok(format!(
            "Contact request sent to {} (relation: {})",
            response.request.contact_id, response.request.id
        ))
    }
}

#[async_trait::async_trait]
impl Op for RespondRequest {
    type Error = ContactsOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: RespondResponse = client.call(self.clone()).await?;

        match response.contact {
            Some(contact) if response.accepted => Ok(format!(
                "Accepted contact request from {} (relation: {})",
                contact.user_id, contact.id
            )),
            _ => Ok(format!("Rejected contact request {}", self.relation_id)),
        }
    }
}
