use clap::{Args, Subcommand};

use trustvault_daemon::http_server::api::client::ApiError;
use trustvault_daemon::http_server::api::v0::messages::{
    HistoryRequest, HistoryResponse, SendMessageRequest, SendMessageResponse,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Send, SendMessageRequest),
    (History, HistoryRequest),
}

pub type MessagesCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Messages {
    #[command(subcommand)]
    pub command: MessagesCommand,
}

#[async_trait::async_trait]
impl Op for Messages {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MessagesOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for SendMessageRequest {
    type Error = MessagesOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: SendMessageResponse = client.call(self.clone()).await?;
        Ok(format!(
            "Sent message {} to {}",
            response.message.id, response.message.receiver_id
        ))
    }
}

#[async_trait::async_trait]
impl Op for HistoryRequest {
    type Error = MessagesOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: HistoryResponse = client.call(self.clone()).await?;

        if response.messages.is_empty() {
            return Ok("No messages".to_string());
        }

        Ok(response
            .messages
            .iter()
            .map(|m| {
                let key = match (&m.key_name, &m.key_version) {
                    (Some(name), Some(version)) => format!(" [{} {}]", name, version),
                    (Some(name), None) => format!(" [{}]", name),
                    _ => String::new(),
                };
                format!(
                    "{} {} -> {}{}\n  {}",
                    m.created_at,
                    m.sender_id,
                    m.receiver_id,
                    key,
                    m.content.trim_end()
                )
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
