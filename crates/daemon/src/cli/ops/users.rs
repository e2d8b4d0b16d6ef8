use clap::{Args, Subcommand};

use trustvault_daemon::http_server::api::client::ApiError;
use trustvault_daemon::http_server::api::v0::users::{
    RegisterRequest, RegisterResponse, SearchRequest, SearchResponse,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Register, RegisterRequest),
    (Search, SearchRequest),
}

pub type UsersCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Users {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[async_trait::async_trait]
impl Op for Users {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UsersOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for RegisterRequest {
    type Error = UsersOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: RegisterResponse = client.call(self.clone()).await?;

        Ok(format!(
            "Registered {} <{}>\n\
             - User id: {}\n\
             Pass --user {} (or set TRUSTVAULT_USER) to act as this user",
            response.user.username,
            response.user.email,
            response.user.id,
            response.user.id
        ))
    }
}

#[async_trait::async_trait]
impl Op for SearchRequest {
    type Error = UsersOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: SearchResponse = client.call(self.clone()).await?;

        if response.users.is_empty() {
            return Ok("No matching users".to_string());
        }

        Ok(response
            .users
            .iter()
            .map(|u| format!("{} <{}> (id: {})", u.username, u.email, u.id))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
