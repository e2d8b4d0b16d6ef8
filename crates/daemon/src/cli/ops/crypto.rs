use clap::{Args, Subcommand};

use trustvault_daemon::http_server::api::client::ApiError;
use trustvault_daemon::http_server::api::v0::crypto::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Encrypt, EncryptRequest),
    (Decrypt, DecryptRequest),
}

pub type CryptoCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Crypto {
    #[command(subcommand)]
    pub command: CryptoCommand,
}

#[async_trait::async_trait]
impl Op for Crypto {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CryptoOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for EncryptRequest {
    type Error = CryptoOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: EncryptResponse = client.call(self.clone()).await?;
        Ok(response.encrypted.ciphertext)
    }
}

#[async_trait::async_trait]
impl Op for DecryptRequest {
    type Error = CryptoOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: DecryptResponse = client.call(self.clone()).await?;
        Ok(response.plaintext)
    }
}
