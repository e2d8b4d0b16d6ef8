use clap::{Args, Subcommand};

use trustvault_daemon::database::models::KeyRecord;
use trustvault_daemon::http_server::api::client::ApiError;
use trustvault_daemon::http_server::api::v0::keys::{
    DeleteKeyRequest, DeleteKeyResponse, GenerateKeyRequest, GenerateKeyResponse, GetKeyRequest,
    GetKeyResponse, ImportKeyRequest, ImportKeyResponse, ListKeysRequest, ListKeysResponse,
    RenameKeyRequest, RenameKeyResponse, ShareKeyRequest, ShareKeyResponse, VerifyKeyRequest,
    VerifyKeyResponse,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Generate, GenerateKeyRequest),
    (Import, ImportKeyRequest),
    (List, ListKeysRequest),
    (Get, GetKeyRequest),
    (Rename, RenameKeyRequest),
    (Delete, DeleteKeyRequest),
    (Share, ShareKeyRequest),
    (Verify, VerifyKeyRequest),
}

pub type KeysCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Keys {
    #[command(subcommand)]
    pub command: KeysCommand,
}

#[async_trait::async_trait]
impl Op for Keys {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeysOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

fn describe(key: &KeyRecord) -> String {
    let mut out = format!(
        "{} (id: {} | kind: {} | created: {})",
        key.name, key.id, key.kind, key.created_at
    );
    if let Some(origin) = key.origin_key_id {
        out.push_str(&format!("\n  shared from key {}", origin));
    }
    out.push_str(&format!("\n{}", key.public_key.trim_end()));
    out
}

#[async_trait::async_trait]
impl Op for GenerateKeyRequest {
    type Error = KeysOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: GenerateKeyResponse = client.call(self.clone()).await?;
        let key = response.key;

        // the private half is only ever returned here
        Ok(format!(
            "Generated key {} (id: {})\n\
             Store the private key now, it will not be shown again.\n\
             {}\n\
             {}",
            key.name,
            key.key_id,
            key.public_key.trim_end(),
            key.private_key.trim_end()
        ))
    }
}

#[async_trait::async_trait]
impl Op for ImportKeyRequest {
    type Error = KeysOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: ImportKeyResponse = client.call(self.clone()).await?;
        Ok(format!("Imported {}", describe(&response.key)))
    }
}

#[async_trait::async_trait]
impl Op for ListKeysRequest {
    type Error = KeysOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: ListKeysResponse = client.call(self.clone()).await?;

        if response.keys.is_empty() {
            return Ok("No keys found".to_string());
        }

        Ok(response
            .keys
            .iter()
            .map(|k| {
                let last_used = k
                    .last_used_at
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "never".to_string());
                format!(
                    "{} (id: {} | kind: {} | last used: {})",
                    k.name, k.id, k.kind, last_used
                )
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[async_trait::async_trait]
impl Op for GetKeyRequest {
    type Error = KeysOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: GetKeyResponse = client.call(self.clone()).await?;
        Ok(describe(&response.key))
    }
}

#[async_trait::async_trait]
impl Op for RenameKeyRequest {
    type Error = KeysOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: RenameKeyResponse = client.call(self.clone()).await?;
        Ok(format!(
            "Renamed key {} to {}",
            response.key.id, response.key.name
        ))
    }
}

#[async_trait::async_trait]
impl Op for DeleteKeyRequest {
    type Error = KeysOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: DeleteKeyResponse = client.call(self.clone()).await?;
        Ok(format!("Deleted key {}", response.key_id))
    }
}

#[async_trait::async_trait]
impl Op for ShareKeyRequest {
    type Error = KeysOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: ShareKeyResponse = client.call(self.clone()).await?;
        Ok(format!(
            "Shared key with {} as {} (id: {})",
            self.contact_id, response.shared_key.name, response.shared_key.id
        ))
    }
}

#[async_trait::async_trait]
impl Op for VerifyKeyRequest {
    type Error = KeysOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response: VerifyKeyResponse = client.call(self.clone()).await?;
        let info = response.info;

        if !info.valid {
            return Ok("Key is not valid".to_string());
        }

        Ok(format!(
            "Key is valid\n\
             - Fingerprint: {}\n\
             - Algorithm: {}\n\
             - User ids: {}",
            info.key_id.as_deref().unwrap_or("-"),
            info.algorithm.as_deref().unwrap_or("-"),
            if info.user_ids.is_empty() {
                "-".to_string()
            } else {
                info.user_ids.join(", ")
            }
        ))
    }
}
