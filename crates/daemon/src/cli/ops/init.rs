use std::path::PathBuf;

use clap::Args;

use trustvault_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port the API server will listen on
    #[arg(long, default_value_t = 5080)]
    pub api_port: u16,

    /// Directory for rolling log files (stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_port: self.api_port,
            log_dir: self.log_dir.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let log_dir = match &state.config.log_dir {
            Some(dir) => dir.display().to_string(),
            None => "stdout only".to_string(),
        };

        Ok(format!(
            "Initialized trustvault directory at: {}\n\
             - Database: {}\n\
             - Config: {}\n\
             - API port: {}\n\
             - Logs: {}",
            state.app_dir.display(),
            state.db_path.display(),
            state.config_path.display(),
            state.config.api_port,
            log_dir
        ))
    }
}
