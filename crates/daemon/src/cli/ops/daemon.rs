use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Args;

use trustvault_daemon::state::{AppState, StateError};
use trustvault_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Address to bind the API server to. The caller header is trusted as-is,
    ///  so only widen this behind an authenticating proxy.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// Directory for log files (default from config, stdout only if unset)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Log level for the service
    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let api_port = self.api_port.unwrap_or(state.config.api_port);

        let config = ServiceConfig {
            listen_addr: SocketAddr::new(self.bind, api_port),
            sqlite_path: Some(state.db_path),
            log_level: self.log_level,
            log_dir: self.log_dir.clone().or(state.config.log_dir),
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
