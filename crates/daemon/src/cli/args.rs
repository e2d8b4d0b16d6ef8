pub use clap::Parser;

use std::path::PathBuf;
use url::Url;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "trustvault")]
#[command(about = "Contact-gated key vault and encrypted messaging")]
pub struct Args {
    /// API server to talk to (defaults to localhost on the configured port)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the trustvault config directory (defaults to ~/.trustvault)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Id of the user to act as
    #[arg(long, global = true, env = "TRUSTVAULT_USER")]
    pub user: Option<Uuid>,

    #[command(subcommand)]
    pub command: crate::Command,
}
