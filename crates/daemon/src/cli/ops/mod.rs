pub mod contacts;
pub mod crypto;
pub mod daemon;
pub mod init;
pub mod keys;
pub mod messages;
pub mod users;
pub mod version;

pub use contacts::Contacts;
pub use crypto::Crypto;
pub use daemon::Daemon;
pub use init::Init;
pub use keys::Keys;
pub use messages::Messages;
pub use users::Users;
pub use version::Version;
