mod contact;
mod key_record;
mod message;
mod user;
mod vault;

pub use contact::{Contact, ContactWithProfile};
pub use key_record::{KeyRecord, KeySummary, SharedKeySummary};
pub use message::{KeySnapshot, Message};
pub use user::{User, UserProfile};
pub use vault::Vault;
