pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Contacts, Crypto, Daemon, Init, Keys, Messages, Users, Version};
