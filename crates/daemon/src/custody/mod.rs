//! Trust and key custody
//!
//! Every operation here takes the caller's id as already authenticated, the
//! store handle, and (where keys are involved) the cryptographic provider.
//! Relationship and ownership checks always run before any primitive is
//! invoked.

mod cipher;
mod contacts;
mod error;
mod keys;
mod messages;
mod sharing;
mod users;

pub use cipher::{decrypt, encrypt, Encrypted};
pub use contacts::{
    list_contacts, request_contact, require_accepted, respond_to_request, ContactEntry,
    ContactList, PendingEntry, RespondAction, RespondOutcome,
};
pub use error::CustodyError;
pub use keys::{
    delete_key, generate_key_pair, get_key, import_public_key, list_keys, rename_key, verify_key,
    GeneratedKey,
};
pub use messages::{history, send_encrypted, send_message};
pub use sharing::share_key;
pub use users::{normalize_email, register, search, MIN_SEARCH_LEN};
