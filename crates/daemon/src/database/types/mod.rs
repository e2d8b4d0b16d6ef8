mod contact_status;
mod duuid;
mod key_kind;

pub use contact_status::ContactStatus;
pub use duuid::DUuid;
pub use key_kind::KeyKind;
