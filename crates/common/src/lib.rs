/**
 * Cryptographic types and operations.
 *  - Public and private key armor
 *  - Sealed-box message encryption
 *  - The `CryptoProvider` seam used by the
 *    key custody core
 */
pub mod crypto;
/**
 * Helper for reporting build version information
 *  at startup and from the CLI.
 */
pub mod version;

pub mod prelude {
    pub use crate::crypto::{
        ArmoredKeyPair, CryptoError, CryptoProvider, KeyInfo, PublicKey, SealedBoxProvider,
        SecretKey,
    };
    pub use crate::version::build_info;
}
