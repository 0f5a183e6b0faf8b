//! Vault guard and account ledger for the Bearby wallet core.
//!
//! - [`guard`] — owns the encrypted seed and the locked/unlocked session
//! - [`vault`] — the ciphertext record and its pure seal/open functions
//! - [`account`] — account, balance and counter records
//! - [`ledger`] — ordered identities with selection and uniqueness

pub mod account;
pub mod guard;
pub mod ledger;
pub mod vault;

pub use account::{Account, AccountBalance, AccountKind, IndexCounters, Wallet};
pub use guard::{Guard, VaultRollback, VaultSetup};
pub use ledger::AccountLedger;
pub use vault::EncryptedVault;
