//! Background core of the Bearby wallet.
//!
//! Composes the vault guard, the account ledger and the network registry
//! into one [`BackgroundState`], exposes every operation as a typed
//! [`Request`] with a `Result<Response>` outcome, and serializes all
//! requests through a single command loop.
//!
//! # Architecture
//!
//! ```text
//! CoreHandle ──mpsc──► run_core_loop ──► BackgroundState::handle
//!      ▲                                      │
//!      └──────────────oneshot─────────────────┘
//! ```

pub mod command;
pub mod event_loop;
pub mod handler;
pub mod state;

pub use command::{CoreCommand, Request, Response};
pub use event_loop::{run_core_loop, spawn_core, CoreHandle};
pub use state::{BackgroundState, NetworkSnapshot, WalletSnapshot};
