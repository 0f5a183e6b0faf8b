//! The serialized command loop.
//!
//! [`spawn_core`] moves a synced [`BackgroundState`] onto a blocking
//! worker and returns a cloneable [`CoreHandle`]. Commands are processed
//! strictly one at a time, so a request never observes another
//! request's partial effects. Vault operations run Argon2, which is why
//! the loop lives on the blocking pool instead of an async task.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use bearby_types::{BearbyError, Result};

use crate::command::{CoreCommand, Request, Response};
use crate::state::BackgroundState;

/// Bounded capacity of the command channel.
pub const COMMAND_CHANNEL_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// CoreHandle
// ---------------------------------------------------------------------------

/// Sender side of the command loop.
#[derive(Clone, Debug)]
pub struct CoreHandle {
    commands: mpsc::Sender<CoreCommand>,
}

impl CoreHandle {
    /// Queues `request` and waits for its outcome.
    ///
    /// # Errors
    ///
    /// The request's own error, or `CoreStopped` if the loop has exited.
    pub async fn request(&self, request: Request) -> Result<Response> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(CoreCommand::Request { request, reply })
            .await
            .map_err(|_| BearbyError::CoreStopped)?;
        outcome.await.map_err(|_| BearbyError::CoreStopped)?
    }

    /// Asks the loop to stop after the commands already queued.
    ///
    /// # Errors
    ///
    /// `CoreStopped` if the loop has already exited.
    pub async fn shutdown(&self) -> Result<()> {
        self.commands
            .send(CoreCommand::Shutdown)
            .await
            .map_err(|_| BearbyError::CoreStopped)
    }
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// Starts the command loop on tokio's blocking pool.
///
/// Must be called from within a tokio runtime. The loop ends on
/// [`CoreHandle::shutdown`] or once every handle is dropped; await the
/// returned `JoinHandle` to confirm.
pub fn spawn_core(state: BackgroundState) -> (CoreHandle, JoinHandle<()>) {
    let (commands, inbox) = mpsc::channel(COMMAND_CHANNEL_SIZE);
    let task = tokio::task::spawn_blocking(move || run_core_loop(state, inbox));
    (CoreHandle { commands }, task)
}

/// Processes commands until shutdown or until all senders are gone.
///
/// Blocks the calling thread; use [`spawn_core`] from async code.
pub fn run_core_loop(mut state: BackgroundState, mut inbox: mpsc::Receiver<CoreCommand>) {
    tracing::info!("core loop started");

    while let Some(command) = inbox.blocking_recv() {
        match command {
            CoreCommand::Request { request, reply } => {
                let name = request.name();
                let outcome = state.handle(request);
                match &outcome {
                    Ok(_) => tracing::debug!(request = name, "request handled"),
                    Err(e) => tracing::debug!(request = name, error = %e, "request rejected"),
                }
                if reply.send(outcome).is_err() {
                    tracing::debug!(request = name, "requester went away before the reply");
                }
            }
            CoreCommand::Shutdown => {
                tracing::info!("shutdown command received");
                break;
            }
        }
    }

    tracing::info!("core loop exited");
}
