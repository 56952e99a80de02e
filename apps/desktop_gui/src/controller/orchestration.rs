//! Queues UI-originated commands onto the backend worker.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::{BackendCommand, CommandKey};

/// Returns the key of a command the worker never received.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> Result<(), CommandKey> {
    let cmd_name = cmd.name();
    let key = cmd.key();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "backend command queue full");
            *status = "File de commandes pleine, réessayez".to_string();
            Err(key)
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend worker disconnected");
            *status = "Service d'arrière-plan arrêté".to_string();
            Err(key)
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
