//! Message processing and background-task dispatch.
//!
//! Drives the TEA update loop for one message, executes any resulting
//! action, and chains follow-up messages. Background tasks run on the
//! current thread's `LocalSet` and re-enter the loop through the message
//! channel, so every controller call stays on the single dispatch thread.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::controller::{TaskKind, TaskRequest};
use crate::handler::{self, UpdateAction};
use crate::message::{Message, TaskOutcome};
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::UnboundedSender<Message>,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, state, msg_tx);
        }

        // A single dispatch can queue several tasks (e.g. retry storms);
        // drain whatever the handler did not convert.
        while let Some(task) = state.shell.take_pending_task() {
            handle_action(UpdateAction::SpawnTask(task), state, msg_tx);
        }

        msg = result.message;
    }
}

fn handle_action(action: UpdateAction, state: &AppState, msg_tx: &mpsc::UnboundedSender<Message>) {
    match action {
        UpdateAction::SpawnTask(TaskRequest { kind, generation }) => {
            spawn_task(kind, generation, state, msg_tx)
        }
    }
}

/// Long-running platform work is delegated off the dispatch path and its
/// result delivered back as a [`Message::TaskCompleted`]. The completion
/// carries the requesting screen's generation; the shell drops it if that
/// screen has since been torn down.
fn spawn_task(
    kind: TaskKind,
    generation: u64,
    state: &AppState,
    msg_tx: &mpsc::UnboundedSender<Message>,
) {
    match kind {
        TaskKind::RemoveUser { user } => {
            debug!(%user, generation, "spawning user removal");
            let platform = state.shell.platform().clone();
            let tx = msg_tx.clone();
            tokio::task::spawn_local(async move {
                // Account teardown goes through enrollment handles; give the
                // loop a beat before the synchronous platform call.
                tokio::time::sleep(Duration::from_millis(150)).await;
                let result = platform
                    .users
                    .remove_user(user)
                    .map_err(|e| e.to_string());
                let _ = tx.send(Message::TaskCompleted(TaskOutcome::UserRemoved {
                    user,
                    generation,
                    result,
                }));
            });
        }
    }
}
