//! Main update function - handles state transitions (TEA pattern)

use cabin_core::Error;
use tracing::error;

use crate::message::Message;
use crate::state::{AppState, ShellPhase};

use super::{UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = ShellPhase::Quitting;
            UpdateResult::none()
        }

        Message::Click { key } => {
            let result = state.shell.handle_click(&key);
            report(state, result);
            next_task(state)
        }

        Message::Back => {
            let result = state.shell.go_back();
            report(state, result);
            next_task(state)
        }

        Message::OpenScreen(id) => {
            let result = state.shell.launch_screen(id);
            report(state, result);
            next_task(state)
        }

        Message::DialogChoice { index } => {
            let result = state.shell.handle_dialog_choice(index);
            report(state, result);
            next_task(state)
        }

        Message::RestrictionsChanged(restrictions) => {
            let result = state.shell.handle_restrictions_changed(restrictions);
            report(state, result);
            next_task(state)
        }

        Message::Platform(event) => {
            let result = state.shell.handle_platform_event(event);
            report(state, result);
            next_task(state)
        }

        Message::TaskCompleted(outcome) => {
            let result = state.shell.handle_task_outcome(outcome);
            report(state, result);
            next_task(state)
        }
    }
}

/// Fatal shell errors (screen failed to initialize) end the run; they are
/// programming errors, never masked. Recoverable errors were already
/// degraded inside the shell and only get logged here.
fn report(state: &mut AppState, result: Result<(), Error>) {
    if let Err(err) = result {
        error!("shell dispatch failed: {err}");
        if err.is_fatal() {
            state.phase = ShellPhase::Quitting;
        }
    }
}

/// Convert a controller-queued background request into an event-loop
/// action.
fn next_task(state: &mut AppState) -> UpdateResult {
    match state.shell.take_pending_task() {
        Some(task) => UpdateResult::action(UpdateAction::SpawnTask(task)),
        None => UpdateResult::none(),
    }
}
