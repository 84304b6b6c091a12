//! Cancel-and-restart debounce modeled as an explicit state machine.
//!
//! `Idle --EditObserved--> PendingReconcile(deadline)`
//! `PendingReconcile --EditObserved--> PendingReconcile(new deadline)`
//! `PendingReconcile --DeadlineElapsed--> Idle` (caller runs reconciliation)

/// Debounce timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    PendingReconcile { deadline_ms: i64 },
}

/// Single-slot debounce timer driven by caller-supplied timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet_ms: i64,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(quiet_ms: i64) -> Self {
        Self {
            quiet_ms: quiet_ms.max(0),
            state: DebounceState::Idle,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::PendingReconcile { .. })
    }

    /// Arms the timer, replacing any pending deadline.
    ///
    /// Returns `true` when a pending reconciliation was replaced.
    pub fn edit_observed(&mut self, at_ms: i64) -> bool {
        let replaced = self.is_pending();
        self.state = DebounceState::PendingReconcile {
            deadline_ms: at_ms.saturating_add(self.quiet_ms),
        };
        replaced
    }

    /// Fires when `now_ms` reached the pending deadline, returning to `Idle`.
    pub fn deadline_elapsed(&mut self, now_ms: i64) -> bool {
        match self.state {
            DebounceState::PendingReconcile { deadline_ms } if now_ms >= deadline_ms => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Drops a pending reconciliation. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.state = DebounceState::Idle;
        was_pending
    }
}
