//! Host-side helper deriving the recent-input signal.

/// Remembers the last genuine interactive input and answers recency queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentInputTracker {
    window_ms: i64,
    last_input_ms: Option<i64>,
}

impl RecentInputTracker {
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms: window_ms.max(0),
            last_input_ms: None,
        }
    }

    /// Records a keystroke, paste, or other deliberate user action.
    pub fn record_input(&mut self, at_ms: i64) {
        self.last_input_ms = Some(match self.last_input_ms {
            Some(previous) => previous.max(at_ms),
            None => at_ms,
        });
    }

    /// Whether input happened within the window ending at `now_ms`.
    pub fn is_recent(&self, now_ms: i64) -> bool {
        self.last_input_ms.is_some_and(|last| {
            let elapsed = now_ms.saturating_sub(last);
            (0..=self.window_ms).contains(&elapsed)
        })
    }
}
