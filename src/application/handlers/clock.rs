//! Time source for handlers.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;

/// Returns the current time. Handlers read it once per call.
pub type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// Wall clock.
pub fn system_clock() -> Clock {
    Arc::new(Timestamp::now)
}

/// Clock stuck at `now`.
pub fn fixed_clock(now: Timestamp) -> Clock {
    Arc::new(move || now)
}
