//! Cancellable quiet-window timer used for free-text suggestions.

use std::time::Duration;

use super::{GenerationTicket, RequestGeneration};

/// Quiet window applied to search-box keystrokes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Restart-on-input debouncer.
///
/// Each [`Debouncer::schedule`] call restarts the quiet window and retires any
/// earlier pending call; only the last call inside the window fires.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: RequestGeneration,
}

impl Debouncer {
    /// Build a debouncer with the given quiet window.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: RequestGeneration::new(),
        }
    }

    /// Quiet window length.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the quiet window.
    ///
    /// Returns the ticket when the window elapsed with no newer schedule or
    /// cancel, and `None` as soon as this call is superseded.
    pub async fn schedule(&self) -> Option<GenerationTicket> {
        let ticket = self.generation.begin();
        let elapsed = tokio::select! {
            biased;
            () = ticket.superseded() => false,
            () = tokio::time::sleep(self.delay) => true,
        };
        (elapsed && ticket.is_current()).then_some(ticket)
    }

    /// Retire any pending schedule without starting a new one.
    pub fn cancel(&self) {
        self.generation.invalidate();
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_schedule_in_the_window_fires() {
        let debouncer = Debouncer::default();
        let started = Instant::now();
        let (first, second, third) = tokio::join!(
            debouncer.schedule(),
            debouncer.schedule(),
            debouncer.schedule()
        );
        assert!(first.is_none());
        assert!(second.is_none());
        assert!(third.is_some_and(|ticket| ticket.is_current()));
        assert!(started.elapsed() >= DEFAULT_DEBOUNCE);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_retires_a_pending_schedule() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let (fired, ()) = tokio::join!(debouncer.schedule(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            debouncer.cancel();
        });
        assert!(fired.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn keystrokes_spaced_beyond_the_window_each_fire() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        assert!(debouncer.schedule().await.is_some());
        assert!(debouncer.schedule().await.is_some());
    }
}
