//! Monotonic request generations for discarding superseded async work.
//!
//! Every operation that may be overtaken by a newer one of the same kind
//! takes a [`GenerationTicket`] when it starts. Before applying its result it
//! checks [`GenerationTicket::is_current`]; while waiting it can race
//! [`GenerationTicket::superseded`] so the in-flight future is dropped as soon
//! as a newer request begins.

use tokio::sync::watch;

/// Shared counter handing out request tickets.
#[derive(Debug)]
pub struct RequestGeneration {
    sender: watch::Sender<u64>,
}

impl Default for RequestGeneration {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestGeneration {
    /// Start a counter at generation zero.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(0);
        Self { sender }
    }

    /// Begin a new request, superseding every outstanding ticket.
    ///
    /// # Examples
    /// ```
    /// use cafe_finder::domain::RequestGeneration;
    ///
    /// let generation = RequestGeneration::new();
    /// let first = generation.begin();
    /// let second = generation.begin();
    /// assert!(!first.is_current());
    /// assert!(second.is_current());
    /// ```
    #[must_use]
    pub fn begin(&self) -> GenerationTicket {
        let mut issued = 0;
        self.sender.send_modify(|value| {
            *value = value.wrapping_add(1);
            issued = *value;
        });
        GenerationTicket {
            id: issued,
            receiver: self.sender.subscribe(),
        }
    }

    /// Supersede every outstanding ticket without starting new work.
    pub fn invalidate(&self) {
        self.sender.send_modify(|value| *value = value.wrapping_add(1));
    }

    /// Latest generation issued.
    #[must_use]
    pub fn current(&self) -> u64 {
        *self.sender.borrow()
    }
}

/// Proof that a request was the latest of its kind when it started.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    id: u64,
    receiver: watch::Receiver<u64>,
}

impl GenerationTicket {
    /// Generation number carried by this ticket.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Return whether no newer request has started since this ticket.
    #[must_use]
    pub fn is_current(&self) -> bool {
        *self.receiver.borrow() == self.id
    }

    /// Resolve once a newer request starts (or the counter is dropped).
    ///
    /// Never resolves while the ticket stays current, which makes it suitable
    /// as the losing arm of a `tokio::select!`.
    pub async fn superseded(&self) {
        let mut receiver = self.receiver.clone();
        let id = self.id;
        #[expect(
            clippy::let_underscore_must_use,
            reason = "a closed channel means the owner went away, which also supersedes"
        )]
        let _ = receiver.wait_for(|value| *value != id).await;
    }
}
