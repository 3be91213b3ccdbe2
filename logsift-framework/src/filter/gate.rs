use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// handle identifying one submitted evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// last-submitted-wins gate for evaluations running off the caller's thread
///
/// every [`issue`](Self::issue) supersedes all earlier tickets; a worker hands
/// its result to [`publish`](Self::publish), which drops it if a newer
/// evaluation has been submitted in the meantime
#[derive(Debug, Clone, Default)]
pub struct EvaluationGate {
    latest: Arc<AtomicU64>,
}

impl EvaluationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// `Some(result)` only when `ticket` is still the newest one
    pub fn publish<T>(&self, ticket: Ticket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            log::debug!("dropping stale evaluation {:?}", ticket);
            None
        }
    }
}
