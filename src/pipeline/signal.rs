//! Cooperative cancellation, checked once per loop iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tells the frame loop to stop. Polled after each frame is presented.
pub trait CancellationSignal {
    /// Returns true once the loop should stop. Must not block.
    fn poll(&mut self) -> bool;
}

impl<C: CancellationSignal + ?Sized> CancellationSignal for Box<C> {
    fn poll(&mut self) -> bool {
        (**self).poll()
    }
}

/// Stops when either signal fires. Both are polled every time.
impl<A: CancellationSignal, B: CancellationSignal> CancellationSignal for (A, B) {
    fn poll(&mut self) -> bool {
        let a = self.0.poll();
        let b = self.1.poll();
        a || b
    }
}

/// Never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct Never;

impl CancellationSignal for Never {
    fn poll(&mut self) -> bool {
        false
    }
}

/// Cancels after a fixed number of polls, i.e. frames.
#[derive(Debug, Clone)]
pub struct FrameBudget {
    limit: u64,
    seen: u64,
}

impl FrameBudget {
    pub fn new(limit: u64) -> Self {
        Self { limit, seen: 0 }
    }
}

impl CancellationSignal for FrameBudget {
    fn poll(&mut self) -> bool {
        self.seen += 1;
        self.seen >= self.limit
    }
}

/// A flag raised from another thread, e.g. by a Ctrl-C handler.
#[derive(Debug, Clone, Default)]
pub struct CtrlCSignal {
    flag: Arc<AtomicBool>,
}

impl CtrlCSignal {
    /// Installs a process-wide Ctrl-C handler that raises the flag.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let signal = Self::default();
        let flag = Arc::clone(&signal.flag);
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })?;
        Ok(signal)
    }

    /// Wraps an existing flag.
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    /// Raises the flag.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl CancellationSignal for CtrlCSignal {
    fn poll(&mut self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_budget() {
        let mut budget = FrameBudget::new(2);
        assert!(!budget.poll());
        assert!(budget.poll());
    }

    #[test]
    fn test_flag_signal() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut signal = CtrlCSignal::from_flag(Arc::clone(&flag));
        assert!(!signal.poll());

        flag.store(true, Ordering::SeqCst);
        assert!(signal.poll());
    }

    #[test]
    fn test_pair_polls_both() {
        let mut pair = (FrameBudget::new(3), Never);
        assert!(!pair.poll());
        assert!(!pair.poll());
        assert!(pair.poll());
    }
}
