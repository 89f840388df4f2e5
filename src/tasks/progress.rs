//! Progress reporting for a single background task

use tokio::sync::watch;

/// Write side of a task's progress value
///
/// Exactly one reporter exists per task and it is owned by the worker. Values
/// are clamped to 100 and never decrease.
#[derive(Debug)]
pub struct ProgressReporter {
    sender: watch::Sender<u8>,
}

impl ProgressReporter {
    pub(crate) fn new() -> (Self, watch::Receiver<u8>) {
        let (sender, receiver) = watch::channel(0);
        (Self { sender }, receiver)
    }

    /// Record a new progress value; lower values than the current one are ignored
    pub fn set(&self, value: u8) {
        let value = value.min(100);
        self.sender.send_if_modified(|current| {
            if value > *current {
                *current = value;
                true
            } else {
                false
            }
        });
    }

    /// Record `done` out of `total` units, rounded down
    pub fn set_fraction(&self, done: usize, total: usize) {
        if total == 0 {
            self.complete();
            return;
        }
        let percent = (done.min(total) * 100) / total;
        self.set(percent as u8);
    }

    /// Mark the work as fully done
    pub fn complete(&self) {
        self.set(100);
    }

    /// Current progress value
    pub fn current(&self) -> u8 {
        *self.sender.borrow()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let (reporter, rx) = ProgressReporter::new();
        assert_eq!(reporter.current(), 0);
        assert_eq!(*rx.borrow(), 0);
    }

    #[test]
    fn never_decreases() {
        let (reporter, rx) = ProgressReporter::new();
        reporter.set(40);
        reporter.set(10);
        assert_eq!(*rx.borrow(), 40);
    }

    #[test]
    fn clamps_to_one_hundred_and_freezes() {
        let (reporter, rx) = ProgressReporter::new();
        reporter.set(250);
        assert_eq!(*rx.borrow(), 100);
        reporter.set(99);
        assert_eq!(*rx.borrow(), 100);
    }

    #[test]
    fn fraction_rounds_down() {
        let (reporter, rx) = ProgressReporter::new();
        reporter.set_fraction(1, 3);
        assert_eq!(*rx.borrow(), 33);
        reporter.set_fraction(2, 3);
        assert_eq!(*rx.borrow(), 66);
        reporter.set_fraction(3, 3);
        assert_eq!(*rx.borrow(), 100);
    }

    #[test]
    fn zero_total_counts_as_done() {
        let (reporter, rx) = ProgressReporter::new();
        reporter.set_fraction(0, 0);
        assert_eq!(*rx.borrow(), 100);
    }
}
