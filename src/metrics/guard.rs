//! Scoped in-flight tracking.

use super::recorder::MetricsRecorder;

/// Holds one slot of the in-flight gauge for as long as it is alive.
///
/// The gauge is incremented on construction and decremented exactly once on
/// drop, so early returns, errors and panics all release the slot.
#[must_use = "the request stops counting as in-flight as soon as the guard is dropped"]
pub struct InFlightGuard<'a, M: MetricsRecorder> {
    recorder: &'a M,
}

impl<'a, M: MetricsRecorder> InFlightGuard<'a, M> {
    pub fn new(recorder: &'a M) -> Self {
        recorder.request_started();
        InFlightGuard { recorder }
    }
}

impl<M: MetricsRecorder> Drop for InFlightGuard<'_, M> {
    fn drop(&mut self) {
        self.recorder.request_finished();
    }
}
