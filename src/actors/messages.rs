//! Message types for actor communication
//!
//! Generators are controlled through an mpsc command channel; samples they
//! produce leave through the [`BroadcastHub`](crate::hub::BroadcastHub).

use tokio::sync::oneshot;

use crate::Sample;

/// Commands that can be sent to a ReadingGeneratorActor
#[derive(Debug)]
pub enum GeneratorCommand {
    /// Produce a sample immediately (bypassing the interval timer)
    ///
    /// The sample goes through the regular alert and broadcast path and is
    /// also handed back to the caller.
    TickNow {
        /// Channel to send the produced sample back
        respond_to: oneshot::Sender<Sample>,
    },

    /// Update the tick interval
    ///
    /// The timer restarts with the new period right away.
    UpdateInterval {
        /// New interval in milliseconds
        interval_ms: u64,
    },

    /// Stop the generator
    ///
    /// Handled between ticks, so an in-flight tick always completes first.
    Shutdown,
}
