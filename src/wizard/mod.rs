//! Wizard navigation, form binding, chart ownership and deferred work.

pub mod binder;
pub mod chart;
pub mod step;
/// Keyed, cancellable virtual-time task queue.
pub mod timers;
