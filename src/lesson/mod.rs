pub mod flow;
pub mod script;
pub mod step;
pub mod timer;

use std::time::Duration;

/// Side effects a controller asks its host to perform after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect<T> {
    /// Fire `timer` back into the controller once `after` has elapsed.
    Schedule { timer: T, after: Duration },
    /// The lesson is over; return to lesson selection.
    Exit,
}
