/*!
 * Scheduler Module
 * Schedule state, selection policy and the signal-driven engine
 */

pub mod engine;
pub mod events;
pub mod policy;
pub mod state;

pub use engine::Transition;
pub use events::{reap_pending, ChildEvent};
pub use policy::{select_next, select_successor};
pub use state::SchedulerState;
