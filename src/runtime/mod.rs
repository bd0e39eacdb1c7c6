/*!
 * Runtime Module
 * Startup and the control loop
 */

pub mod bootstrap;
pub mod event_loop;

pub use bootstrap::{bootstrap, Scheduler};
pub use event_loop::EventLoop;
