/*!
 * IPC Module
 * Control channel to the shell: wire format, endpoints and dispatch
 */

pub mod channel;
pub mod handler;
pub mod protocol;

pub use channel::{channel_pair, ControlChannel, ShellEndpoint};
pub use handler::RequestHandler;
pub use protocol::{Request, REPLY_NOT_FOUND, REPLY_OK, REPLY_UNSUPPORTED};
