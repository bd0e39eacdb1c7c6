/*!
 * Control Channel Protocol
 *
 * Fixed-size, native-endian records matching the layout the shell writes:
 *
 * ```text
 * offset 0   i32       request kind
 * offset 4   i32       serial id argument
 * offset 8   [u8; 60]  NUL-padded executable path
 * ```
 *
 * Replies are a single native-endian i32.
 */

use crate::core::limits::{REPLY_RECORD_SIZE, REQUEST_PATH_LEN, REQUEST_RECORD_SIZE};
use bytes::{Buf, BufMut};
use nix::errno::Errno;
use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt, OsStringExt};

pub const REQ_PRINT_TASKS: i32 = 1;
pub const REQ_KILL_TASK: i32 = 2;
pub const REQ_EXEC_TASK: i32 = 3;
pub const REQ_HIGH_TASK: i32 = 4;
pub const REQ_LOW_TASK: i32 = 5;

/// Reply codes
pub const REPLY_OK: i32 = 0;
pub const REPLY_NOT_FOUND: i32 = 1;
pub const REPLY_UNSUPPORTED: i32 = -(Errno::ENOSYS as i32);

pub type RequestRecord = [u8; REQUEST_RECORD_SIZE];
pub type ReplyRecord = [u8; REPLY_RECORD_SIZE];

/// A decoded shell request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    PrintTasks,
    KillTask(i32),
    ExecTask(OsString),
    RaisePriority(i32),
    LowerPriority(i32),
    Unknown(i32),
}

impl Request {
    pub fn decode(record: &RequestRecord) -> Self {
        let mut buf = &record[..];
        let kind = buf.get_i32_ne();
        let task_arg = buf.get_i32_ne();

        match kind {
            REQ_PRINT_TASKS => Request::PrintTasks,
            REQ_KILL_TASK => Request::KillTask(task_arg),
            REQ_EXEC_TASK => Request::ExecTask(decode_path(buf)),
            REQ_HIGH_TASK => Request::RaisePriority(task_arg),
            REQ_LOW_TASK => Request::LowerPriority(task_arg),
            other => Request::Unknown(other),
        }
    }

    /// Client-side encoding, as a shell would write it
    ///
    /// Paths longer than the field are truncated so the record stays
    /// NUL-terminated.
    pub fn encode(&self) -> RequestRecord {
        let (kind, task_arg, path): (i32, i32, &[u8]) = match self {
            Request::PrintTasks => (REQ_PRINT_TASKS, 0, b""),
            Request::KillTask(id) => (REQ_KILL_TASK, *id, b""),
            Request::ExecTask(path) => (REQ_EXEC_TASK, 0, path.as_bytes()),
            Request::RaisePriority(id) => (REQ_HIGH_TASK, *id, b""),
            Request::LowerPriority(id) => (REQ_LOW_TASK, *id, b""),
            Request::Unknown(kind) => (*kind, 0, b""),
        };

        let mut record = [0u8; REQUEST_RECORD_SIZE];
        let mut buf = &mut record[..];
        buf.put_i32_ne(kind);
        buf.put_i32_ne(task_arg);

        let len = path.len().min(REQUEST_PATH_LEN - 1);
        buf.put_slice(&path[..len]);

        record
    }
}

/// Raw path bytes up to the first NUL; handed to exec untouched
fn decode_path(field: &[u8]) -> OsString {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    OsString::from_vec(field[..end].to_vec())
}

pub fn encode_reply(code: i32) -> ReplyRecord {
    code.to_ne_bytes()
}

pub fn decode_reply(record: &ReplyRecord) -> i32 {
    i32::from_ne_bytes(*record)
}
