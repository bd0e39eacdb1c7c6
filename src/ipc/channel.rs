/*!
 * Control Channel
 *
 * Two unidirectional pipes between the scheduler and the shell. Every
 * transfer moves exactly one record in one call; anything else means the
 * channel is broken.
 */

use super::protocol::{decode_reply, encode_reply, Request, ReplyRecord, RequestRecord};
use crate::core::errors::{ChannelError, SchedulerError, SchedulerResult};
use crate::core::limits::{REPLY_RECORD_SIZE, REQUEST_RECORD_SIZE};
use nix::fcntl::{fcntl, FcntlArg, FdFlag, OFlag};
use nix::unistd::pipe2;
use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

/// Scheduler side: reads requests, writes replies
#[derive(Debug)]
pub struct ControlChannel {
    requests: File,
    replies: File,
}

/// Shell side: writes requests, reads replies
#[derive(Debug)]
pub struct ShellEndpoint {
    requests: File,
    replies: File,
}

/// Create both pipes; all four ends are close-on-exec
pub fn channel_pair() -> SchedulerResult<(ControlChannel, ShellEndpoint)> {
    let (request_read, request_write) =
        pipe2(OFlag::O_CLOEXEC).map_err(SchedulerError::ChannelSetup)?;
    let (reply_read, reply_write) = pipe2(OFlag::O_CLOEXEC).map_err(SchedulerError::ChannelSetup)?;

    Ok((
        ControlChannel::new(request_read, reply_write),
        ShellEndpoint::new(request_write, reply_read),
    ))
}

impl ControlChannel {
    pub fn new(requests: OwnedFd, replies: OwnedFd) -> Self {
        Self {
            requests: File::from(requests),
            replies: File::from(replies),
        }
    }

    /// Read exactly one request record
    pub fn read_request(&mut self) -> Result<Request, ChannelError> {
        let mut record: RequestRecord = [0u8; REQUEST_RECORD_SIZE];
        let actual = self.requests.read(&mut record)?;
        if actual != REQUEST_RECORD_SIZE {
            return Err(ChannelError::ShortRead {
                expected: REQUEST_RECORD_SIZE,
                actual,
            });
        }
        Ok(Request::decode(&record))
    }

    /// Write exactly one reply record
    pub fn write_reply(&mut self, code: i32) -> Result<(), ChannelError> {
        let actual = self.replies.write(&encode_reply(code))?;
        if actual != REPLY_RECORD_SIZE {
            return Err(ChannelError::ShortWrite {
                expected: REPLY_RECORD_SIZE,
                actual,
            });
        }
        Ok(())
    }
}

impl AsFd for ControlChannel {
    /// The request end, which is what the control loop waits on
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.requests.as_fd()
    }
}

impl ShellEndpoint {
    pub fn new(requests: OwnedFd, replies: OwnedFd) -> Self {
        Self {
            requests: File::from(requests),
            replies: File::from(replies),
        }
    }

    pub fn send(&mut self, request: &Request) -> Result<(), ChannelError> {
        let record = request.encode();
        let actual = self.requests.write(&record)?;
        if actual != REQUEST_RECORD_SIZE {
            return Err(ChannelError::ShortWrite {
                expected: REQUEST_RECORD_SIZE,
                actual,
            });
        }
        Ok(())
    }

    /// Write arbitrary bytes on the request pipe
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<usize, ChannelError> {
        Ok(self.requests.write(bytes)?)
    }

    pub fn recv_reply(&mut self) -> Result<i32, ChannelError> {
        let mut record: ReplyRecord = [0u8; REPLY_RECORD_SIZE];
        let actual = self.replies.read(&mut record)?;
        if actual != REPLY_RECORD_SIZE {
            return Err(ChannelError::ShortRead {
                expected: REPLY_RECORD_SIZE,
                actual,
            });
        }
        Ok(decode_reply(&record))
    }

    /// Descriptor numbers handed to the shell: (request write, reply read)
    pub fn raw_fds(&self) -> (RawFd, RawFd) {
        (self.requests.as_raw_fd(), self.replies.as_raw_fd())
    }

    /// Let both ends survive exec; only called in the shell child
    pub(crate) fn make_inheritable(&self) -> nix::Result<()> {
        let (request_fd, reply_fd) = self.raw_fds();
        fcntl(request_fd, FcntlArg::F_SETFD(FdFlag::empty()))?;
        fcntl(reply_fd, FcntlArg::F_SETFD(FdFlag::empty()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::protocol::REPLY_NOT_FOUND;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_and_reply_round_trip_over_pipes() {
        let (mut channel, mut shell) = channel_pair().unwrap();

        shell.send(&Request::RaisePriority(3)).unwrap();
        assert_eq!(channel.read_request().unwrap(), Request::RaisePriority(3));

        channel.write_reply(REPLY_NOT_FOUND).unwrap();
        assert_eq!(shell.recv_reply().unwrap(), REPLY_NOT_FOUND);
    }

    #[test]
    fn test_short_request_breaks_channel() {
        let (mut channel, mut shell) = channel_pair().unwrap();

        assert_eq!(shell.send_raw(b"abc").unwrap(), 3);
        let err = channel.read_request().unwrap_err();
        assert!(matches!(err, ChannelError::ShortRead { expected: 68, actual: 3 }));
    }

    #[test]
    fn test_closed_shell_reads_as_short() {
        let (mut channel, shell) = channel_pair().unwrap();
        drop(shell);

        let err = channel.read_request().unwrap_err();
        assert!(matches!(err, ChannelError::ShortRead { actual: 0, .. }));
    }

    #[test]
    fn test_ends_are_close_on_exec() {
        let (channel, shell) = channel_pair().unwrap();
        let (request_fd, _) = shell.raw_fds();

        let flags = fcntl(request_fd, FcntlArg::F_GETFD).unwrap();
        assert!(FdFlag::from_bits_truncate(flags).contains(FdFlag::FD_CLOEXEC));

        shell.make_inheritable().unwrap();
        let flags = fcntl(request_fd, FcntlArg::F_GETFD).unwrap();
        assert!(!FdFlag::from_bits_truncate(flags).contains(FdFlag::FD_CLOEXEC));
        drop(channel);
    }
}
