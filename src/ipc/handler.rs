/*!
 * Control Protocol Handler
 * Applies one shell request to the schedule and produces its reply code
 */

use super::protocol::{Request, REPLY_NOT_FOUND, REPLY_OK, REPLY_UNSUPPORTED};
use crate::core::config::ListingFormat;
use crate::core::errors::SchedulerResult;
use crate::core::types::{Pid, Priority, SerialId, Task};
use crate::process::traits::ProcessControl;
use crate::scheduler::state::SchedulerState;
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

/// One line of the task listing
#[derive(Debug, Serialize)]
struct TaskLine<'a> {
    serial_id: SerialId,
    pid: i32,
    name: &'a str,
    priority: Priority,
    running: bool,
}

/// Dispatches decoded requests; owns the sink for the task listing
pub struct RequestHandler<W: Write> {
    format: ListingFormat,
    out: W,
}

impl<W: Write> RequestHandler<W> {
    pub fn new(format: ListingFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn out(&self) -> &W {
        &self.out
    }

    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Apply a request and return the reply code for the shell
    ///
    /// Only fatal conditions (fork failure, a broken stdout) are errors;
    /// unknown ids and request kinds are reply codes.
    pub fn handle<C: ProcessControl>(
        &mut self,
        state: &mut SchedulerState,
        control: &C,
        request: &Request,
    ) -> SchedulerResult<i32> {
        match request {
            Request::PrintTasks => {
                self.print_tasks(state)?;
                Ok(REPLY_OK)
            }
            Request::KillTask(id) => Ok(kill_task(state, control, *id)),
            Request::ExecTask(executable) => {
                let pid = control.launch(executable)?;
                let name = executable.to_string_lossy();
                let serial_id = state.register(pid, &name);
                info!(serial_id, %pid, executable = %name, "Task created by shell");
                Ok(REPLY_OK)
            }
            Request::RaisePriority(id) => Ok(set_priority(state, *id, Priority::High)),
            Request::LowerPriority(id) => Ok(set_priority(state, *id, Priority::Low)),
            Request::Unknown(kind) => {
                warn!(kind, "Unsupported request");
                Ok(REPLY_UNSUPPORTED)
            }
        }
    }

    fn print_tasks(&mut self, state: &SchedulerState) -> SchedulerResult<()> {
        let current = state.current();

        for task in state.registry().iter() {
            let running = Some(task.pid) == current;
            match self.format {
                ListingFormat::Text => writeln!(self.out, "{}", text_line(task, running))?,
                ListingFormat::Json => {
                    let line = TaskLine {
                        serial_id: task.serial_id,
                        pid: task.pid.as_raw(),
                        name: &task.name,
                        priority: task.priority,
                        running,
                    };
                    serde_json::to_writer(&mut self.out, &line).map_err(std::io::Error::from)?;
                    writeln!(self.out)?;
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }
}

fn text_line(task: &Task, running: bool) -> String {
    let mut line = format!(
        "Process Serial ID: {}  - PID: {}  - Name: {}  - Priority: {}",
        task.serial_id, task.pid, task.name, task.priority
    );
    if running {
        line.push_str(" (currently running)");
    }
    line
}

fn lookup(state: &SchedulerState, id: i32) -> Option<Pid> {
    let serial_id = SerialId::try_from(id).ok()?;
    state.registry().find_by_serial(serial_id).map(|task| task.pid)
}

fn kill_task<C: ProcessControl>(state: &SchedulerState, control: &C, id: i32) -> i32 {
    match lookup(state, id) {
        Some(pid) => {
            info!(serial_id = id, %pid, "Killing task");
            control.kill(pid);
            REPLY_OK
        }
        None => {
            warn!(serial_id = id, "There is no running process with this id");
            REPLY_NOT_FOUND
        }
    }
}

fn set_priority(state: &mut SchedulerState, id: i32, priority: Priority) -> i32 {
    let task = SerialId::try_from(id)
        .ok()
        .and_then(|serial_id| state.registry_mut().find_by_serial_mut(serial_id));

    match task {
        Some(task) => {
            task.priority = priority;
            info!(serial_id = id, %priority, "Task priority changed");
            REPLY_OK
        }
        None => {
            warn!(serial_id = id, "There is no running process with this id");
            REPLY_NOT_FOUND
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    #[derive(Default)]
    struct FakeControl {
        next_pid: Cell<i32>,
        killed: RefCell<Vec<Pid>>,
        launched: RefCell<Vec<Vec<u8>>>,
    }

    impl ProcessControl for FakeControl {
        fn launch(&self, executable: &OsStr) -> SchedulerResult<Pid> {
            self.launched.borrow_mut().push(executable.as_bytes().to_vec());
            let raw = 500 + self.next_pid.get();
            self.next_pid.set(self.next_pid.get() + 1);
            Ok(Pid::from_raw(raw))
        }
        fn resume(&self, _pid: Pid) {}
        fn pause(&self, _pid: Pid) {}
        fn kill(&self, pid: Pid) {
            self.killed.borrow_mut().push(pid);
        }
        fn arm_quantum(&self) {}
    }

    fn shell_and_two() -> SchedulerState {
        let mut state = SchedulerState::new();
        state.register(Pid::from_raw(10), "shell");
        state.register(Pid::from_raw(11), "./a");
        state.register(Pid::from_raw(12), "./b");
        state.start();
        state
    }

    fn text_handler() -> RequestHandler<Vec<u8>> {
        RequestHandler::new(ListingFormat::Text, Vec::new())
    }

    #[test]
    fn test_print_tasks_text() {
        let mut state = shell_and_two();
        let mut handler = text_handler();

        let code = handler
            .handle(&mut state, &FakeControl::default(), &Request::PrintTasks)
            .unwrap();

        assert_eq!(code, REPLY_OK);
        let output = String::from_utf8(handler.out().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Process Serial ID: 0  - PID: 10  - Name: shell  - Priority: LOW (currently running)",
                "Process Serial ID: 1  - PID: 11  - Name: ./a  - Priority: LOW",
                "Process Serial ID: 2  - PID: 12  - Name: ./b  - Priority: LOW",
            ]
        );
    }

    #[test]
    fn test_print_tasks_json() {
        let mut state = shell_and_two();
        let mut handler = RequestHandler::new(ListingFormat::Json, Vec::new());

        handler
            .handle(&mut state, &FakeControl::default(), &Request::PrintTasks)
            .unwrap();

        let output = String::from_utf8(handler.out().clone()).unwrap();
        let first: serde_json::Value = serde_json::from_str(output.lines().next().unwrap()).unwrap();
        assert_eq!(first["serial_id"], 0);
        assert_eq!(first["priority"], "LOW");
        assert_eq!(first["running"], true);
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_kill_sends_signal_but_keeps_registry() {
        let mut state = shell_and_two();
        let control = FakeControl::default();

        let code = text_handler()
            .handle(&mut state, &control, &Request::KillTask(2))
            .unwrap();

        assert_eq!(code, REPLY_OK);
        assert_eq!(*control.killed.borrow(), vec![Pid::from_raw(12)]);
        assert_eq!(state.registry().running_count(), 3);
    }

    #[test]
    fn test_kill_unknown_id() {
        let mut state = shell_and_two();
        let control = FakeControl::default();
        let mut handler = text_handler();

        assert_eq!(
            handler.handle(&mut state, &control, &Request::KillTask(9)).unwrap(),
            REPLY_NOT_FOUND
        );
        assert_eq!(
            handler.handle(&mut state, &control, &Request::KillTask(-1)).unwrap(),
            REPLY_NOT_FOUND
        );
        assert!(control.killed.borrow().is_empty());
        assert_eq!(state.registry().running_count(), 3);
    }

    #[test]
    fn test_exec_appends_without_touching_current() {
        let mut state = shell_and_two();

        let code = text_handler()
            .handle(
                &mut state,
                &FakeControl::default(),
                &Request::ExecTask("./c".into()),
            )
            .unwrap();

        assert_eq!(code, REPLY_OK);
        let added = state.registry().find_by_serial(3).unwrap();
        assert_eq!(added.name, "./c");
        assert_eq!(added.priority, Priority::Low);
        assert_eq!(state.current(), Some(Pid::from_raw(10)));
        assert_eq!(state.registry().iter().last().unwrap().serial_id, 3);
    }

    #[test]
    fn test_exec_launches_raw_path_and_lists_lossy_name() {
        let mut state = shell_and_two();
        let control = FakeControl::default();
        let path = OsStr::from_bytes(b"./bin\xff").to_os_string();

        let code = text_handler()
            .handle(&mut state, &control, &Request::ExecTask(path))
            .unwrap();

        assert_eq!(code, REPLY_OK);
        assert_eq!(*control.launched.borrow(), vec![b"./bin\xff".to_vec()]);
        assert_eq!(state.registry().find_by_serial(3).unwrap().name, "./bin\u{fffd}");
    }

    #[test]
    fn test_priority_changes() {
        let mut state = shell_and_two();
        let control = FakeControl::default();
        let mut handler = text_handler();

        assert_eq!(
            handler.handle(&mut state, &control, &Request::RaisePriority(1)).unwrap(),
            REPLY_OK
        );
        assert!(state.registry().find_by_serial(1).unwrap().is_high());

        assert_eq!(
            handler.handle(&mut state, &control, &Request::LowerPriority(1)).unwrap(),
            REPLY_OK
        );
        assert!(!state.registry().find_by_serial(1).unwrap().is_high());

        assert_eq!(
            handler.handle(&mut state, &control, &Request::RaisePriority(42)).unwrap(),
            REPLY_NOT_FOUND
        );
    }

    #[test]
    fn test_unknown_request() {
        let mut state = shell_and_two();
        let code = text_handler()
            .handle(&mut state, &FakeControl::default(), &Request::Unknown(99))
            .unwrap();
        assert_eq!(code, REPLY_UNSUPPORTED);
    }
}
