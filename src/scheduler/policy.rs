/*!
 * Scheduling Policy
 *
 * Round robin with opportunistic priority: a bounded forward scan picks the
 * first HIGH task it meets, otherwise the plain successor runs. Tasks of
 * equal priority are ordered purely by arrival.
 */

use crate::core::types::Pid;
use crate::process::registry::TaskRegistry;

/// Pick the task to run after `current`
///
/// The scan covers `running_count` records starting at the successor, so it
/// ends on `current` itself. Returns `None` only if `current` is not
/// registered.
pub fn select_next(registry: &TaskRegistry, current: Pid) -> Option<Pid> {
    let position = registry.position(current)?;
    Some(scan(registry, position, registry.running_count()))
}

/// Pick the task to run after `departing`, which is about to be removed
///
/// The window excludes `departing` itself. Returns `None` when nothing else
/// is left.
pub fn select_successor(registry: &TaskRegistry, departing: Pid) -> Option<Pid> {
    let position = registry.position(departing)?;
    let others = registry.running_count() - 1;
    if others == 0 {
        return None;
    }
    Some(scan(registry, position, others))
}

fn scan(registry: &TaskRegistry, position: usize, window: usize) -> Pid {
    (1..=window)
        .map(|step| registry.nth_after(position, step))
        .find(|task| task.is_high())
        .unwrap_or_else(|| registry.nth_after(position, 1))
        .pid
}
