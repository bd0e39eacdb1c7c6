/*!
 * sigsched - Main Entry Point
 *
 * Usage: sigsched <executable> [<executable>...]
 *
 * Every argument is scheduled as a task next to the shell. Exits 0 once all
 * tasks have terminated and 1 on any fatal setup error.
 */

use sigsched::{bootstrap, init_tracing, SchedulerConfig};
use std::ffi::OsString;
use tracing::info;

fn main() -> miette::Result<()> {
    init_tracing();

    let config = SchedulerConfig::from_env()?;
    let workload: Vec<OsString> = std::env::args_os().skip(1).collect();

    info!(
        shell = %config.shell_executable,
        workload = workload.len(),
        "sigsched starting"
    );

    let scheduler = bootstrap(&config, &workload)?;
    scheduler.run()?;

    Ok(())
}
