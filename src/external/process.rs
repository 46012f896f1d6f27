use std::process::{Child, Command, ExitStatus};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// 按空白切分命令行并执行（不经过 shell），阻塞直到退出或超时。
///
/// 子进程放入独立进程组；超时后向整个进程组发送 SIGTERM 并回收子进程，再返回错误。
pub fn run_command(command_line: &str, timeout: Duration) -> Result<()> {
    let argv: Vec<&str> = command_line.split_whitespace().collect();
    let Some((program, args)) = argv.split_first() else {
        return Err(Error::ExternalProcess {
            command: command_line.to_string(),
            reason: "empty command line".to_string(),
        });
    };

    info!("running: {}", command_line);
    let mut cmd = Command::new(program);
    cmd.args(args);
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let fail = |reason: String| Error::ExternalProcess { command: command_line.to_string(), reason };

    let mut child = cmd.spawn().map_err(|e| fail(format!("cannot spawn: {}", e)))?;
    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait().map_err(|e| fail(format!("cannot wait: {}", e)))? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                warn!("command exceeded timeout of {:?}: {}", timeout, command_line);
                terminate_group(&mut child);
                return Err(fail(format!("timed out after {} s", timeout.as_secs_f64())));
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    };

    check_status(status).map_err(fail)?;
    debug!("finished: {}", command_line);
    Ok(())
}

fn check_status(status: ExitStatus) -> std::result::Result<(), String> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(format!("exited with status {}", code)),
        None => Err("terminated by signal".to_string()),
    }
}

#[cfg(unix)]
fn terminate_group(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    // process_group(0) 使子进程 pid 即进程组 id
    let pgid = Pid::from_raw(child.id() as i32);
    if let Err(e) = killpg(pgid, Signal::SIGTERM) {
        warn!("killpg({}) failed: {}; killing child only", pgid, e);
        let _ = child.kill();
    }
    let _ = child.wait();
}

#[cfg(not(unix))]
fn terminate_group(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn success_and_failure_status() {
        run_command("true", Duration::from_secs(5)).unwrap();
        let err = run_command("false", Duration::from_secs(5)).unwrap_err();
        match err {
            Error::ExternalProcess { command, reason } => {
                assert_eq!(command, "false");
                assert!(reason.contains("status 1"), "{}", reason);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn timeout_terminates_process_group() {
        let start = Instant::now();
        let err = run_command("sleep 30", Duration::from_millis(200)).unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(10));
        assert!(err.to_string().contains("timed out"), "{}", err);
    }

    #[test]
    fn timeout_kills_background_children() {
        let tmp = tempfile::tempdir().unwrap();
        let marker = tmp.path().join("marker");
        let script = tmp.path().join("spawn.sh");
        std::fs::write(
            &script,
            format!("#!/bin/sh\n(sleep 1; touch {}) &\nsleep 30\n", marker.display()),
        )
        .unwrap();

        let err = run_command(&format!("sh {}", script.display()), Duration::from_millis(200)).unwrap_err();
        assert!(err.to_string().contains("timed out"), "{}", err);
        std::thread::sleep(Duration::from_secs(2));
        assert!(!marker.exists(), "background child outlived the timeout");
    }

    #[test]
    fn missing_program_and_empty_command() {
        assert!(run_command("sfs-graph-no-such-tool --x", Duration::from_secs(1)).is_err());
        assert!(run_command("   ", Duration::from_secs(1)).is_err());
    }
}
