use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, PipeReader, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::config::TaskCommand;
use crate::error::SessionError;

/// A spawned task whose stdout and stderr share one pipe.
pub struct RunningTask {
    child: Child,
    output: Option<PipeReader>,
}

impl RunningTask {
    pub fn spawn(task: &TaskCommand) -> Result<Self, SessionError> {
        let stream_err = |source| SessionError::StreamUnavailable { source };
        let (reader, writer) = std::io::pipe().map_err(stream_err)?;
        let writer_for_stderr = writer.try_clone().map_err(stream_err)?;

        let mut cmd = Command::new(&task.program);
        cmd.args(&task.args)
            .current_dir(&task.working_dir)
            .stdin(Stdio::inherit())
            .stdout(writer)
            .stderr(writer_for_stderr);

        log::info!(
            "spawning {} {} in {}",
            task.program,
            task.args.join(" "),
            task.working_dir.display()
        );
        let child = cmd.spawn().map_err(|source| SessionError::Spawn {
            program: task.program.clone(),
            source,
        })?;
        // Command still holds the write ends; EOF only arrives once they are gone.
        drop(cmd);

        Ok(Self {
            child,
            output: Some(reader),
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Tee the combined output into `console` and `log_path` until EOF.
    pub fn stream<W: Write>(&mut self, console: &mut W, log_path: &Path) -> Result<u64, SessionError> {
        let output = self.output.take().ok_or_else(|| SessionError::StreamUnavailable {
            source: io::Error::other("output stream already consumed"),
        })?;
        stream_output(BufReader::new(output), console, log_path)
    }

    /// Block until the task exits. No timeout.
    pub fn wait(mut self) -> Result<i32, SessionError> {
        drop(self.output.take());
        let status = self
            .child
            .wait()
            .map_err(|source| SessionError::Wait { source })?;
        Ok(exit_code(status))
    }
}

/// Copy `reader` line by line to `console` and append each line to `log_path`.
///
/// The log file is opened on the first line, so a silent task leaves no file.
/// Lines keep their terminator; invalid UTF-8 is replaced. Returns the line count.
pub fn stream_output<R: BufRead, W: Write>(
    mut reader: R,
    console: &mut W,
    log_path: &Path,
) -> Result<u64, SessionError> {
    let log_err = |source| SessionError::OutputLog {
        path: log_path.to_path_buf(),
        source,
    };
    let console_err = |source| SessionError::Console { source };

    let mut log: Option<File> = None;
    let mut buf = Vec::with_capacity(1024);
    let mut count = 0u64;

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| SessionError::StreamUnavailable { source })?;
        if n == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);

        console.write_all(line.as_bytes()).map_err(console_err)?;
        console.flush().map_err(console_err)?;

        if log.is_none() {
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .map_err(log_err)?;
            log = Some(f);
        }
        if let Some(file) = log.as_mut() {
            file.write_all(line.as_bytes()).map_err(log_err)?;
        }
        count += 1;
    }

    drop(log);
    Ok(count)
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn tees_lines_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("output.txt");
        let mut console = Vec::new();
        let n = stream_output(Cursor::new("a\nb\n"), &mut console, &log).unwrap();
        assert_eq!(n, 2);
        assert_eq!(console, b"a\nb\n");
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "a\nb\n");
    }

    #[test]
    fn keeps_unterminated_last_line() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("output.txt");
        let mut console = Vec::new();
        stream_output(Cursor::new("one\ntwo"), &mut console, &log).unwrap();
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "one\ntwo");
    }

    #[test]
    fn no_output_means_no_log_file() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("output.txt");
        let mut console = Vec::new();
        let n = stream_output(Cursor::new(""), &mut console, &log).unwrap();
        assert_eq!(n, 0);
        assert!(!log.exists());
        assert!(console.is_empty());
    }

    #[test]
    fn appends_to_existing_log() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("output.txt");
        std::fs::write(&log, "earlier\n").unwrap();
        stream_output(Cursor::new("later\n"), &mut Vec::new(), &log).unwrap();
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("output.txt");
        let mut console = Vec::new();
        stream_output(Cursor::new(b"ok \xff\n".to_vec()), &mut console, &log).unwrap();
        assert_eq!(String::from_utf8(console).unwrap(), "ok \u{FFFD}\n");
    }

    #[cfg(unix)]
    #[test]
    fn merges_stdout_and_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let task = TaskCommand {
            program: "/bin/sh".into(),
            args: vec!["-c".into(), "echo out; echo err 1>&2; exit 4".into()],
            working_dir: tmp.path().to_path_buf(),
        };
        let log = tmp.path().join("output.txt");
        let mut console = Vec::new();
        let mut running = RunningTask::spawn(&task).unwrap();
        assert_eq!(running.stream(&mut console, &log).unwrap(), 2);
        assert!(running.stream(&mut console, &log).is_err());
        assert_eq!(running.wait().unwrap(), 4);
        assert_eq!(String::from_utf8(console).unwrap(), "out\nerr\n");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let task = TaskCommand {
            program: "definitely-not-a-real-program-7f3a".into(),
            args: vec![],
            working_dir: tmp.path().to_path_buf(),
        };
        assert!(matches!(
            RunningTask::spawn(&task),
            Err(SessionError::Spawn { .. })
        ));
    }
}
