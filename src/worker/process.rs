//! Process-per-reducer pool
//!
//! Each reducer runs in a child process created by re-executing the current
//! binary in reducer mode (`--mode reducer --stat <kind>`). The child gets its
//! own copy of the sample on stdin and writes one framed [`StatResult`] to its
//! stdout.
//!
//! All children share a single result pipe as their stdout. The parent keeps
//! the read end and drops its copy of the write end as soon as collection
//! starts, so end-of-file on the pipe means every child has exited.

use super::protocol::{self, Message};
use super::{WorkerError, WorkerPool};
use crate::coordinator::RunMode;
use crate::sample::Sample;
use crate::stats::{StatKind, StatResult};
use log::{debug, warn};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::unix::io::FromRawFd;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Create a pipe whose ends are not inherited across exec
///
/// Children receive a duplicate of the write end as their stdout; `dup2`
/// clears the close-on-exec flag on that copy only.
fn result_pipe() -> io::Result<(File, File)> {
    let mut fds = [0 as libc::c_int; 2];

    #[cfg(target_os = "linux")]
    // SAFETY: fds is a valid array of two c_ints
    let rc = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) };
    #[cfg(not(target_os = "linux"))]
    // SAFETY: fds is a valid array of two c_ints
    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };

    if rc == -1 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: both descriptors were just returned by the kernel and are owned here
    let (reader, writer) = unsafe { (File::from_raw_fd(fds[0]), File::from_raw_fd(fds[1])) };

    // No atomic pipe2 here; another thread may fork in between
    #[cfg(not(target_os = "linux"))]
    for fd in fds {
        // SAFETY: fd is open for the lifetime of reader/writer
        if unsafe { libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC) } == -1 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok((reader, writer))
}

/// Pool that runs every reducer in a child process
pub struct ProcessPool {
    /// Executable to re-run in reducer mode
    program: PathBuf,
    /// Pass `--debug` through to children
    debug: bool,
    reader: File,
    /// Parent's copy of the write end; `None` once collection started
    writer: Option<File>,
    children: Vec<(StatKind, Child)>,
}

impl ProcessPool {
    /// Pool that re-executes the running binary
    pub fn new() -> Result<Self, WorkerError> {
        let program = std::env::current_exe()?;
        Self::with_program(program)
    }

    /// Pool that runs `program` in reducer mode
    pub fn with_program(program: impl Into<PathBuf>) -> Result<Self, WorkerError> {
        let (reader, writer) = result_pipe()?;
        Ok(Self {
            program: program.into(),
            debug: false,
            reader,
            writer: Some(writer),
            children: Vec::with_capacity(StatKind::ALL.len()),
        })
    }

    pub fn forward_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn command(&self, kind: StatKind) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--mode").arg("reducer");
        cmd.arg("--stat").arg(kind.as_str());
        if self.debug {
            cmd.arg("--debug");
        }
        cmd
    }
}

impl WorkerPool for ProcessPool {
    fn mode(&self) -> RunMode {
        RunMode::Processes
    }

    fn spawn(&mut self, kind: StatKind, sample: &Sample) -> Result<(), WorkerError> {
        let writer = self.writer.as_ref().ok_or(WorkerError::Closed)?;
        let spawn_err = |source: io::Error| WorkerError::Spawn { kind, source };

        let stdout = writer.try_clone().map_err(spawn_err)?;
        let mut child = self
            .command(kind)
            .stdin(Stdio::piped())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_err)?;

        debug!("spawned {} worker process (pid {})", kind, child.id());

        let stdin = child.stdin.take();
        // Reaped by join() even if handing over the sample fails
        self.children.push((kind, child));

        let mut stdin = stdin.ok_or_else(|| {
            spawn_err(io::Error::new(io::ErrorKind::BrokenPipe, "child stdin not captured"))
        })?;

        match protocol::write_message(&mut stdin, &Message::Sample(Cow::Borrowed(sample.values()))) {
            Ok(()) => Ok(()),
            Err(WorkerError::Io(source)) => Err(spawn_err(source)),
            Err(e) => Err(e),
        }
        // stdin dropped here; the child sees end of input
    }

    fn recv(&mut self) -> Result<Option<StatResult>, WorkerError> {
        self.writer.take();

        match protocol::read_message(&mut self.reader)? {
            Some(Message::Result(result)) => Ok(Some(result)),
            Some(other) => Err(WorkerError::Protocol(format!(
                "unexpected message on result pipe: {:?}",
                other
            ))),
            None => Ok(None),
        }
    }

    fn join(&mut self) -> Result<(), WorkerError> {
        self.writer.take();

        let mut first_err = None;
        for (kind, mut child) in self.children.drain(..) {
            let pid = child.id();
            match child.wait() {
                Ok(status) if status.success() => {
                    debug!("reaped {} worker process (pid {})", kind, pid);
                }
                Ok(status) => {
                    first_err.get_or_insert(WorkerError::Exited { kind, status });
                }
                Err(e) => {
                    first_err.get_or_insert(WorkerError::Io(e));
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for ProcessPool {
    fn drop(&mut self) {
        self.writer.take();
        for (kind, child) in self.children.iter_mut() {
            if let Err(e) = child.wait() {
                warn!("failed to reap {} worker process (pid {}): {}", kind, child.id(), e);
            }
        }
    }
}

/// Reducer process body
///
/// Reads the sample from `input`, computes `kind`, and writes the tagged result
/// to `output` as a single frame. `output` must not split writes: pass the raw
/// stdout descriptor, not the line-buffered `Stdout` handle.
pub fn serve_reducer<R: Read, W: Write>(
    kind: StatKind,
    mut input: R,
    mut output: W,
) -> Result<StatResult, WorkerError> {
    let values = match protocol::read_message(&mut input)? {
        Some(Message::Sample(values)) => values,
        Some(other) => {
            return Err(WorkerError::Protocol(format!(
                "expected sample, got {:?}",
                other
            )))
        }
        None => return Err(WorkerError::Protocol("no sample received".into())),
    };

    let value = kind
        .compute(&values)
        .ok_or_else(|| WorkerError::Protocol("received an empty sample".into()))?;
    let result = StatResult::new(kind, value);

    protocol::write_message(&mut output, &Message::Result(result))?;
    debug!("{} worker (pid {}) reported {}", kind, std::process::id(), value);
    Ok(result)
}
