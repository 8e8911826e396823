//! Request/response exchange with the execution engine.

use crate::cancel::CancelToken;
use crate::config::DEFAULT_ENGINE_TIMEOUT;
use crate::errors::CoreError;
use crate::models::{ExecutionResult, ValidatedCommand};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Raw reply of one engine exchange, before decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Whether the engine signalled success (exit status zero for a process).
    pub success: bool,
    /// Exit code if the engine exited normally.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Capability to run one encoded request against an execution engine.
///
/// The engine may be a child process, an in-process library or a remote
/// service; the dispatcher only sees the encoded payload and the raw reply.
pub trait ExecutionPort {
    fn execute(&self, payload: &str) -> crate::Result<EngineOutput>;
}

impl<P: ExecutionPort + ?Sized> ExecutionPort for &P {
    fn execute(&self, payload: &str) -> crate::Result<EngineOutput> {
        (**self).execute(payload)
    }
}

/// Engine reached as a child process: request on stdin, result on stdout.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: PathBuf,
    timeout: Duration,
    cancel: CancelToken,
}

impl ProcessEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_ENGINE_TIMEOUT,
            cancel: CancelToken::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Aborts the wait, killing the engine, once `cancel` is raised.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn timed_out(&self) -> CoreError {
        CoreError::Timeout {
            limit: self.timeout,
        }
    }

    fn wait_bounded(&self, child: &mut Child, deadline: Instant) -> crate::Result<ExitStatus> {
        loop {
            if self.cancel.is_cancelled() {
                warn!("cancelled while waiting for the engine, killing it");
                let _ = child.kill();
                let _ = child.wait();
                return Err(CoreError::UserCancelled);
            }
            let polled = child
                .try_wait()
                .map_err(|err| CoreError::io("waiting for the engine", err))?;
            if let Some(status) = polled {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                warn!(limit = ?self.timeout, "engine exceeded time limit, killing it");
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Waits for a reader thread, giving up at the same deadline as the
    /// engine itself. Output pipes held open by a grandchild would
    /// otherwise block past the limit.
    fn collect(
        &self,
        reader: Receiver<io::Result<String>>,
        deadline: Instant,
        context: &str,
    ) -> crate::Result<String> {
        loop {
            self.cancel.check()?;
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(limit = ?self.timeout, "engine output still open at time limit");
                return Err(self.timed_out());
            }
            match reader.recv_timeout(remaining.min(POLL_INTERVAL)) {
                Ok(read) => return read.map_err(|err| CoreError::io(context, err)),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(CoreError::io(
                        context,
                        io::Error::other("reader thread exited without output"),
                    ))
                }
            }
        }
    }
}

#[cfg(unix)]
fn interrupted(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(2)
}

#[cfg(not(unix))]
fn interrupted(_status: &ExitStatus) -> bool {
    false
}

impl ExecutionPort for ProcessEngine {
    fn execute(&self, payload: &str) -> crate::Result<EngineOutput> {
        let _watch = self.cancel.watch();
        self.cancel.check()?;

        debug!(program = %self.program.display(), "starting engine");
        let deadline = Instant::now() + self.timeout;
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                CoreError::unavailable(
                    format!("failed to start {}: {err}", self.program.display()),
                    vec![self.program.clone()],
                )
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        if let Some(mut stdin) = child.stdin.take() {
            let written = stdin
                .write_all(payload.as_bytes())
                .and_then(|()| stdin.write_all(b"\n"));
            // An engine that exits before reading still gets its output decoded.
            if let Err(err) = written {
                if err.kind() != io::ErrorKind::BrokenPipe {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CoreError::io("writing the engine request", err));
                }
            }
        }

        let status = self.wait_bounded(&mut child, deadline)?;
        // A terminal Ctrl-C reaches the engine too; it may die before the
        // handler raises the flag.
        if interrupted(&status) {
            return Err(CoreError::UserCancelled);
        }
        let stdout = self.collect(stdout, deadline, "reading engine stdout")?;
        let stderr = self.collect(stderr, deadline, "reading engine stderr")?;

        debug!(code = ?status.code(), "engine finished");
        Ok(EngineOutput {
            success: status.success(),
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

fn drain<R>(pipe: Option<R>) -> Receiver<io::Result<String>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let read = match pipe {
            Some(mut pipe) => pipe.read_to_end(&mut buf).map(|_| ()),
            None => Ok(()),
        };
        let _ = tx.send(read.map(|()| String::from_utf8_lossy(&buf).into_owned()));
    });
    rx
}

/// Serializes the command into the engine's one-line JSON request.
pub fn encode_request(cmd: &ValidatedCommand) -> crate::Result<String> {
    serde_json::to_string(cmd).map_err(|err| CoreError::protocol(err, format!("{cmd:?}")))
}

/// Maps a raw engine reply to a result or a typed failure.
///
/// A failing engine that still printed a well-formed result is reporting its
/// own failure, so that result is returned as-is.
pub fn decode_response(output: EngineOutput) -> crate::Result<ExecutionResult> {
    let body = output.stdout.trim();
    let decoded = serde_json::from_str::<ExecutionResult>(body);

    match (output.success, decoded) {
        (_, Ok(result)) => {
            if !output.success {
                warn!(code = ?output.code, "engine exited with failure status");
            }
            Ok(result)
        }
        (true, Err(err)) => Err(CoreError::protocol(err, output.stdout)),
        (false, Err(_)) => Err(CoreError::EngineError {
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        }),
    }
}

/// Sends validated commands through an [`ExecutionPort`].
#[derive(Debug)]
pub struct Dispatcher<P: ExecutionPort> {
    port: P,
}

impl<P: ExecutionPort> Dispatcher<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn execute(&self, cmd: ValidatedCommand) -> crate::Result<ExecutionResult> {
        let payload = encode_request(&cmd)?;
        debug!(request = %payload, "dispatching command");
        let output = self.port.execute(&payload)?;
        decode_response(output)
    }
}
