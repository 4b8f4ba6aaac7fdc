//! Foreign-runtime lifecycle and wire protocol.
//!
//! A `RuntimeProcess` owns one managed subprocess (a Python, R or Java
//! worker). Acquisition is lazy: adapters only spawn after language
//! resolution succeeds. Release is guaranteed on every exit path; the
//! child is killed on drop, including hook failures and panics.
//!
//! The wire protocol is one JSON object per line over the child's stdio.
//! The worker announces readiness with a single `ready` line; the
//! handshake is bounded by the configured startup timeout.
//!
//! Transport errors here are plain `anyhow` errors; adapters map them into
//! the taxonomy (`ModelLoad` vs `Prediction`) based on which operation was
//! in flight, so operators can tell infrastructure problems from model
//! problems.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Line a worker prints once it is ready to accept requests.
pub const READY_TOKEN: &str = "ready";

pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Requests the host sends to a worker.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WorkerRequest {
    Load {
        artifact: String,
        code_dir: String,
        problem_type: String,
    },
    Predict {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// Responses a worker sends back, one per request.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Set by workers asked to load without an artifact when the hook
    /// file defines no `load_model` hook.
    #[serde(default)]
    pub missing_load_model: bool,
    #[serde(default)]
    pub class_labels: Option<Vec<String>>,
    #[serde(default)]
    pub predictions: Option<Vec<f64>>,
    #[serde(default)]
    pub probabilities: Option<Vec<Vec<f64>>>,
}

/// One managed worker subprocess.
#[derive(Debug)]
pub struct RuntimeProcess {
    name: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl RuntimeProcess {
    /// Spawn a worker and wait for its `ready` line, bounded by
    /// `startup_timeout`. The child is killed before any error return.
    pub fn spawn(
        name: &str,
        command: &mut Command,
        startup_timeout: Duration,
    ) -> Result<Self, ScoreError> {
        let unavailable = |source| ScoreError::RuntimeUnavailable {
            runtime: name.to_string(),
            source,
        };

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(unavailable)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| unavailable(std::io::Error::other("worker stdin not captured")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| unavailable(std::io::Error::other("worker stdout not captured")))?;

        // The handshake read happens on a helper thread so the wait can be
        // bounded; on timeout the kill below unblocks the reader.
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();
            let result = reader.read_line(&mut line).map(|_| line);
            let _ = tx.send((result, reader));
        });

        match rx.recv_timeout(startup_timeout) {
            Ok((Ok(line), stdout)) if line.trim() == READY_TOKEN => Ok(Self {
                name: name.to_string(),
                child,
                stdin,
                stdout,
            }),
            Ok((Ok(line), _)) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(unavailable(std::io::Error::other(format!(
                    "unexpected worker startup output: {line:?}"
                ))))
            }
            Ok((Err(source), _)) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(unavailable(source))
            }
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(ScoreError::RuntimeStartupTimeout {
                    runtime: name.to_string(),
                    timeout_secs: startup_timeout.as_secs(),
                })
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// One request/response exchange. Transport failures are errors;
    /// worker-side failures come back as a response with `ok: false` and
    /// are interpreted by the adapter, which knows the operation in flight.
    pub fn request(&mut self, request: &WorkerRequest) -> anyhow::Result<WorkerResponse> {
        let line = serde_json::to_string(request).context("failed to encode worker request")?;
        writeln!(self.stdin, "{line}")
            .and_then(|()| self.stdin.flush())
            .with_context(|| format!("{} worker pipe closed", self.name))?;

        let mut reply = String::new();
        let n = self
            .stdout
            .read_line(&mut reply)
            .with_context(|| format!("failed to read {} worker response", self.name))?;
        if n == 0 {
            anyhow::bail!("{} worker exited before responding", self.name);
        }

        serde_json::from_str(reply.trim())
            .with_context(|| format!("malformed {} worker response", self.name))
    }
}

impl Drop for RuntimeProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
