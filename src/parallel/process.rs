//! Worker-process pool
//!
//! Each worker is this same binary started in `worker` mode. The pool talks to
//! it over a line-delimited JSON protocol: one [`Task`] per line on the
//! worker's stdin, one [`Reply`] per line on its stdout. A worker handles one
//! task at a time and exits once its stdin is closed.

use super::core::ThreadPool;
use crate::workload::{WorkResult, square_number, square_number_tagged};
use anyhow::{Context, Result, anyhow, bail};
use crossbeam::channel::{Receiver, Sender, bounded};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

/// Subcommand that puts the binary into worker mode
pub const WORKER_SUBCOMMAND: &str = "worker";

/// How to start a worker process
#[derive(Debug, Clone)]
pub struct WorkerProgram {
    program: PathBuf,
    args: Vec<String>,
}

impl WorkerProgram {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec![WORKER_SUBCOMMAND.to_string()],
        }
    }

    /// Start workers with explicit arguments instead of the `worker` subcommand
    pub fn with_args<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Workers are launched from the currently running executable
    pub fn current_exe() -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to locate the running executable")?;
        Ok(Self::new(exe))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

/// A batch of items for one worker process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub items: Vec<u64>,
    /// Threads the worker may use for this batch; 1 runs it in place
    pub threads: usize,
    pub latency_ms: u64,
    /// Record the worker's process id on every result
    #[serde(default)]
    pub tag_pid: bool,
}

impl Task {
    /// One item, handled on the worker's main thread
    pub fn single(item: u64, latency_ms: u64) -> Self {
        Self {
            items: vec![item],
            threads: 1,
            latency_ms,
            tag_pid: false,
        }
    }

    /// A whole chunk, spread over up to `threads` threads and tagged with the pid
    pub fn chunk(items: Vec<u64>, threads: usize, latency_ms: u64) -> Self {
        Self {
            items,
            threads,
            latency_ms,
            tag_pid: true,
        }
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Execute the task in the current process
    pub fn run(&self) -> Result<Vec<WorkResult>> {
        let latency = self.latency();
        let tag_pid = self.tag_pid;
        let work = move |n: u64| {
            if tag_pid {
                square_number_tagged(n, latency)
            } else {
                square_number(n, latency)
            }
        };

        if self.threads <= 1 {
            Ok(self.items.iter().map(|&n| work(n)).collect())
        } else {
            ThreadPool::new(self.threads).map(self.items.clone(), work)
        }
    }
}

/// A worker's answer to one [`Task`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Results(Vec<WorkResult>),
    Error(String),
}

/// Worker loop: answer every task read from `input` until it closes.
pub fn serve<I: BufRead, O: Write>(input: I, mut output: O) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read task from the pool")?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Task>(&line) {
            Ok(task) => {
                tracing::debug!("Worker {} received {} items", std::process::id(), task.items.len());
                match task.run() {
                    Ok(results) => Reply::Results(results),
                    Err(e) => Reply::Error(format!("{e:#}")),
                }
            }
            Err(e) => Reply::Error(format!("Malformed task: {e}")),
        };

        serde_json::to_writer(&mut output, &reply).context("Failed to encode reply")?;
        output.write_all(b"\n")?;
        output.flush().context("Failed to send reply to the pool")?;
    }

    Ok(())
}

/// One live worker process and its pipes
struct WorkerProcess {
    id: usize,
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    stdout: BufReader<ChildStdout>,
}

impl WorkerProcess {
    fn spawn(id: usize, program: &WorkerProgram) -> Result<Self> {
        let mut child = program
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| {
                format!(
                    "Failed to spawn worker process {} ({})",
                    id,
                    program.program().display()
                )
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("Worker process {id} has no stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("Worker process {id} has no stdout"))?;

        tracing::debug!("Spawned worker process {} (pid {})", id, child.id());

        Ok(Self {
            id,
            child,
            stdin: Some(BufWriter::new(stdin)),
            stdout: BufReader::new(stdout),
        })
    }

    fn submit(&mut self, task: &Task) -> Result<Vec<WorkResult>> {
        let pid = self.child.id();
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow!("Worker process {} is already shut down", self.id))?;

        serde_json::to_writer(&mut *stdin, task).context("Failed to encode task")?;
        stdin.write_all(b"\n")?;
        stdin
            .flush()
            .with_context(|| format!("Failed to send task to worker process {pid}"))?;

        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .with_context(|| format!("Failed to read reply from worker process {pid}"))?;
        if read == 0 {
            bail!("Worker process {pid} exited before replying");
        }

        let reply: Reply = serde_json::from_str(&line)
            .with_context(|| format!("Malformed reply from worker process {pid}"))?;
        match reply {
            Reply::Results(results) => Ok(results),
            Reply::Error(message) => bail!("Worker process {pid} failed: {message}"),
        }
    }

    /// Close stdin so the worker exits, then reap it
    fn shutdown(&mut self) -> Result<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .with_context(|| format!("Failed to wait for worker process {}", self.id))?;
        if !status.success() {
            bail!("Worker process {} exited with {}", self.id, status);
        }
        Ok(())
    }
}

impl Drop for WorkerProcess {
    fn drop(&mut self) {
        // Not shut down cleanly, so don't wait on a worker that may be mid-task
        if self.stdin.take().is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Pool of exactly `size` worker processes
pub struct ProcessPool {
    workers: Vec<WorkerProcess>,
}

impl ProcessPool {
    pub fn spawn(size: usize, program: &WorkerProgram) -> Result<Self> {
        let workers = (0..size.max(1))
            .map(|id| WorkerProcess::spawn(id, program))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { workers })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Hand every task to the next idle worker and return replies in
    /// submission order.
    ///
    /// The first failing task (by submission index) fails the whole map.
    pub fn map(&mut self, tasks: Vec<Task>) -> Result<Vec<Vec<WorkResult>>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let total_tasks = tasks.len();
        let buffer_size = self.workers.len() * 2;
        let (work_tx, work_rx): (Sender<(usize, Task)>, Receiver<(usize, Task)>) =
            bounded(buffer_size);
        type Indexed = (usize, Result<Vec<WorkResult>>);
        let (result_tx, result_rx): (Sender<Indexed>, Receiver<Indexed>) = bounded(buffer_size);

        let mut indexed = crossbeam::thread::scope(|s| {
            // One dispatcher thread per worker process
            for worker in self.workers.iter_mut() {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();

                s.spawn(move |_| {
                    while let Ok((index, task)) = work_rx.recv() {
                        let reply = worker.submit(&task);
                        let failed = reply.is_err();
                        if result_tx.send((index, reply)).is_err() || failed {
                            break;
                        }
                    }
                });
            }

            s.spawn(move |_| {
                for indexed_task in tasks.into_iter().enumerate() {
                    if work_tx.send(indexed_task).is_err() {
                        break; // Every dispatcher stopped
                    }
                }
            });

            drop(work_rx);
            drop(result_tx);

            let mut results = Vec::with_capacity(total_tasks);
            while let Ok(result) = result_rx.recv() {
                results.push(result);
                if results.len() >= total_tasks {
                    break;
                }
            }
            results
        })
        .map_err(|_| anyhow!("Thread panic occurred while dispatching to worker processes"))?;

        indexed.sort_by_key(|(index, _)| *index);
        let replies = indexed
            .into_iter()
            .map(|(_, reply)| reply)
            .collect::<Result<Vec<_>>>()?;

        if replies.len() != total_tasks {
            bail!(
                "Process pool returned {} replies for {} tasks",
                replies.len(),
                total_tasks
            );
        }

        Ok(replies)
    }

    /// Stop every worker, reporting the first one that did not exit cleanly
    pub fn shutdown(mut self) -> Result<()> {
        let mut first_error = None;
        for worker in self.workers.iter_mut() {
            if let Err(e) = worker.shutdown() {
                tracing::warn!("{e:#}");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
