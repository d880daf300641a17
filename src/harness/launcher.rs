use crate::strategy::Strategy;
use anyhow::{Context, Result};
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::Instant;

/// Captured outcome of running one strategy in isolation
#[derive(Debug, Clone, Default)]
pub struct IsolatedRun {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the run never started or was killed by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
    /// Wall-clock time from spawn to exit
    pub elapsed: Duration,
}

impl IsolatedRun {
    /// A run that could not even be started
    pub fn launch_failed(error: &anyhow::Error, elapsed: Duration) -> Self {
        Self {
            stderr: format!("{error:#}"),
            elapsed,
            ..Self::default()
        }
    }

    /// Short description of why the run failed, if it did
    pub fn failure_reason(&self) -> Option<String> {
        if self.success {
            return None;
        }
        let stderr = self.stderr.trim();
        Some(match (stderr.is_empty(), self.exit_code) {
            (false, _) => stderr.to_string(),
            (true, Some(code)) => format!("exited with status {code}"),
            (true, None) => "terminated without an exit status".to_string(),
        })
    }
}

/// Runs a strategy as an independent unit and captures what it produced.
///
/// Failures are reported inside the returned [`IsolatedRun`], never as an
/// error, so one broken strategy cannot stop the comparison.
pub trait Launcher {
    fn launch(&self, strategy: Strategy) -> impl Future<Output = IsolatedRun> + Send;
}

/// Launches each strategy as a subprocess of the given program
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    /// Global flags placed before the strategy subcommand
    forwarded_args: Vec<String>,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<PathBuf>, forwarded_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            forwarded_args,
        }
    }

    /// Launch runners from the currently running executable
    pub fn current_exe(forwarded_args: Vec<String>) -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to locate the running executable")?;
        Ok(Self::new(exe, forwarded_args))
    }
}

impl Launcher for ProcessLauncher {
    async fn launch(&self, strategy: Strategy) -> IsolatedRun {
        tracing::debug!(
            "Launching {} {} {}",
            self.program.display(),
            self.forwarded_args.join(" "),
            strategy.subcommand()
        );

        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(&self.forwarded_args)
            .arg(strategy.subcommand())
            .stdin(Stdio::null())
            .output()
            .await;
        let elapsed = start.elapsed();

        match output {
            Ok(output) => IsolatedRun {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code(),
                success: output.status.success(),
                elapsed,
            },
            Err(e) => {
                let error = anyhow::Error::new(e).context(format!(
                    "Failed to launch {} {}",
                    self.program.display(),
                    strategy.subcommand()
                ));
                tracing::warn!("{error:#}");
                IsolatedRun::launch_failed(&error, elapsed)
            }
        }
    }
}
