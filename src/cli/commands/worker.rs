//! Hidden worker mode used by the process pools

use crate::parallel::process::serve;
use anyhow::{Context, Result};

/// Answer tasks on stdin until the pool closes it
pub async fn execute() -> Result<()> {
    tracing::debug!("Worker {} ready", std::process::id());

    tokio::task::spawn_blocking(|| {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        serve(stdin.lock(), stdout.lock())
    })
    .await
    .context("Worker task was cancelled or panicked")?
}
