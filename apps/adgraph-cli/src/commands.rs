//! Subcommand handlers. Results go to stdout as JSON; logs go to stderr.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use tokio::sync::mpsc;

use adgraph_advideos::{Video, VideoService};

pub async fn get(service: &VideoService, id: &str) -> anyhow::Result<()> {
    match service.get(id).await? {
        Some(video) => print_pretty(&video),
        None => bail!("video {id} not found"),
    }
}

pub async fn upload(
    service: &VideoService,
    account: &str,
    title: Option<&str>,
    file: &Path,
) -> anyhow::Result<()> {
    let handle = tokio::fs::File::open(file)
        .await
        .with_context(|| format!("failed to open {}", file.display()))?;
    let size = handle.metadata().await?.len();
    let title = match title {
        Some(t) => t.to_string(),
        None => default_title(file),
    };

    tracing::info!(file = %file.display(), size, title = %title, "uploading");
    let reader = tokio::io::BufReader::new(handle);
    let video = service.upload(account, &title, size, reader).await?;
    print_pretty(&video)
}

pub async fn list(service: &VideoService, account: &str) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<Video>(64);

    let printer = tokio::spawn(async move {
        let stdout = std::io::stdout();
        let mut count = 0usize;
        while let Some(video) = rx.recv().await {
            let line = serde_json::to_string(&video)?;
            writeln!(stdout.lock(), "{line}")?;
            count += 1;
        }
        Ok::<usize, anyhow::Error>(count)
    });

    let result = service.read_list(account, &tx).await;
    drop(tx);
    let count = printer.await.context("printer task failed")??;
    result?;

    tracing::info!(account = %account, videos = count, "list complete");
    Ok(())
}

fn print_pretty(video: &Video) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(video)?);
    Ok(())
}

/// File name without extension, or the full name if it has no stem.
fn default_title(file: &Path) -> String {
    file.file_stem()
        .or_else(|| file.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string())
}
