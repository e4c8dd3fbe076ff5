//! Utility functions and helpers.

use tokio::sync::mpsc;

/// Send a value through a channel, logging a warning if the receiver is gone.
pub async fn send_or_log<T>(tx: &mpsc::Sender<T>, value: T, context: &str) {
    if let Err(e) = tx.send(value).await {
        tracing::warn!("Failed to send {}: {}", context, e);
    }
}

/// Open a URL or file in the default browser.
pub fn open_url(url: &str) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    std::process::Command::new("open").arg(url).spawn()?;

    // xdg-open covers Linux desktops; wslview covers WSL
    #[cfg(not(target_os = "macos"))]
    std::process::Command::new("xdg-open")
        .arg(url)
        .spawn()
        .or_else(|_| std::process::Command::new("wslview").arg(url).spawn())?;

    tracing::debug!("Opened {}", url);
    Ok(())
}
