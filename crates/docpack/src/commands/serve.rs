//! Preview server command.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

/// Run the serve command.
pub async fn run(port: u16, dir: PathBuf) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'docpack generate' first.",
            dir.display()
        );
    }

    let root = site_root(&dir)?;

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", root.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(&root));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Open browser
    let url = format!("http://{}", addr);
    let _ = open::that(&url);

    axum::serve(listener, app).await?;

    Ok(())
}

/// The directory holding `index.html`: `dir` itself, or its only bundle.
fn site_root(dir: &Path) -> Result<PathBuf> {
    if dir.join("index.html").exists() {
        return Ok(dir.to_path_buf());
    }

    let bundles: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.join("index.html").exists())
        .collect();

    match bundles.as_slice() {
        [single] => Ok(single.clone()),
        [] => anyhow::bail!("No bundle found in {}", dir.display()),
        _ => anyhow::bail!(
            "Several bundles found in {}; pass one of them with --dir",
            dir.display()
        ),
    }
}
