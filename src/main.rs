use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use feedmux::config::Config;
use feedmux::{aggregate, atom, feed, sources};

#[derive(Parser, Debug)]
#[command(name = "feedmux", about = "Aggregates RSS/Atom feeds into a single Atom feed")]
struct Args {
    /// Newline-delimited list of feed source URLs
    #[arg(long, value_name = "FILE", default_value = "feeds.txt")]
    sources: PathBuf,

    /// Output path for the generated Atom document
    #[arg(long, value_name = "FILE", default_value = "public/feed.xml")]
    output: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Warnings and errors go to stderr so the stdout summary stays clean
    // for CI logs.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env().context("Invalid configuration")?;

    let urls = sources::load(&args.sources).await?;
    if urls.is_empty() {
        tracing::warn!(path = %args.sources.display(), "Source list contains no feed URLs");
    }

    let client = reqwest::Client::builder()
        .user_agent(feed::USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;

    let entries = feed::load_all(&client, &urls).await;
    let now = Utc::now();
    let items = aggregate::aggregate(entries, &config, now);
    let document = atom::render(&items, &config, now)?;

    write_output(&args.output, &document)?;
    println!("Generated {} items -> {}", items.len(), args.output.display());
    Ok(())
}

/// Writes the rendered document with the write-to-temp-then-rename
/// pattern, creating the containing directory if absent. The output path
/// never holds a partial document.
fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    // Randomized temp filename so concurrent runs cannot collide on it.
    use std::time::{SystemTime, UNIX_EPOCH};
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", suffix));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temporary file: {}", temp_path.display()))?;

    file.write_all(content.as_bytes()).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!("Failed to write output to: {}", temp_path.display())
    })?;

    file.sync_all().with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!("Failed to sync output to disk: {}", temp_path.display())
    })?;

    drop(file);

    std::fs::rename(&temp_path, path).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!("Failed to move output into place: {}", path.display())
    })?;

    Ok(())
}
