//! Lyric source client
//!
//! Lyric files are plain LRC text. `http://` and `https://` sources are
//! fetched over the network; anything else is read from disk.

use anyhow::Context;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LyricsClient {
    client: reqwest::Client,
}

impl LyricsClient {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("build lyrics http client")?;
        Ok(Self { client })
    }

    /// Fetch the raw LRC text behind `source`.
    pub async fn fetch(&self, source: &str) -> anyhow::Result<String> {
        if is_remote(source) {
            let response = self
                .client
                .get(source)
                .send()
                .await
                .with_context(|| format!("request {source}"))?;

            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("lyrics fetch failed: {status}");
            }

            response.text().await.with_context(|| format!("read body of {source}"))
        } else {
            let path = source.strip_prefix("file://").unwrap_or(source);
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("read {path}"))
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LyricsClient {
        LyricsClient::new("revelation-test", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/a.lrc"));
        assert!(is_remote("http://example.com/a.lrc"));
        assert!(!is_remote("file:///tmp/a.lrc"));
        assert!(!is_remote("lyrics/a.lrc"));
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let path = std::env::temp_dir().join(format!("revelation-src-{}.lrc", std::process::id()));
        std::fs::write(&path, "[00:01.00]Hello\n").unwrap();

        let text = client().fetch(&path.display().to_string()).await.unwrap();
        assert_eq!(text, "[00:01.00]Hello\n");

        let url = format!("file://{}", path.display());
        assert!(client().fetch(&url).await.is_ok());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_fetch_missing_file_fails() {
        let path = std::env::temp_dir().join("revelation-definitely-missing.lrc");
        assert!(client().fetch(&path.display().to_string()).await.is_err());
    }
}
