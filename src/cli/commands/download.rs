//! The download command: every URL through the pipeline, one at a time.

use crate::pipeline::{Session, process_url};

/// Process `urls` in order.
///
/// A failing URL is reported in the interface language and the loop moves on.
/// Returns the number of URLs that failed.
pub async fn cmd_download(session: &Session, urls: &[String]) -> usize {
    let mut failed = 0;

    for url in urls {
        if let Err(e) = process_url(session, url).await {
            failed += 1;
            tracing::error!("Failed to process {}: {}", url, e);
            println!("{}", session.dict.format("track_failed", &[url, &e]));
        }
    }

    if failed > 0 {
        tracing::warn!("{} of {} URLs failed", failed, urls.len());
    }
    failed
}
