//! External source clients.

pub mod fatsecret;
pub mod marmiton;
pub mod wikidata;

use scraper::Html;

use larder_common::sandbox::SandboxClient;
use larder_common::{LarderError, Result};

/// GET a page and parse it into a traversable document tree. Fails on
/// network errors and non-2xx statuses; whether that aborts the category
/// or skips the single item is the caller's decision. No retry lives at
/// this layer — retry policy belongs to the nutrition client, where quota
/// errors are distinguishable from transport errors.
pub async fn fetch_document(client: &SandboxClient, url: &str) -> Result<Html> {
    let text = fetch_text(client, url).await?;
    Ok(Html::parse_document(&text))
}

pub(crate) async fn fetch_text(client: &SandboxClient, url: &str) -> Result<String> {
    let resp = client.get(url)?.send().await?;
    if !resp.status().is_success() {
        return Err(LarderError::Http {
            status: resp.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(resp.text().await?)
}
