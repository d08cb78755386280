use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

use crate::error::LarderError;

/// An allowlist-capped HTTP client: requests may only target the external
/// services the pipelines are meant to talk to. Everything else is refused
/// before a connection is attempted.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a new SandboxClient with the default allowlist of data sources.
    pub fn new() -> Result<Self, LarderError> {
        let mut allowlist = HashSet::new();
        let domains = vec![
            "www.marmiton.org",           // recipe listings and detail pages
            "platform.fatsecret.com",     // nutrition API
            "translate.googleapis.com",   // translation endpoint
            "query.wikidata.org",         // sandwich/ingredient SPARQL
            "localhost",                  // local test doubles
            "127.0.0.1",
        ];

        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("larder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LarderError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current allowlist.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or a subdomain of an allowed domain
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for GET requests.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, LarderError> {
        if !self.is_allowed(url) {
            return Err(LarderError::Security(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for POST requests.
    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, LarderError> {
        if !self.is_allowed(url) {
            return Err(LarderError::Security(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.post(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlist_covers_sources() {
        let c = SandboxClient::new().unwrap();
        assert!(c.is_allowed("https://www.marmiton.org/recettes/selection_recette_vegan.aspx?p=1"));
        assert!(c.is_allowed("https://platform.fatsecret.com/rest/server.api"));
        assert!(c.is_allowed("https://query.wikidata.org/sparql"));
    }

    #[test]
    fn test_unlisted_domain_refused() {
        let c = SandboxClient::new().unwrap();
        assert!(!c.is_allowed("https://example.com/"));
        assert!(c.get("https://example.com/").is_err());
    }

    #[test]
    fn test_allow_domain_extends_list() {
        let mut c = SandboxClient::new().unwrap();
        assert!(!c.is_allowed("https://mirror.test/page"));
        c.allow_domain("mirror.test");
        assert!(c.is_allowed("https://mirror.test/page"));
    }
}
