use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Http(String),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(address: &str) -> Self {
        let address = address.trim();
        if address.starts_with("http://") || address.starts_with("https://") {
            Self::Http(address.to_string())
        } else {
            Self::File(PathBuf::from(address))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub(super) fn fetch_text(source: &DataSource, timeout: Duration) -> Result<String> {
    match source {
        DataSource::Http(url) => {
            let agent = ureq::AgentBuilder::new().timeout(timeout).build();
            let response = agent.get(url).call().map_err(|error| match error {
                ureq::Error::Status(code, _) => anyhow!("HTTP {code} from {url}"),
                ureq::Error::Transport(transport) => {
                    anyhow!("request to {url} failed: {transport}")
                }
            })?;
            response
                .into_string()
                .with_context(|| format!("failed to read response body from {url}"))
        }
        DataSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
    }
}
