use std::time::Duration;

use reqwest::Url;

use crate::error::{CoreError, ExplorerError};

use super::transform::ResponseTransformer;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("scorpius/", env!("CARGO_PKG_VERSION"));

/// Everything needed to issue explorer requests and decode their responses.
///
/// Immutable once handed to a client; the builder-style setters consume and
/// return `self`.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    base_url: Url,
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: String,
    query: Vec<(String, String)>,
    transformer: ResponseTransformer,
}

impl RequestConfig {
    /// `base_url` must be an `http://` or `https://` URL; a trailing slash is
    /// optional.
    pub fn new(base_url: &str, transformer: ResponseTransformer) -> Result<Self, CoreError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            query: Vec::new(),
            transformer,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Append a query pair to every request (e.g. an API token).
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn transformer(&self) -> &ResponseTransformer {
        &self.transformer
    }

    /// Resolve `path` against the base URL, keeping any base path prefix
    /// (e.g. `/api`), and append the configured query pairs.
    pub fn endpoint(&self, path: &str) -> Result<Url, CoreError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}")).map_err(|e| {
            CoreError::Config(format!("invalid endpoint path `{path}`: {e}"))
        })?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub fn build_client(&self) -> Result<reqwest::Client, CoreError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| ExplorerError::Transport(e).into())
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, CoreError> {
    let parsed = Url::parse(base_url).map_err(|e| {
        CoreError::Config(format!(
            "invalid explorer base URL `{base_url}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(CoreError::Config(format!(
            "unsupported explorer URL scheme `{other}`; expected http or https"
        ))),
    }
}
