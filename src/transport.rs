//! HTTP access used to populate objects.
use reqwest::{StatusCode, Url};

use crate::{Error, Result, SessionConfig};

/// Synchronous JSON transport.
///
/// Implementations return the decoded response document as-is. Errors are
/// propagated unchanged to whoever triggered the population.
pub trait Transport {
    fn request_json(&self, url: &str, params: &[(&str, &str)]) -> Result<serde_json::Value>;
}

/// A [`Transport`] backed by a blocking reqwest client.
pub struct HttpTransport {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &SessionConfig) -> Result<HttpTransport> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn request_json(&self, url: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
        let url = Url::parse_with_params(url, params)?;

        log::debug!(target: "reddit_objects", url:display = url; "sending request");
        let response = self.client.get(url).send()?;

        let response = response.error_for_status().map_err(|err| {
            if err.status() == Some(StatusCode::NOT_FOUND) {
                log::warn!(target: "reddit_objects", "requested object does not exist");
            } else {
                log::warn!(target: "reddit_objects", "received non-200 response: {:?}", err);
            }
            Error::from(err)
        })?;

        Ok(response.json()?)
    }
}
