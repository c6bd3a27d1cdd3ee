use std::sync::Arc;

use serde_json::Value;

use crate::{
    transport::{HttpTransport, Transport},
    Error, Result, SessionConfig,
};

/// The owning context of every reddit object: configuration plus transport.
///
/// Sessions are shared between objects through an `Arc`, and are only read from.
///
/// ```no_run
/// # use reddit_objects::{Session, SessionConfig};
/// let session = Session::new(SessionConfig::default()).unwrap();
/// ```
pub struct Session {
    config: SessionConfig,
    transport: Box<dyn Transport + Send + Sync>,
}

impl Session {
    /// Create a session that talks to the reddit API over HTTP.
    pub fn new(config: SessionConfig) -> Result<Arc<Session>> {
        let transport = HttpTransport::new(&config)?;
        Ok(Session::with_transport(config, transport))
    }

    /// Create a session with a custom transport.
    pub fn with_transport(
        config: SessionConfig,
        transport: impl Transport + Send + Sync + 'static,
    ) -> Arc<Session> {
        Arc::new(Session {
            config,
            transport: Box::new(transport),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Request `url` and return the decoded JSON document.
    pub fn request_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        self.transport.request_json(url, params)
    }

    /// Request `url` and return the data section of the response.
    pub(crate) fn request_data(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        let mut response = self.request_json(url, params)?;
        match response.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(Error::UnexpectedResponse(format!(
                "response from {url} has no data section"
            ))),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
