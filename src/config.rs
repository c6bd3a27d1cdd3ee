use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::{Error, ObjectKind, Result};

/// Configuration shared by every object of a [`Session`](crate::Session).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub(crate) api_url: String,
    pub(crate) endpoints: HashMap<String, String>,
    pub(crate) store_json_result: bool,
    pub(crate) by_object: HashMap<ObjectKind, String>,
    pub(crate) user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            api_url: SessionConfig::DEFAULT_API_URL.to_owned(),
            endpoints: [
                ("info", "api/info/"),
                ("user_about", "user/{user}/about/"),
                ("subreddit_about", "r/{subreddit}/about/"),
            ]
            .into_iter()
            .map(|(key, path)| (key.to_owned(), path.to_owned()))
            .collect(),
            store_json_result: false,
            by_object: [
                (ObjectKind::Comment, "t1"),
                (ObjectKind::Redditor, "t2"),
                (ObjectKind::Submission, "t3"),
                (ObjectKind::Message, "t4"),
                (ObjectKind::Subreddit, "t5"),
            ]
            .into_iter()
            .map(|(kind, prefix)| (kind, prefix.to_owned()))
            .collect(),
            user_agent: concat!("reddit-objects/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl SessionConfig {
    /// Default base URL for API calls.
    pub const DEFAULT_API_URL: &'static str = "https://api.reddit.com/";

    /// Parse configuration from JSON. Missing fields take their default values.
    ///
    /// ```
    /// # use reddit_objects::SessionConfig;
    /// let config = SessionConfig::from_json(r#"{"store_json_result": true}"#).unwrap();
    /// assert!(config.stores_json_result());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::InvalidConfiguration(err.to_string()))
    }

    /// Override base URL for API calls.
    pub fn api_url(&mut self, api_url: impl Into<String>) -> &mut Self {
        self.api_url = api_url.into();
        self
    }

    /// Add or replace an endpoint template, relative to the api url.
    pub fn endpoint_template(
        &mut self,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> &mut Self {
        self.endpoints.insert(key.into(), template.into());
        self
    }

    /// Keep a copy of the raw payload on every populated object.
    pub fn store_json_result(&mut self, store: bool) -> &mut Self {
        self.store_json_result = store;
        self
    }

    /// Set the fullname prefix for a kind of object.
    pub fn fullname_prefix(&mut self, kind: ObjectKind, prefix: impl Into<String>) -> &mut Self {
        self.by_object.insert(kind, prefix.into());
        self
    }

    pub fn user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn stores_json_result(&self) -> bool {
        self.store_json_result
    }

    /// Resolve the endpoint URL template stored under `key`.
    ///
    /// Placeholders such as `{user}` are left in place; see [`SessionConfig::format_endpoint`].
    pub fn endpoint(&self, key: &str) -> Result<String> {
        let template = self
            .endpoints
            .get(key)
            .ok_or_else(|| Error::UnknownEndpoint(key.to_owned()))?;
        // Url::join would percent-encode the braces of a template, so only validate here.
        let base = Url::parse(&self.api_url)?;
        base.join(template)?;
        Ok(format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            template.trim_start_matches('/')
        ))
    }

    /// Resolve the endpoint under `key` and substitute `{placeholder}` with `value`,
    /// percent-encoded as a single path segment.
    pub fn format_endpoint(&self, key: &str, placeholder: &str, value: &str) -> Result<String> {
        Ok(self
            .endpoint(key)?
            .replace(&format!("{{{placeholder}}}"), &encode_path_segment(value)?))
    }

    /// Fullname prefix (`t1`, `t2`, ...) for a kind of object.
    pub fn fullname_prefix_for(&self, kind: ObjectKind) -> Result<&str> {
        self.by_object
            .get(&kind)
            .map(String::as_str)
            .ok_or(Error::UnknownKind(kind))
    }
}

fn encode_path_segment(value: &str) -> Result<String> {
    let mut scratch = Url::parse("http://localhost/")?;
    scratch
        .path_segments_mut()
        .map_err(|()| Error::InvalidConfiguration("url cannot be a base".to_owned()))?
        .clear()
        .push(value);
    Ok(scratch.path().trim_start_matches('/').to_owned())
}
