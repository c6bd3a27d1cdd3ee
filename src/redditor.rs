use std::sync::Arc;

use serde_json::Value;

use crate::{LazyObject, ObjectOptions, Redditor, Result, Session};

impl LazyObject<Redditor> {
    /// A user known only by name. Nothing is fetched until an unknown attribute is read.
    pub fn deferred(session: &Arc<Session>, name: &str) -> Result<Self> {
        let info_url = session
            .config()
            .format_endpoint("user_about", "user", name)?;
        let mut redditor = LazyObject::new(
            session,
            ObjectOptions::default().fetch(false).info_url(info_url),
        )?;
        redditor.set_attribute("name", Value::String(name.to_owned()))?;
        Ok(redditor)
    }

    /// A user populated from the data section of an API response.
    pub fn from_json(session: &Arc<Session>, json_dict: Value) -> Result<Self> {
        let info_url = match json_dict.get("name").and_then(Value::as_str) {
            Some(name) => session
                .config()
                .format_endpoint("user_about", "user", name)?,
            None => session.config().endpoint("info")?,
        };
        LazyObject::new(
            session,
            ObjectOptions::default().json_dict(json_dict).info_url(info_url),
        )
    }

    pub fn name(&self) -> Result<String> {
        self.get_str("name")
    }

    pub fn link_karma(&self) -> Result<i64> {
        self.get_i64("link_karma")
    }

    pub fn comment_karma(&self) -> Result<i64> {
        self.get_i64("comment_karma")
    }
}

impl std::fmt::Display for LazyObject<Redditor> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.peek("name") {
            Some(name) => f.write_str(name.as_str().unwrap_or_default()),
            None => Ok(()),
        }
    }
}
