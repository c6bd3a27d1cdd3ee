use std::sync::Arc;

use serde_json::Value;

use crate::{LazyObject, ObjectOptions, Result, Session, Subreddit};

impl LazyObject<Subreddit> {
    /// A subreddit known only by name. Nothing is fetched until an unknown attribute is read.
    pub fn deferred(session: &Arc<Session>, display_name: &str) -> Result<Self> {
        let info_url =
            session
                .config()
                .format_endpoint("subreddit_about", "subreddit", display_name)?;
        let mut subreddit = LazyObject::new(
            session,
            ObjectOptions::default().fetch(false).info_url(info_url),
        )?;
        subreddit.set_attribute("display_name", Value::String(display_name.to_owned()))?;
        Ok(subreddit)
    }

    /// A subreddit populated from the data section of an API response.
    pub fn from_json(session: &Arc<Session>, json_dict: Value) -> Result<Self> {
        let info_url = match json_dict.get("display_name").and_then(Value::as_str) {
            Some(name) => {
                session
                    .config()
                    .format_endpoint("subreddit_about", "subreddit", name)?
            }
            None => session.config().endpoint("info")?,
        };
        LazyObject::new(
            session,
            ObjectOptions::default().json_dict(json_dict).info_url(info_url),
        )
    }

    pub fn display_name(&self) -> Result<String> {
        self.get_str("display_name")
    }

    pub fn subscribers(&self) -> Result<i64> {
        self.get_i64("subscribers")
    }
}

impl std::fmt::Display for LazyObject<Subreddit> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.peek("display_name") {
            Some(name) => f.write_str(name.as_str().unwrap_or_default()),
            None => Ok(()),
        }
    }
}
