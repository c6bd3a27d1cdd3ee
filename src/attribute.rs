use std::{collections::HashMap, sync::Arc};

use derive_more::From;
use serde_json::Value;

use crate::{LazyObject, Redditor, Result, Session, Subreddit};

/// Attributes of a populated object, keyed by (possibly underscore-prefixed) field name.
pub type Attributes = HashMap<String, AttributeValue>;

/// Fields that reference a user rather than holding a plain value.
pub const REDDITOR_KEYS: [&str; 5] = ["approved_by", "author", "banned_by", "redditor", "revision_by"];

/// Marker reddit uses in place of the author of removed content.
pub const DELETED: &str = "[deleted]";

/// Value of a single attribute after normalization.
#[derive(Debug, Clone, From)]
pub enum AttributeValue {
    /// Any value that is passed through unchanged, including `null`.
    Json(Value),
    /// Reference to a user.
    Redditor(LazyObject<Redditor>),
    /// Reference to a subreddit.
    Subreddit(LazyObject<Subreddit>),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Json(Value::Null))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            AttributeValue::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_json().and_then(Value::as_bool)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_json().and_then(Value::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_json().and_then(Value::as_f64)
    }

    pub fn as_redditor(&self) -> Option<&LazyObject<Redditor>> {
        match self {
            AttributeValue::Redditor(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_subreddit(&self) -> Option<&LazyObject<Subreddit>> {
        match self {
            AttributeValue::Subreddit(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Json(value.into())
    }
}

/// Turn a raw payload field into an attribute value.
///
/// `subreddit` becomes a deferred subreddit reference, and the [`REDDITOR_KEYS`]
/// become user references. Everything else is passed through.
pub fn normalize(session: &Arc<Session>, name: &str, value: Value) -> Result<AttributeValue> {
    if value.is_null() {
        return Ok(AttributeValue::Json(value));
    }

    if name == "subreddit" {
        if !is_truthy(&value) {
            return Ok(AttributeValue::Json(value));
        }
        let subreddit = match value {
            Value::Object(_) => LazyObject::<Subreddit>::from_json(session, data_section(value))?,
            Value::String(name) => LazyObject::<Subreddit>::deferred(session, &name)?,
            other => LazyObject::<Subreddit>::deferred(session, &other.to_string())?,
        };
        return Ok(subreddit.into());
    }

    if REDDITOR_KEYS.contains(&name) {
        // Some endpoints report these as flags rather than users.
        if value.is_boolean() {
            return Ok(AttributeValue::Json(value));
        }
        if !is_truthy(&value) || value.as_str() == Some(DELETED) {
            return Ok(AttributeValue::Json(Value::Null));
        }
        let redditor = match value {
            Value::Object(_) => LazyObject::<Redditor>::from_json(session, data_section(value))?,
            Value::String(name) => LazyObject::<Redditor>::deferred(session, &name)?,
            other => LazyObject::<Redditor>::deferred(session, &other.to_string())?,
        };
        return Ok(redditor.into());
    }

    Ok(AttributeValue::Json(value))
}

/// The `data` member of a listing-style mapping, or the mapping itself if it has none.
fn data_section(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Object(_)) => data,
            Some(other) => {
                map.insert("data".to_owned(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
