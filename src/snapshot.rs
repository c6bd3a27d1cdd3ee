//! Plain-data copies of objects that can be persisted and restored without network access.
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{
    object::State, AttributeValue, Attributes, Error, LazyObject, ObjectKind, Redditor, Result,
    Session, Subreddit, Variant,
};

/// The full state of a [`LazyObject`], without its session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub kind: ObjectKind,
    pub info_url: String,
    #[serde(default)]
    pub underscore_names: BTreeSet<String>,
    #[serde(default)]
    pub uniq: Option<String>,
    pub populated: bool,
    pub fetched: bool,
    pub attributes: BTreeMap<String, SnapshotValue>,
    #[serde(default)]
    pub explicit: BTreeSet<String>,
    #[serde(default)]
    pub json_dict: Option<Value>,
}

/// A snapshotted [`AttributeValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SnapshotValue {
    Json(Value),
    Redditor(Box<Snapshot>),
    Subreddit(Box<Snapshot>),
}

impl From<&AttributeValue> for SnapshotValue {
    fn from(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Json(v) => SnapshotValue::Json(v.clone()),
            AttributeValue::Redditor(r) => SnapshotValue::Redditor(Box::new(r.snapshot())),
            AttributeValue::Subreddit(s) => SnapshotValue::Subreddit(Box::new(s.snapshot())),
        }
    }
}

impl SnapshotValue {
    fn restore(self, session: &Arc<Session>) -> Result<AttributeValue> {
        Ok(match self {
            SnapshotValue::Json(v) => AttributeValue::Json(v),
            SnapshotValue::Redditor(s) => LazyObject::<Redditor>::restore(session, *s)?.into(),
            SnapshotValue::Subreddit(s) => LazyObject::<Subreddit>::restore(session, *s)?.into(),
        })
    }
}

impl<V: Variant> LazyObject<V> {
    /// Copy the current state. Never fetches, even for unpopulated objects.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.borrow();
        Snapshot {
            kind: V::KIND,
            info_url: self.info_url.clone(),
            underscore_names: self.underscore_names.iter().cloned().collect(),
            uniq: self.uniq.clone(),
            populated: state.populated,
            fetched: state.fetched,
            attributes: state
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.into()))
                .collect(),
            explicit: state.explicit.clone(),
            json_dict: state.json_dict.clone(),
        }
    }

    /// Rebuild an object from a snapshot. Never fetches.
    pub fn restore(session: &Arc<Session>, snapshot: Snapshot) -> Result<Self> {
        if snapshot.kind != V::KIND {
            return Err(Error::KindMismatch {
                expected: V::KIND,
                found: snapshot.kind,
            });
        }

        let attributes = snapshot
            .attributes
            .into_iter()
            .map(|(name, value)| Ok((name, value.restore(session)?)))
            .collect::<Result<Attributes>>()?;

        Ok(LazyObject::from_parts(
            session,
            snapshot.info_url,
            snapshot.underscore_names.into_iter().collect(),
            snapshot.uniq,
            State {
                populated: snapshot.populated,
                fetched: snapshot.fetched,
                attributes,
                explicit: snapshot.explicit,
                json_dict: snapshot.json_dict,
            },
        ))
    }
}

impl<V: Variant> Serialize for LazyObject<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}
