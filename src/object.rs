use std::{
    cell::RefCell,
    collections::{BTreeSet, HashSet},
    hash::{Hash, Hasher},
    marker::PhantomData,
    sync::Arc,
};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::{
    attribute::normalize, AttributeValue, Attributes, Error, Result, Session, Variant,
};

/// Attribute name that never triggers lazy population. Restore probes use it to check for
/// saved state without fetching anything.
pub const STATE_PROBE: &str = "__state__";

/// Key under which a list-shaped payload is stored.
pub const LIST_PAYLOAD_KEY: &str = "_tmp";

/// A reddit object whose attributes are fetched on first access.
///
/// An object is created either from a payload the caller already has, or deferred with only
/// an endpoint to fetch from. Reading an attribute that is not present triggers a single
/// forced population before giving up with [`Error::AttributeLookup`].
///
/// State lives in a `RefCell`, so objects are `Send` but not `Sync`. Share an unpopulated
/// object between threads only behind your own lock, or populate it first.
pub struct LazyObject<V: Variant> {
    pub(crate) session: Arc<Session>,
    pub(crate) info_url: String,
    pub(crate) underscore_names: HashSet<String>,
    pub(crate) uniq: Option<String>,
    pub(crate) state: RefCell<State>,
    _variant: PhantomData<fn() -> V>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct State {
    pub populated: bool,
    /// Whether the info endpoint has been requested at least once.
    pub fetched: bool,
    pub attributes: Attributes,
    /// Keys assigned through [`LazyObject::set_attribute`]. They outlive repopulation.
    pub explicit: BTreeSet<String>,
    pub json_dict: Option<Value>,
}

/// Construction options for a [`LazyObject`].
///
/// ```no_run
/// # use reddit_objects::{LazyObject, ObjectOptions, Session, SessionConfig, Submission};
/// # let session = Session::new(SessionConfig::default()).unwrap();
/// let submission = LazyObject::<Submission>::new(
///     &session,
///     ObjectOptions::default().fetch(false).uniq("1"),
/// )
/// .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ObjectOptions {
    json_dict: Option<Value>,
    fetch: bool,
    info_url: Option<String>,
    underscore_names: HashSet<String>,
    uniq: Option<String>,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        ObjectOptions {
            json_dict: None,
            fetch: true,
            info_url: None,
            underscore_names: HashSet::new(),
            uniq: None,
        }
    }
}

impl ObjectOptions {
    /// Populate from this payload instead of fetching.
    pub fn json_dict(mut self, json_dict: Value) -> Self {
        self.json_dict = Some(json_dict);
        self
    }

    /// Whether to fetch right away when no payload is given. Defaults to `true`.
    pub fn fetch(mut self, fetch: bool) -> Self {
        self.fetch = fetch;
        self
    }

    /// Override the endpoint this object is fetched from.
    pub fn info_url(mut self, info_url: impl Into<String>) -> Self {
        self.info_url = Some(info_url.into());
        self
    }

    /// Payload fields that must be stored as `_<name>`.
    pub fn underscore_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.underscore_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Extra `uniq` parameter sent with fetch requests.
    pub fn uniq(mut self, uniq: impl Into<String>) -> Self {
        self.uniq = Some(uniq.into());
        self
    }
}

impl<V: Variant> LazyObject<V> {
    /// Create an object and populate it from `options`.
    ///
    /// No request is made if a payload is given or fetching is disabled. Otherwise the info
    /// endpoint is requested and its error, if any, is returned unchanged.
    pub fn new(session: &Arc<Session>, options: ObjectOptions) -> Result<Self> {
        let info_url = match options.info_url {
            Some(url) => url,
            None => session.config().endpoint("info")?,
        };

        let object = LazyObject {
            session: Arc::clone(session),
            info_url,
            underscore_names: options.underscore_names,
            uniq: options.uniq,
            state: RefCell::new(State::default()),
            _variant: PhantomData,
        };
        object.populate(options.json_dict, options.fetch)?;
        Ok(object)
    }

    /// Create an object from an API response payload.
    pub fn from_api_response(session: &Arc<Session>, json_dict: Value) -> Result<Self> {
        LazyObject::new(session, ObjectOptions::default().json_dict(json_dict))
    }

    pub(crate) fn from_parts(
        session: &Arc<Session>,
        info_url: String,
        underscore_names: HashSet<String>,
        uniq: Option<String>,
        state: State,
    ) -> Self {
        LazyObject {
            session: Arc::clone(session),
            info_url,
            underscore_names,
            uniq,
            state: RefCell::new(state),
            _variant: PhantomData,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    pub fn is_populated(&self) -> bool {
        self.state.borrow().populated
    }

    /// The payload this object was last populated from, if the session stores json results.
    pub fn raw_payload(&self) -> Option<Value> {
        self.state.borrow().json_dict.clone()
    }

    /// Names of all attributes currently present. Never fetches.
    pub fn attribute_names(&self) -> BTreeSet<String> {
        self.state.borrow().attributes.keys().cloned().collect()
    }

    /// Return the attribute if it is already present. Never fetches.
    pub fn peek(&self, name: &str) -> Option<AttributeValue> {
        self.state.borrow().attributes.get(name).cloned()
    }

    /// Return the attribute, fetching the object once if it is not present yet.
    ///
    /// Fetched fields are merged over the attributes already present, so a miss never loses
    /// what the object had.
    pub fn get(&self, name: &str) -> Result<AttributeValue> {
        if let Some(value) = self.peek(name) {
            return Ok(value);
        }

        if name != STATE_PROBE && !self.state.borrow().fetched {
            log::trace!(target: "reddit_objects",
                        kind:display = V::KIND,
                        attribute = name;
                        "attribute missing, populating lazily");
            self.populate_with(None, true, Population::Merge)?;
            if let Some(value) = self.peek(name) {
                return Ok(value);
            }
        }

        Err(Error::AttributeLookup {
            type_name: V::KIND.as_str(),
            attribute: name.to_owned(),
        })
    }

    pub fn get_str(&self, name: &str) -> Result<String> {
        let value = self.get(name)?;
        match value.as_json() {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(self.type_error(name, "a string")),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.get(name)?
            .as_bool()
            .ok_or_else(|| self.type_error(name, "a boolean"))
    }

    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.get(name)?
            .as_i64()
            .ok_or_else(|| self.type_error(name, "an integer"))
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        self.get(name)?
            .as_f64()
            .ok_or_else(|| self.type_error(name, "a number"))
    }

    fn type_error(&self, name: &str, expected: &str) -> Error {
        Error::UnexpectedResponse(format!(
            "attribute '{name}' of {} is not {expected}",
            V::KIND
        ))
    }

    /// Assign an attribute, normalizing it the same way population does.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) -> Result<()> {
        let name = name.into();
        let value = normalize(&self.session, &name, value)?;
        let state = self.state.get_mut();
        state.explicit.insert(name.clone());
        state.attributes.insert(name, value);
        Ok(())
    }

    /// The base36 id of this object.
    pub fn id(&self) -> Result<String> {
        self.get_str("id")
    }

    /// Kind prefix, an underscore, and the id, e.g. `t1_c5s96e0`.
    pub fn fullname(&self) -> Result<String> {
        let prefix = self.session.config().fullname_prefix_for(V::KIND)?;
        Ok(format!("{}_{}", prefix, self.id()?))
    }

    /// Creation time, from the `created_utc` epoch seconds.
    pub fn created_utc(&self) -> Result<DateTime<Utc>> {
        let seconds = self.get_f64("created_utc")?;
        Utc.timestamp_opt(seconds as i64, 0)
            .single()
            .ok_or_else(|| self.type_error("created_utc", "a valid timestamp"))
    }

    /// Re-fetch this object from its info endpoint.
    pub fn refresh(&self) -> Result<()> {
        self.populate(None, true)?;
        Ok(())
    }

    /// Replace the attributes with those from `json_dict`, or from the info endpoint when
    /// `json_dict` is `None` and `fetch` is set. Returns whether the object now counts as
    /// populated.
    pub(crate) fn populate(&self, json_dict: Option<Value>, fetch: bool) -> Result<bool> {
        self.populate_with(json_dict, fetch, Population::Replace)
    }

    fn populate_with(
        &self,
        json_dict: Option<Value>,
        fetch: bool,
        mode: Population,
    ) -> Result<bool> {
        let (json_dict, fetched) = match json_dict {
            Some(json_dict) => (json_dict, false),
            None if fetch => (self.fetch_json_dict()?, true),
            None => (Value::Object(Map::new()), false),
        };

        let stored = if self.session.config().stores_json_result() {
            Some(json_dict.clone())
        } else {
            None
        };

        let payload = match json_dict {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            // Some listings come back as a bare array.
            Value::Array(items) => {
                let mut map = Map::new();
                map.insert(LIST_PAYLOAD_KEY.to_owned(), Value::Array(items));
                map
            }
            other => {
                return Err(Error::UnexpectedResponse(format!(
                    "can't populate a {} from {other}",
                    V::KIND
                )))
            }
        };
        let has_payload = !payload.is_empty();

        let mut attributes = match mode {
            Population::Replace => Attributes::with_capacity(payload.len()),
            Population::Merge => self.state.borrow().attributes.clone(),
        };
        for (name, value) in payload {
            let name = if self.underscore_names.contains(&name) {
                format!("_{name}")
            } else {
                name
            };
            let value = normalize(&self.session, &name, value)?;
            attributes.insert(name, value);
        }

        V::post_populate(&mut attributes, fetch);

        let populated = match mode {
            Population::Replace => has_payload || fetch,
            Population::Merge => self.state.borrow().populated || has_payload || fetch,
        };

        let mut state = self.state.borrow_mut();
        let State {
            attributes: previous,
            explicit,
            ..
        } = &mut *state;
        for name in explicit.iter() {
            if !attributes.contains_key(name) {
                if let Some(value) = previous.remove(name) {
                    attributes.insert(name.clone(), value);
                }
            }
        }
        state.attributes = attributes;
        state.json_dict = stored;
        state.populated = populated;
        state.fetched |= fetched;

        Ok(populated)
    }

    fn fetch_json_dict(&self) -> Result<Value> {
        log::debug!(target: "reddit_objects",
                    kind:display = V::KIND,
                    url = self.info_url.as_str();
                    "fetching object");

        let params: Vec<(&str, &str)> = match &self.uniq {
            Some(uniq) => vec![("uniq", uniq.as_str())],
            None => Vec::new(),
        };
        let data = self.session.request_data(&self.info_url, &params)?;

        log::debug!(target: "reddit_objects", kind:display = V::KIND; "successfully fetched object");
        Ok(data)
    }
}

/// How fetched fields are combined with the attributes already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Population {
    /// Drop every attribute that is not in the new payload, except explicit assignments.
    Replace,
    /// Keep existing attributes and overwrite them with the fetched ones.
    Merge,
}

impl<V: Variant> Clone for LazyObject<V> {
    fn clone(&self) -> Self {
        LazyObject::from_parts(
            &self.session,
            self.info_url.clone(),
            self.underscore_names.clone(),
            self.uniq.clone(),
            self.state.borrow().clone(),
        )
    }
}

impl<V: Variant> std::fmt::Debug for LazyObject<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct(V::KIND.as_str())
            .field("info_url", &self.info_url)
            .field("populated", &state.populated)
            .field("attributes", &state.attributes)
            .finish()
    }
}

impl<V: Variant> LazyObject<V> {
    /// Compare fullnames, returning the error if either can't be computed.
    pub fn try_eq<B: Variant>(&self, other: &LazyObject<B>) -> Result<bool> {
        Ok(self.fullname()? == other.fullname()?)
    }

    fn address(&self) -> usize {
        self as *const Self as *const () as usize
    }
}

/// Objects are equal when their fullnames are. Computing a fullname may fetch the object.
///
/// If either fullname can't be computed the error is logged and the objects are equal only
/// when they are the same instance. Use [`LazyObject::try_eq`] to see the error.
impl<A: Variant, B: Variant> PartialEq<LazyObject<B>> for LazyObject<A> {
    fn eq(&self, other: &LazyObject<B>) -> bool {
        match self.try_eq(other) {
            Ok(equal) => equal,
            Err(err) => {
                log::warn!(target: "reddit_objects", "unable to compare objects by fullname: {}", err);
                self.address() == other.address()
            }
        }
    }
}

impl<V: Variant> Eq for LazyObject<V> {}

/// Hashes the fullname, or the instance address when the fullname can't be computed.
impl<V: Variant> Hash for LazyObject<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.fullname() {
            Ok(fullname) => fullname.hash(state),
            Err(err) => {
                log::warn!(target: "reddit_objects", "unable to hash object by fullname: {}", err);
                self.address().hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{hash_map::DefaultHasher, HashSet},
        hash::{Hash, Hasher},
        sync::Arc,
    };

    use serde_json::{json, Value};

    use crate::{
        transport::testing::FakeTransport, AttributeValue, Attributes, Comment, Error,
        ObjectKind, Redditor, Session, SessionConfig, Submission, Variant,
    };

    use super::{LazyObject, ObjectOptions, LIST_PAYLOAD_KEY, STATE_PROBE};

    const INFO: &str = "https://api.reddit.com/api/info/";

    fn session_with(config: SessionConfig) -> (Arc<Session>, FakeTransport) {
        let transport = FakeTransport::new();
        (Session::with_transport(config, transport.clone()), transport)
    }

    fn session() -> (Arc<Session>, FakeTransport) {
        session_with(SessionConfig::default())
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn populates_from_payload_without_fetching() {
        let (session, transport) = session();
        let comment = LazyObject::<Comment>::new(
            &session,
            ObjectOptions::default()
                .fetch(false)
                .json_dict(json!({"id": "c1", "body": "hi", "author": "spez", "subreddit": "rust"})),
        )
        .unwrap();

        assert!(comment.is_populated());
        assert_eq!(comment.get_str("body").unwrap(), "hi");
        assert_eq!(
            comment
                .get("author")
                .unwrap()
                .as_redditor()
                .unwrap()
                .name()
                .unwrap(),
            "spez"
        );
        assert_eq!(
            comment
                .get("subreddit")
                .unwrap()
                .as_subreddit()
                .unwrap()
                .display_name()
                .unwrap(),
            "rust"
        );
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn fetches_once_on_construction() {
        let (session, transport) = session();
        transport.respond(INFO, json!({"data": {"id": "abc", "score": 3}}));

        let submission = LazyObject::<Submission>::new(&session, ObjectOptions::default()).unwrap();

        assert!(submission.is_populated());
        assert_eq!(submission.get_i64("score").unwrap(), 3);
        assert_eq!(transport.calls().len(), 1);
        assert!(transport.calls()[0].params.is_empty());
    }

    #[test]
    fn sends_uniq_parameter() {
        let (session, transport) = session();
        transport.respond("http://x/info", json!({"data": {"id": "abc"}}));

        LazyObject::<Submission>::new(
            &session,
            ObjectOptions::default().info_url("http://x/info").uniq("42"),
        )
        .unwrap();

        assert_eq!(transport.calls()[0].url, "http://x/info");
        assert_eq!(
            transport.calls()[0].params,
            vec![("uniq".to_owned(), "42".to_owned())]
        );
    }

    #[test]
    fn deferred_object_fetches_on_first_miss() {
        let (session, transport) = session();
        transport.respond(INFO, json!({"data": {"id": "abc", "title": "Hello"}}));

        let submission =
            LazyObject::<Submission>::new(&session, ObjectOptions::default().fetch(false)).unwrap();
        assert!(!submission.is_populated());
        assert!(submission.attribute_names().is_empty());
        assert!(transport.calls().is_empty());

        assert_eq!(submission.get_str("title").unwrap(), "Hello");
        assert!(submission.is_populated());
        assert_eq!(submission.id().unwrap(), "abc");
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn missing_attribute_after_forced_population() {
        let (session, transport) = session();
        transport.respond(INFO, json!({"data": {"id": "x"}}));

        let comment = LazyObject::<Comment>::from_api_response(&session, json!({"id": "x"})).unwrap();

        let err = comment.get("score").unwrap_err();
        assert!(matches!(
            &err,
            Error::AttributeLookup { type_name: "Comment", attribute } if attribute == "score"
        ));
        assert_eq!(err.to_string(), "'Comment' has no attribute 'score'");
        assert_eq!(transport.calls().len(), 1);

        // The object has been fetched already, so another miss does not fetch again.
        assert!(comment.get("score").is_err());
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn state_probe_never_fetches() {
        let (session, transport) = session();
        let submission =
            LazyObject::<Submission>::new(&session, ObjectOptions::default().fetch(false)).unwrap();

        assert!(matches!(
            submission.get(STATE_PROBE),
            Err(Error::AttributeLookup { .. })
        ));
        assert!(transport.calls().is_empty());
        assert!(!submission.is_populated());
    }

    #[test]
    fn transport_errors_propagate_from_lazy_access() {
        let (session, transport) = session();
        let submission =
            LazyObject::<Submission>::new(&session, ObjectOptions::default().fetch(false)).unwrap();

        assert!(matches!(submission.get("title"), Err(Error::Transport(_))));
        assert!(!submission.is_populated());

        // A failed fetch is retried on the next miss.
        transport.respond(INFO, json!({"data": {"title": "now"}}));
        assert_eq!(submission.get_str("title").unwrap(), "now");
        assert_eq!(transport.calls().len(), 2);
    }

    #[test]
    fn transport_errors_propagate_from_construction() {
        let (session, _) = session();
        assert!(matches!(
            LazyObject::<Submission>::new(&session, ObjectOptions::default()),
            Err(Error::Transport(_))
        ));
    }

    #[test]
    fn empty_fetch_still_counts_as_populated() {
        let (session, transport) = session();
        transport.respond(INFO, json!({"data": {}}));

        let fetched = LazyObject::<Submission>::new(&session, ObjectOptions::default()).unwrap();
        assert!(fetched.is_populated());

        let skipped =
            LazyObject::<Submission>::new(&session, ObjectOptions::default().fetch(false)).unwrap();
        assert!(!skipped.is_populated());

        let empty = LazyObject::<Submission>::new(
            &session,
            ObjectOptions::default().fetch(false).json_dict(json!({})),
        )
        .unwrap();
        assert!(!empty.is_populated());
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn underscore_names_are_prefixed() {
        let (session, _) = session();
        let comment = LazyObject::<Comment>::new(
            &session,
            ObjectOptions::default()
                .json_dict(json!({"id": "c1", "replies": [], "author": "spez"}))
                .underscore_names(["replies", "author"]),
        )
        .unwrap();

        assert!(comment.peek("replies").is_none());
        assert!(comment.peek("_replies").is_some());
        // Prefixed names are not normalized.
        assert_eq!(comment.peek("_author").unwrap().as_str(), Some("spez"));
    }

    #[test]
    fn list_payload_is_wrapped() {
        let (session, _) = session();
        let submission = LazyObject::<Submission>::from_api_response(&session, json!(["a", "b"])).unwrap();

        assert!(submission.is_populated());
        assert_eq!(
            submission.peek(LIST_PAYLOAD_KEY).unwrap().as_json(),
            Some(&json!(["a", "b"]))
        );
        assert_eq!(
            submission.attribute_names().into_iter().collect::<Vec<_>>(),
            vec!["_tmp".to_owned()]
        );
    }

    #[test]
    fn scalar_payload_is_rejected() {
        let (session, _) = session();
        assert!(matches!(
            LazyObject::<Submission>::from_api_response(&session, json!("nope")),
            Err(Error::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn retains_raw_payload_only_when_configured() {
        let (session, _) = session();
        let plain = LazyObject::<Comment>::from_api_response(&session, json!({"id": "a"})).unwrap();
        assert_eq!(plain.raw_payload(), None);

        let mut config = SessionConfig::default();
        config.store_json_result(true);
        let (session, _) = session_with(config);
        let stored = LazyObject::<Comment>::from_api_response(&session, json!(["x"])).unwrap();
        assert_eq!(stored.raw_payload(), Some(json!(["x"])));
    }

    #[test]
    fn repopulation_replaces_attributes() {
        let (session, _) = session();
        let submission =
            LazyObject::<Submission>::from_api_response(&session, json!({"id": "a", "stale": 1})).unwrap();

        submission.populate(Some(json!({"id": "a", "fresh": 2})), false).unwrap();
        submission.populate(Some(json!({"id": "a", "fresh": 2})), false).unwrap();

        assert_eq!(
            submission.attribute_names().into_iter().collect::<Vec<_>>(),
            vec!["fresh".to_owned(), "id".to_owned()]
        );
    }

    #[test]
    fn explicit_assignments_survive_repopulation() {
        let (session, transport) = session();
        transport.respond(INFO, json!({"data": {"id": "a"}}));
        let mut submission =
            LazyObject::<Submission>::new(&session, ObjectOptions::default().fetch(false)).unwrap();

        submission.set_attribute("author", json!("spez")).unwrap();
        assert!(submission.peek("author").unwrap().as_redditor().is_some());

        submission.refresh().unwrap();
        assert_eq!(submission.id().unwrap(), "a");
        assert!(submission.peek("author").unwrap().as_redditor().is_some());
    }

    #[test]
    fn set_attribute_normalizes() {
        let (session, _) = session();
        let mut comment = LazyObject::<Comment>::from_api_response(&session, json!({"id": "a"})).unwrap();

        comment.set_attribute("approved_by", json!(true)).unwrap();
        comment.set_attribute("banned_by", json!("[deleted]")).unwrap();
        comment.set_attribute("subreddit", json!("python")).unwrap();

        assert_eq!(comment.peek("approved_by").unwrap().as_bool(), Some(true));
        assert!(comment.peek("banned_by").unwrap().is_null());
        assert!(matches!(
            comment.peek("subreddit").unwrap(),
            AttributeValue::Subreddit(_)
        ));
    }

    #[test]
    fn equality_and_hash_use_fullname() {
        let (session, transport) = session();
        let a = LazyObject::<Comment>::from_api_response(&session, json!({"id": "x", "body": "1"})).unwrap();
        let b = LazyObject::<Comment>::from_api_response(&session, json!({"id": "x", "body": "2"})).unwrap();
        let c = LazyObject::<Comment>::from_api_response(&session, json!({"id": "y"})).unwrap();
        let d = LazyObject::<Submission>::from_api_response(&session, json!({"id": "x"})).unwrap();

        assert_eq!(a.fullname().unwrap(), "t1_x");
        assert_eq!(d.fullname().unwrap(), "t3_x");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
        assert!(a != d);
        assert!(transport.calls().is_empty());

        let set: HashSet<_> = [a.clone(), b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }

    #[test]
    fn lazy_miss_keeps_existing_attributes() {
        let (session, transport) = session();
        transport.respond(INFO, json!({"data": {"children": [], "after": null}}));

        let comment =
            LazyObject::<Comment>::from_api_response(&session, json!({"id": "x", "body": "hi"}))
                .unwrap();
        let set: HashSet<_> = [comment.clone()].into_iter().collect();

        assert!(matches!(
            comment.get("score"),
            Err(Error::AttributeLookup { attribute, .. }) if attribute == "score"
        ));
        assert_eq!(transport.calls().len(), 1);

        assert_eq!(comment.fullname().unwrap(), "t1_x");
        assert_eq!(comment.get_str("body").unwrap(), "hi");
        assert!(comment.peek("children").is_some());
        assert!(comment.is_populated());
        assert!(set.contains(&comment));

        let fresh = LazyObject::<Comment>::from_api_response(&session, json!({"id": "x"})).unwrap();
        assert_eq!(comment, fresh);
    }

    #[test]
    fn refresh_replaces_attributes() {
        let (session, transport) = session();
        transport.respond(INFO, json!({"data": {"id": "x"}}));

        let comment =
            LazyObject::<Comment>::from_api_response(&session, json!({"id": "x", "body": "hi"}))
                .unwrap();
        comment.refresh().unwrap();

        assert!(comment.peek("body").is_none());
        assert_eq!(comment.id().unwrap(), "x");
    }

    #[test]
    fn unresolvable_objects_fall_back_to_instance_identity() {
        let (session, transport) = session();
        let a =
            LazyObject::<Submission>::new(&session, ObjectOptions::default().fetch(false)).unwrap();
        let b =
            LazyObject::<Submission>::new(&session, ObjectOptions::default().fetch(false)).unwrap();

        assert!(matches!(a.try_eq(&a), Err(Error::Transport(_))));
        assert_eq!(a, a);
        assert_ne!(a, b);

        let mut set = HashSet::new();
        set.insert(&a);
        assert!(set.contains(&a));
        assert!(!set.contains(&b));
        assert!(!transport.calls().is_empty());
    }

    #[test]
    fn try_eq_compares_fullnames() {
        let (session, _) = session();
        let a = LazyObject::<Comment>::from_api_response(&session, json!({"id": "x"})).unwrap();
        let b = LazyObject::<Comment>::from_api_response(&session, json!({"id": "x"})).unwrap();
        let c = LazyObject::<Submission>::from_api_response(&session, json!({"id": "x"})).unwrap();

        assert!(a.try_eq(&b).unwrap());
        assert!(!a.try_eq(&c).unwrap());
    }

    #[test]
    fn fullname_requires_configured_prefix() {
        let (session, _) = session_with(SessionConfig::from_json(r#"{"by_object": {}}"#).unwrap());
        let comment = LazyObject::<Comment>::from_api_response(&session, json!({"id": "x"})).unwrap();

        assert!(matches!(
            comment.fullname(),
            Err(Error::UnknownKind(ObjectKind::Comment))
        ));
    }

    #[test]
    fn numeric_id_is_formatted() {
        let (session, _) = session();
        let comment = LazyObject::<Comment>::from_api_response(&session, json!({"id": 7})).unwrap();
        assert_eq!(comment.fullname().unwrap(), "t1_7");
    }

    #[test]
    fn created_utc_is_parsed() {
        let (session, _) = session();
        let comment =
            LazyObject::<Comment>::from_api_response(&session, json!({"created_utc": 1_500_000_000.0}))
                .unwrap();
        assert_eq!(comment.created_utc().unwrap().timestamp(), 1_500_000_000);
    }

    enum Scored {}

    impl Variant for Scored {
        const KIND: ObjectKind = ObjectKind::Submission;

        fn post_populate(attributes: &mut Attributes, fetch: bool) {
            let ups = attributes
                .get("ups")
                .and_then(AttributeValue::as_i64)
                .unwrap_or(0);
            attributes.insert("score".to_owned(), AttributeValue::Json(ups.into()));
            attributes.insert("fetch".to_owned(), AttributeValue::Json(Value::Bool(fetch)));
        }
    }

    #[test]
    fn post_populate_hook_runs_every_time() {
        let (session, _) = session();
        let scored = LazyObject::<Scored>::new(
            &session,
            ObjectOptions::default().fetch(false).json_dict(json!({"ups": 5})),
        )
        .unwrap();
        assert_eq!(scored.get_i64("score").unwrap(), 5);
        assert!(!scored.get_bool("fetch").unwrap());

        // Also for an empty population.
        let empty = LazyObject::<Scored>::new(&session, ObjectOptions::default().fetch(false)).unwrap();
        assert_eq!(empty.peek("score").unwrap().as_i64(), Some(0));
        assert!(!empty.is_populated());
    }

    #[test]
    fn redditor_and_comment_can_be_compared() {
        let (session, _) = session();
        let redditor = LazyObject::<Redditor>::from_api_response(&session, json!({"id": "x", "name": "a"})).unwrap();
        let comment = LazyObject::<Comment>::from_api_response(&session, json!({"id": "x"})).unwrap();
        assert!(redditor != comment);
    }
}
