use serde::{Deserialize, Serialize};

use crate::Attributes;

/// The kind of a reddit object. Used to look up the fullname prefix in
/// [`SessionConfig::by_object`](crate::SessionConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Comment,
    Redditor,
    Submission,
    Message,
    Subreddit,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Comment => "Comment",
            ObjectKind::Redditor => "Redditor",
            ObjectKind::Submission => "Submission",
            ObjectKind::Message => "Message",
            ObjectKind::Subreddit => "Subreddit",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete variant of [`LazyObject`](crate::LazyObject).
///
/// Variants are uninhabited marker types: `LazyObject<Redditor>`,
/// `LazyObject<Subreddit>`, and so on.
pub trait Variant: 'static {
    /// Kind used for fullname lookup.
    const KIND: ObjectKind;

    /// Called after every population, including empty ones. Use it to derive computed
    /// attributes. `fetch` tells whether a fetch was requested.
    fn post_populate(attributes: &mut Attributes, fetch: bool) {
        let _ = (attributes, fetch);
    }
}

macro_rules! variant {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub enum $name {}

        impl Variant for $name {
            const KIND: ObjectKind = ObjectKind::$name;
        }
    };
}

variant!(
    /// A comment on a submission.
    Comment
);
variant!(
    /// A reddit user.
    Redditor
);
variant!(
    /// A link or self post.
    Submission
);
variant!(
    /// A private message.
    Message
);
variant!(
    /// A subreddit.
    Subreddit
);
