//! Lazily populated objects for the reddit API.
//!
//! # Overview
//!
//! Every remote entity is a [`LazyObject`] tagged with a [`Variant`] such as [`Comment`] or
//! [`Redditor`]. An object is created from a payload the caller already has, or deferred with
//! only an endpoint to fetch from. Reading an attribute that is not present fetches the
//! object once; afterwards attributes are served from memory.
//!
//! While populating, payload fields that reference users (`author`, `approved_by`, ...) and
//! the `subreddit` field are turned into nested, deferred objects. See [`normalize`].
//!
//! Objects compare and hash by their fullname, e.g. `t1_c5s96e0`.
//!
//! # Sessions
//!
//! A [`Session`] holds the [`SessionConfig`] and a [`Transport`]. It is created once and
//! shared by all objects through an `Arc`.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. Transport errors are returned unchanged from
//! whichever call triggered the fetch, including plain attribute reads.
//!
//! # Concurrency
//!
//! Objects are `Send` but not `Sync`. Population happens inline on the thread reading the
//! attribute; if an object must be shared between threads, populate it first or guard it
//! with a lock.
//!
//! # Logging
//!
//! The crate uses the [`log`](https://docs.rs/log/latest/log/) crate with the
//! `reddit_objects` target. Install a `log`-compatible logger to see fetches.

#![warn(rustdoc::missing_crate_level_docs)]

mod attribute;
mod config;
mod error;
mod kind;
mod object;
mod redditor;
mod session;
mod snapshot;
mod subreddit;
mod transport;

pub use attribute::{normalize, AttributeValue, Attributes, DELETED, REDDITOR_KEYS};
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use kind::{Comment, Message, ObjectKind, Redditor, Submission, Subreddit, Variant};
pub use object::{LazyObject, ObjectOptions, LIST_PAYLOAD_KEY, STATE_PROBE};
pub use session::Session;
pub use snapshot::{Snapshot, SnapshotValue};
pub use transport::{HttpTransport, Transport};
