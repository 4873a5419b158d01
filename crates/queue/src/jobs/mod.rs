//! Job definitions.

#![allow(missing_docs)]

mod notify;

pub use notify::NotifyNewPostJob;
