//! Job workers.

mod notify;

pub use notify::{NotifyContext, notify_worker};
