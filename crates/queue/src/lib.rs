//! Background job queue for reelboard.
//!
//! This crate provides asynchronous job processing using Redis:
//!
//! - **Jobs**: New-post notification emails
//! - **Workers**: Concurrent job execution with Apalis

pub mod jobs;
pub mod notify_impl;
pub mod workers;

pub use jobs::*;
pub use notify_impl::RedisNotifyService;
pub use workers::*;
