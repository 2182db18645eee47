//! Post aggregation for a hosted-backend blog.
//!
//! Bundled posts and live backend rows are normalized into one [`domain::entities::Post`]
//! shape, merged by id, indexed by tag and filtered into a home feed.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
