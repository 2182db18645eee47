//! Domain layer types and the post pipeline.

pub mod entities;
pub mod error;
pub mod feed;
pub mod merge;
pub mod normalize;
pub mod posts;
pub mod tags;
