//! Application services over the backend collaborator traits.

pub mod editor;
pub mod error;
pub mod feed;
pub mod repos;
pub mod uploads;
