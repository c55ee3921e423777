//! Subway network service.
//!
//! Manages stations, lines and the sections joining them, and answers:
//! "what is the shortest route between these two stations?"

pub mod domain;
pub mod path;
pub mod store;
pub mod web;
