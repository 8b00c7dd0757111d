//! Client-side aggregation layer for a Zentao project-management backend.

pub mod api;
pub mod bugs;
pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod tasks;
