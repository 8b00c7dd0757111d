mod projects;

pub use projects::{ProjectCache, ProjectQuery, DEFAULT_PROJECT_TTL};
