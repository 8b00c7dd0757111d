mod credentials;
mod http;

pub use credentials::{password_digest, Credentials};
pub use http::{RequestBody, ZentaoClient};

#[cfg(test)]
pub(crate) use http::test_support;
