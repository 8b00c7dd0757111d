#[allow(clippy::module_inception)]
pub mod error;
pub mod request;

pub use error::{Result, ZentaoError};
pub use request::{preview_body, RequestError, RequestErrorKind};
