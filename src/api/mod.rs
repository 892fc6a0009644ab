pub mod definition_handlers;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mapping_handlers;
pub mod routes;
pub mod variable_handlers;

pub use error::ApiError;
pub use extract::{ApiJson, ApiPath, RawText};
pub use handlers::*;
pub use routes::*;
