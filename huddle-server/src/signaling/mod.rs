mod api_error;
mod http_handler;
mod routes;

pub use api_error::*;
pub use http_handler::*;
pub use routes::*;
