pub mod auth;
pub mod response;

pub use auth::MaybeCaller;
pub use response::{ApiResponse, ApiResult, JsonBody};
