pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{require_admin, require_user, resolve_principal};
pub use extract::{ValidJson, ValidPath};
pub use response::{ApiResponse, ApiResult};
