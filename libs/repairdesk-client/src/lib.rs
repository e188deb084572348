//! Client side of RepairDesk: an authenticated HTTP client, the session
//! manager that owns the bearer token, batched uploads and a role-driven
//! dashboard view model.

pub mod dashboard;
pub mod error;
pub mod http;
pub mod model;
pub mod session;
pub mod store;
pub mod upload;

pub use dashboard::Dashboard;
pub use error::ClientError;
pub use http::ApiClient;
pub use session::SessionManager;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use upload::{PendingFile, UploadBatch};
