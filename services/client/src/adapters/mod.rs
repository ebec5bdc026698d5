pub mod http;
pub mod session;
pub mod upload;

pub use http::HttpBackend;
pub use session::{SessionCredentials, SharedSession};
pub use upload::{ObjectStore, StoredObject, UploadProxyClient, UploadReceipt};
