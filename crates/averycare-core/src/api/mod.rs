//! Backend API plumbing shared by the transport and the effect orchestrators.

pub mod query;
pub mod transport;

pub use query::SparseQuery;
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport};
