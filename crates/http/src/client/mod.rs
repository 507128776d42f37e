//! Unix domain socket client
//!
//! - [`ClientConfig`]: socket address, host header, deadline and parser limits
//! - [`UnixClient`]: opens one connection per exchange and runs it through
//!   [`HttpConnection`](crate::connection::HttpConnection)

mod config;
mod unix_client;

pub use config::ClientConfig;
pub use config::ClientConfigBuilder;
pub use config::ConfigError;
pub use config::DEFAULT_READ_BUFFER_SIZE;
pub use unix_client::UnixClient;
