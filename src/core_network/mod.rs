pub mod error;
pub mod network;
pub mod transport;

use tokio::io::{AsyncRead, AsyncWrite};

pub use error::SessionError;
pub use network::{run_session_loop, ServerContext, SessionEnd};

/// Read side of a connection, boxed so sessions and the client can run on a
/// TCP socket in production and on in-memory pipes in tests.
pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
/// Write side of a connection.
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;
