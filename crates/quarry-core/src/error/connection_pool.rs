use super::{write_sources, Error};

/// Failure to hand out a pooled connection: the driver could not connect,
/// or the pool was closed.
#[derive(Debug)]
pub(super) struct ConnectionPoolError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for ConnectionPoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl core::fmt::Display for ConnectionPoolError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("connection pool: ")?;
        write_sources(f, &*self.source)
    }
}

impl Error {
    pub fn connection_pool(source: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::ConnectionPool(ConnectionPoolError {
            source: Box::new(source),
        }))
    }

    pub fn is_connection_pool(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::ConnectionPool(_)))
    }
}
