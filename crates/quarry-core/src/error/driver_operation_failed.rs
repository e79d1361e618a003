use super::{write_sources, Error};

/// A statement, connection attempt or transaction command rejected by
/// `rusqlite` or `tokio-postgres`. The driver's own error is kept as the
/// source.
#[derive(Debug)]
pub(super) struct DriverOperationFailed {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DriverOperationFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl core::fmt::Display for DriverOperationFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write_sources(f, &*self.source)
    }
}

impl Error {
    pub fn driver_operation_failed(source: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::DriverOperationFailed(DriverOperationFailed {
            source: Box::new(source),
        }))
    }

    /// `true` when the database or its client library reported the failure.
    pub fn is_driver_operation_failed(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::DriverOperationFailed(_)))
    }
}
