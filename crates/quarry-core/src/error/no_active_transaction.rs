use crate::{error::ErrorKind, Error};

#[derive(Debug)]
pub(super) struct NoActiveTransaction {
    operation: &'static str,
}

impl Error {
    /// `commit` or `rollback` was called on a handle that never began a transaction.
    pub fn no_active_transaction(operation: &'static str) -> Error {
        ErrorKind::NoActiveTransaction(NoActiveTransaction { operation }).into()
    }

    pub fn is_no_active_transaction(&self) -> bool {
        self.any(|kind| matches!(kind, ErrorKind::NoActiveTransaction(_)))
    }
}

impl std::error::Error for NoActiveTransaction {}

impl core::fmt::Display for NoActiveTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot {} without an active transaction", self.operation)
    }
}
