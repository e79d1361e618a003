use std::time::Duration;

use crate::{error::ErrorKind, Error};

#[derive(Debug)]
pub(super) struct QueryTimedOut {
    duration: Duration,
}

impl Error {
    pub fn query_timed_out(duration: Duration) -> Error {
        ErrorKind::QueryTimedOut(QueryTimedOut { duration }).into()
    }

    pub fn is_query_timed_out(&self) -> bool {
        self.any(|kind| matches!(kind, ErrorKind::QueryTimedOut(_)))
    }
}

impl std::error::Error for QueryTimedOut {}

impl core::fmt::Display for QueryTimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "query timed out after {:?}", self.duration)
    }
}
