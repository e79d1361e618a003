use lru::LruCache;
use std::num::NonZeroUsize;
use tokio_postgres::{Client, Error, Statement};

/// Prepared statements kept per connection.
const CAPACITY: usize = 128;

/// Prepared statements of one connection, keyed by SQL text.
///
/// Parameter types are left to the server, so the key is the text alone.
/// Once full, the least recently used statement is evicted. Dropping the
/// last handle to an evicted [`Statement`] closes it on the server.
#[derive(Debug)]
pub struct StatementCache<S = Statement> {
    statements: LruCache<String, S>,
}

impl StatementCache {
    pub fn new() -> Self {
        Self::with_capacity(CAPACITY)
    }

    pub async fn prepare(&mut self, client: &Client, query: &str) -> Result<Statement, Error> {
        if let Some(statement) = self.statements.get(query) {
            return Ok(statement.clone());
        }

        let statement = client.prepare(query).await?;
        self.statements.put(query.to_string(), statement.clone());
        Ok(statement)
    }
}

impl<S> StatementCache<S> {
    fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            statements: LruCache::new(capacity),
        }
    }
}
