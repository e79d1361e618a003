use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ID: AtomicU32 = AtomicU32::new(0);

/// A database schema owned by one test.
///
/// Names combine the process id with a per-process counter, so tests running
/// in parallel, in one process or several, never share tables.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "postgresql"), allow(dead_code))]
pub struct TestSchema {
    name: String,
}

#[cfg_attr(not(feature = "postgresql"), allow(dead_code))]
impl TestSchema {
    pub fn new() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            name: format!("test_{}_{id}", std::process::id()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn create_sql(&self) -> String {
        format!("CREATE SCHEMA IF NOT EXISTS {}", self.name)
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_test_gets_its_own_schema() {
        let a = TestSchema::new();
        let b = TestSchema::new();
        assert_ne!(a.name(), b.name());

        let pid = std::process::id().to_string();
        let parts: Vec<_> = a.name().split('_').collect();
        assert_eq!(parts[..2], ["test", pid.as_str()]);
        assert!(parts[2].parse::<u32>().is_ok());

        assert_eq!(b.drop_sql(), format!("DROP SCHEMA IF EXISTS {} CASCADE", b.name()));
    }
}
