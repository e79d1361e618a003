mod row;
pub use row::{Row, Rows};

mod value;
pub use value::Value;

/// Builds a `Vec<Value>` of statement arguments.
///
/// ```
/// let args = quarry_core::args![1_i64, "alice", None::<String>];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::stmt::Value>::new()
    };
    ( $( $arg:expr ),+ $(,)? ) => {
        ::std::vec![ $( $crate::stmt::Value::from($arg) ),+ ]
    };
}
