/// Unwraps an `Ok`, panicking with the error's `Debug` form otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(err) => panic!("expected `Ok`; err={:?}", err),
        }
    };
}

/// Unwraps an `Err`.
///
/// `assert_err!(expr => is_kind)` also checks the error with its `is_kind`
/// predicate, for error types that classify themselves that way.
#[macro_export]
macro_rules! assert_err {
    ($e:expr => $is:ident) => {{
        let err = $crate::assert_err!($e);
        assert!(err.$is(), "expected `{}`; actual={:?}", stringify!($is), err);
        err
    }};
    ($e:expr) => {
        match $e {
            Err(e) => e,
            Ok(v) => panic!("expected `Err`; actual=Ok({:?})", v),
        }
    };
}
