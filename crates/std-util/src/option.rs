/// Unwraps a `Some`.
#[macro_export]
macro_rules! assert_some {
    ($e:expr) => {
        match $e {
            Some(value) => value,
            None => panic!("expected `Some`; actual=None"),
        }
    };
}

/// Asserts an `Option` is `None`, printing the value otherwise.
#[macro_export]
macro_rules! assert_none {
    ($e:expr) => {
        if let Some(value) = $e {
            panic!("expected `None`; actual=Some({:?})", value);
        }
    };
}
