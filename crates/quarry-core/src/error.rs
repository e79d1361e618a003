mod adhoc;
mod connection_pool;
mod driver_operation_failed;
mod invalid_connection_url;
mod invalid_schema;
mod json;
mod missing_column;
mod missing_primary_key;
mod model_not_registered;
mod no_active_transaction;
mod query_timed_out;
mod record_not_found;
mod type_conversion;
mod unsupported_type;

use adhoc::AdhocError;
use connection_pool::ConnectionPoolError;
use driver_operation_failed::DriverOperationFailed;
use invalid_connection_url::InvalidConnectionUrl;
use invalid_schema::InvalidSchema;
use json::JsonError;
use missing_column::MissingColumn;
use missing_primary_key::MissingPrimaryKey;
use model_not_registered::ModelNotRegistered;
use no_active_transaction::NoActiveTransaction;
use query_timed_out::QueryTimedOut;
use record_not_found::RecordNotFoundError;
use std::sync::Arc;
use type_conversion::TypeConversionError;
use unsupported_type::UnsupportedType;

/// Returns early with an ad hoc [`Error`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad hoc [`Error`] from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Quarry.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Wraps this error in `consequent`, which is displayed before it.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => inner.kind,
                // Shared consequents are rendered through their display text
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Returns `true` if any error in the context chain satisfies `f`.
    fn any(&self, f: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| f(err.kind()))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::DriverOperationFailed(err) => Some(err),
            ErrorKind::ConnectionPool(err) => Some(err),
            ErrorKind::Json(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Renders the chain outermost first: `outer: inner: root`.
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        for (depth, err) in self.chain().enumerate() {
            if depth > 0 {
                f.write_str(": ")?;
            }
            core::fmt::Display::fmt(err.kind(), f)?;
        }
        Ok(())
    }
}

/// `{:?}` matches `Display`; `{:#?}` lists the kind of every link.
impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if f.alternate() {
            f.debug_list()
                .entries(self.chain().map(|err| err.kind()))
                .finish()
        } else {
            core::fmt::Display::fmt(self, f)
        }
    }
}

/// Writes `err` followed by each of its sources, separated by `: `.
fn write_sources(
    f: &mut core::fmt::Formatter,
    err: &(dyn std::error::Error + Send + Sync + 'static),
) -> core::fmt::Result {
    core::fmt::Display::fmt(err, f)?;
    let mut source = err.source();
    while let Some(err) = source {
        write!(f, ": {err}")?;
        source = err.source();
    }
    Ok(())
}

macro_rules! error_kinds {
    ( $( $variant:ident($ty:ty), )* ) => {
        #[derive(Debug)]
        enum ErrorKind {
            $( $variant($ty), )*
            Unknown,
        }

        impl core::fmt::Display for ErrorKind {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                match self {
                    $( ErrorKind::$variant(err) => core::fmt::Display::fmt(err, f), )*
                    ErrorKind::Unknown => f.write_str("unknown quarry error"),
                }
            }
        }
    };
}

error_kinds! {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    DriverOperationFailed(DriverOperationFailed),
    ConnectionPool(ConnectionPoolError),
    InvalidConnectionUrl(InvalidConnectionUrl),
    InvalidSchema(InvalidSchema),
    Json(JsonError),
    MissingColumn(MissingColumn),
    MissingPrimaryKey(MissingPrimaryKey),
    ModelNotRegistered(ModelNotRegistered),
    NoActiveTransaction(NoActiveTransaction),
    QueryTimedOut(QueryTimedOut),
    RecordNotFound(RecordNotFoundError),
    TypeConversion(TypeConversionError),
    UnsupportedType(UnsupportedType),
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

/// Parse failures from value conversions carry no structure worth keeping
macro_rules! from_via_anyhow {
    ( $( $ty:ty ),* ) => {
        $(
            impl From<$ty> for Error {
                fn from(err: $ty) -> Error {
                    Error::from(anyhow::Error::from(err))
                }
            }
        )*
    };
}

from_via_anyhow!(
    std::num::ParseIntError,
    std::num::ParseFloatError,
    std::io::Error,
    uuid::Error,
    chrono::ParseError
);

/// Anything usable as context for [`Error::context`].
pub trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
