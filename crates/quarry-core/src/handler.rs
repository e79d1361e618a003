//! Conversion strategies between model fields and driver values.
//!
//! A field's [`TypeInfo`] is resolved against an ordered chain of handlers
//! once, when its model is registered. The first handler that claims the type
//! wins, so more specific strategies sit ahead of generic ones. The last
//! handler claims every type, which keeps resolution total.

mod bytes;
use bytes::BytesHandler;

mod fallback;
use fallback::FallbackHandler;

mod json;
use json::JsonHandler;

mod pointer;
use pointer::PointerHandler;

mod primitive;
use primitive::PrimitiveHandler;

mod raw_json;
use raw_json::RawJsonHandler;

mod special;
use special::SpecialTypeHandler;

mod valuer;
use valuer::ValuerHandler;

use crate::{stmt::Value, ty::Shape, ty::TypeInfo, Result};

use std::{any::Any, fmt, sync::Arc};

/// Converts values of the types it claims to and from driver values.
pub trait TypeHandler: Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, ty: &TypeInfo) -> bool;

    /// Reads the field at `value` into a driver value for writing.
    fn extract(&self, value: &dyn Any, codec: &Codec) -> Result<Value>;

    /// Stores a driver value read from the database into the field at `dst`.
    fn scan(&self, dst: &mut dyn Any, codec: &Codec, value: Value) -> Result<()>;
}

static CHAIN: &[&dyn TypeHandler] = &[
    &PrimitiveHandler,
    &PointerHandler,
    &ValuerHandler,
    &SpecialTypeHandler,
    &RawJsonHandler,
    &BytesHandler,
    &JsonHandler,
    &FallbackHandler,
];

/// The handler chain, in resolution order.
pub fn chain() -> &'static [&'static dyn TypeHandler] {
    CHAIN
}

/// Returns the first handler in the chain that claims `ty`.
pub fn resolve(ty: &TypeInfo) -> &'static dyn TypeHandler {
    CHAIN
        .iter()
        .copied()
        .find(|handler| handler.can_handle(ty))
        .unwrap_or(&FallbackHandler)
}

/// A field type bound to its handler.
///
/// Built once per field at registration; reading and writing rows never walks
/// the chain again.
#[derive(Clone)]
pub struct Codec {
    handler: &'static dyn TypeHandler,
    ty: TypeInfo,
    inner: Option<Box<Codec>>,
    column: Arc<str>,
}

impl Codec {
    pub fn resolve(ty: TypeInfo, column: impl Into<Arc<str>>) -> Codec {
        let column = column.into();
        let inner = match &ty.shape {
            Shape::Option(inner, _) => Some(Box::new(Codec::resolve(
                (**inner).clone(),
                column.clone(),
            ))),
            _ => None,
        };

        Codec {
            handler: resolve(&ty),
            ty,
            inner,
            column,
        }
    }

    pub fn handler_name(&self) -> &'static str {
        self.handler.name()
    }

    pub fn ty(&self) -> &TypeInfo {
        &self.ty
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// The codec of the value inside an `Option`.
    pub fn inner(&self) -> Option<&Codec> {
        self.inner.as_deref()
    }

    pub fn extract(&self, value: &dyn Any) -> Result<Value> {
        self.handler.extract(value, self)
    }

    pub fn scan(&self, dst: &mut dyn Any, value: Value) -> Result<()> {
        self.handler.scan(dst, self, value)
    }

    /// Binds this codec to a destination field.
    pub fn scan_target<'a>(&'a self, dst: &'a mut dyn Any) -> ScanTarget<'a> {
        ScanTarget { codec: self, dst }
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("handler", &self.handler.name())
            .field("ty", &self.ty.name)
            .field("column", &self.column)
            .finish()
    }
}

/// A writable sink for one column of one row.
pub struct ScanTarget<'a> {
    codec: &'a Codec,
    dst: &'a mut dyn Any,
}

impl ScanTarget<'_> {
    pub fn column(&self) -> &str {
        self.codec.column()
    }

    /// Stores `value` in the destination field.
    pub fn assign(self, value: Value) -> Result<()> {
        self.codec.scan(self.dst, value)
    }
}

/// Returns the codec of an `Option`'s contents.
fn inner_codec(codec: &Codec) -> Result<&Codec> {
    codec
        .inner()
        .ok_or_else(|| crate::err!("`{}` has no inner type", codec.ty.name))
}
