//! Hand-written `Fields` implementations, standing in for the derive macro.

#![allow(unused_macros)]

macro_rules! leaf {
    ($ty:ident . $field:ident : $fty:ty, $tag:literal) => {
        leaf!($ty . $field : $fty, $tag, None)
    };
    ($ty:ident . $field:ident : $fty:ty, $tag:literal, $json:expr) => {
        quarry_core::schema::FieldDef {
            name: stringify!($field),
            tag: $tag,
            json_name: $json,
            kind: quarry_core::schema::FieldKind::Leaf {
                ty: <$fty as quarry_core::FieldType>::type_info,
                accessor: quarry_core::schema::Accessor {
                    get: |v| {
                        v.downcast_ref::<$ty>()
                            .map(|m| &m.$field as &dyn std::any::Any)
                    },
                    get_mut: |v| {
                        v.downcast_mut::<$ty>()
                            .map(|m| &mut m.$field as &mut dyn std::any::Any)
                    },
                },
            },
        }
    };
}

macro_rules! embedded {
    ($ty:ident . $field:ident : $fty:ty) => {
        quarry_core::schema::FieldDef {
            name: stringify!($field),
            tag: "",
            json_name: None,
            kind: quarry_core::schema::FieldKind::Embedded {
                accessor: quarry_core::schema::Accessor {
                    get: |v| {
                        v.downcast_ref::<$ty>()
                            .map(|m| &m.$field as &dyn std::any::Any)
                    },
                    get_mut: |v| {
                        v.downcast_mut::<$ty>()
                            .map(|m| &mut m.$field as &mut dyn std::any::Any)
                    },
                },
                fields: <$fty as quarry_core::Fields>::fields,
            },
        }
    };
}

/// `impl Fields for T` from a list of `field: Type = "tag"` entries.
macro_rules! impl_fields {
    ($ty:ident { $( $field:ident : $fty:ty = $tag:literal ),* $(,)? }) => {
        impl quarry_core::Fields for $ty {
            fn fields() -> Vec<quarry_core::schema::FieldDef> {
                vec![ $( leaf!($ty . $field : $fty, $tag) ),* ]
            }
        }
    };
}

/// Builds a result set from column names and rows of values.
macro_rules! rows {
    ( [ $( $col:literal ),* ] $( [ $( $val:expr ),* ] )* ) => {{
        let mut rows = quarry_core::stmt::Rows::new(vec![ $( $col.to_string() ),* ]);
        $(
            rows.push(vec![ $( quarry_core::stmt::Value::from($val) ),* ]);
        )*
        rows
    }};
}
