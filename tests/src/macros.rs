/// A [`Builder`](quarry::db::Builder) with every listed model registered.
#[macro_export]
macro_rules! models {
    ( $( $model:ty ),* $(,)? ) => {{
        let mut builder = quarry::Db::builder();
        $( builder.register::<$model>(); )*
        builder
    }};
}

/// Turns each `async fn name(s: &impl Setup)` into one `#[test]` per enabled
/// database, in modules named after the database.
#[macro_export]
macro_rules! tests {
    ( @database $setup:expr; $( $( #[$attrs:meta] )* $f:ident ),+ ) => {
        $(
            #[test]
            $( #[$attrs] )*
            fn $f() {
                let mut test = $crate::QuarryTest::new($setup);
                test.run_test(|setup| async move {
                    super::$f(setup).await;
                });
            }
        )+
    };

    ( $( $( #[$attrs:meta] )* $f:ident ),+ $(,)? ) => {
        #[cfg(feature = "sqlite")]
        mod sqlite {
            $crate::tests!(@database $crate::db::sqlite::SetupSqlite; $( $( #[$attrs] )* $f ),+);
        }

        #[cfg(feature = "postgresql")]
        mod postgresql {
            $crate::tests!(@database $crate::db::postgresql::SetupPostgreSQL::new(); $( $( #[$attrs] )* $f ),+);
        }
    };
}
