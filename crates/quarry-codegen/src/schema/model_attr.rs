use super::ErrorSet;

use syn::{punctuated::Punctuated, Token};

#[derive(Debug, Default)]
pub(crate) struct ModelAttr {
    /// Optional database table name to map the model to
    pub(crate) table: Option<syn::LitStr>,

    /// Columns an upsert assigns on conflict
    pub(crate) update_columns: Option<Vec<syn::LitStr>>,
}

impl ModelAttr {
    /// Reads every `#[model(...)]` attribute.
    ///
    /// Accepts `table = "name"` and `update_columns("a", "b")`.
    pub(super) fn populate_from_ast(&mut self, attrs: &[syn::Attribute]) -> syn::Result<()> {
        let mut errs = ErrorSet::new();

        for attr in attrs {
            if !attr.path().is_ident("model") {
                continue;
            }

            let res = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    if self.table.is_some() {
                        errs.push(syn::Error::new_spanned(&lit, "duplicate `table` attribute"));
                    } else {
                        self.table = Some(lit);
                    }
                    Ok(())
                } else if meta.path.is_ident("update_columns") {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let columns =
                        Punctuated::<syn::LitStr, Token![,]>::parse_terminated(&content)?;
                    if self.update_columns.is_some() {
                        errs.push(meta.error("duplicate `update_columns` attribute"));
                    } else {
                        self.update_columns = Some(columns.into_iter().collect());
                    }
                    Ok(())
                } else {
                    Err(meta.error("expected `table` or `update_columns`"))
                }
            });

            if let Err(err) = res {
                errs.push(err);
            }
        }

        errs.finish()
    }
}
