use super::Expand;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_model_impl(&self) -> TokenStream {
        let quarry = &self.quarry;
        let model_ident = &self.model.ident;

        let table_name = self.model.attr.table.as_ref().map(|table| {
            quote! {
                fn table_name() -> #quarry::Option<&'static str> {
                    #quarry::Some(#table)
                }
            }
        });

        let update_columns = self.model.attr.update_columns.as_ref().map(|columns| {
            quote! {
                fn update_columns() -> #quarry::Option<&'static [&'static str]> {
                    #quarry::Some(&[ #( #columns ),* ])
                }
            }
        });

        quote! {
            impl #quarry::Model for #model_ident {
                #table_name
                #update_columns
            }
        }
    }
}
