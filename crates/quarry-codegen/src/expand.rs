mod fields;
mod json;
mod model;

use crate::schema::Model;

use proc_macro2::TokenStream;
use quote::quote;

struct Expand<'a> {
    /// The struct being expanded
    model: &'a Model,

    /// Path prefix for quarry types
    quarry: TokenStream,
}

impl<'a> Expand<'a> {
    fn new(model: &'a Model) -> Self {
        Self {
            model,
            quarry: quote!(_quarry::codegen_support),
        }
    }
}

pub(super) fn model(model: &Model) -> TokenStream {
    let expand = Expand::new(model);
    let fields_impl = expand.expand_fields_impl();
    let model_impl = expand.expand_model_impl();

    wrap_in_const(quote! {
        #fields_impl
        #model_impl
    })
}

pub(super) fn fields(model: &Model) -> TokenStream {
    wrap_in_const(Expand::new(model).expand_fields_impl())
}

pub(super) fn json_field(ident: &syn::Ident) -> TokenStream {
    wrap_in_const(json::expand_json_field(ident))
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use quarry as _quarry;
            #code
        };
    }
}
