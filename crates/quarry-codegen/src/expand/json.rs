use proc_macro2::TokenStream;
use quote::quote;

/// A serde type stored as a JSON document in a single column.
///
/// The type also becomes a valid element of JSON collections, so
/// `Vec<T>` and `HashMap<String, T>` fields work too.
pub(super) fn expand_json_field(ident: &syn::Ident) -> TokenStream {
    let quarry = quote!(_quarry::codegen_support);

    quote! {
        impl #quarry::FieldType for #ident {
            fn type_info() -> #quarry::TypeInfo {
                #quarry::TypeInfo::json::<Self>(#quarry::Shape::Struct)
            }
        }

        impl #quarry::JsonElement for #ident {}
    }
}
