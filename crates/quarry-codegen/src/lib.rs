mod expand;
mod schema;

use proc_macro2::TokenStream;

/// Expands `#[derive(Model)]`: a `Fields` impl plus a `Model` impl.
pub fn generate_model(input: TokenStream) -> syn::Result<TokenStream> {
    let item: syn::ItemStruct = syn::parse2(input)?;
    let model = schema::Model::from_ast(&item, true)?;

    Ok(expand::model(&model))
}

/// Expands `#[derive(Fields)]`, for structs embedded into a model or scanned
/// from raw rows.
pub fn generate_fields(input: TokenStream) -> syn::Result<TokenStream> {
    let item: syn::ItemStruct = syn::parse2(input)?;
    let model = schema::Model::from_ast(&item, false)?;

    Ok(expand::fields(&model))
}

/// Expands `#[derive(JsonField)]`: the type is stored as one JSON column.
pub fn generate_json_field(input: TokenStream) -> syn::Result<TokenStream> {
    let item: syn::DeriveInput = syn::parse2(input)?;

    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "JSON field generics are not supported",
        ));
    }

    Ok(expand::json_field(&item.ident))
}
