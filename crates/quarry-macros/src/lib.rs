extern crate proc_macro;

use proc_macro::TokenStream;

/// Maps a struct to a table. Implies `#[derive(Fields)]`.
#[proc_macro_derive(Model, attributes(model, orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    match quarry_codegen::generate_model(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[proc_macro_derive(Fields, attributes(orm))]
pub fn derive_fields(input: TokenStream) -> TokenStream {
    match quarry_codegen::generate_fields(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[proc_macro_derive(JsonField)]
pub fn derive_json_field(input: TokenStream) -> TokenStream {
    match quarry_codegen::generate_json_field(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
