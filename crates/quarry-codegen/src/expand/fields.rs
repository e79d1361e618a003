use super::Expand;
use crate::schema::{Field, FieldKind};

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_fields_impl(&self) -> TokenStream {
        let quarry = &self.quarry;
        let model_ident = &self.model.ident;
        let field_defs = self.model.fields.iter().map(|field| self.expand_field_def(field));

        quote! {
            impl #quarry::Fields for #model_ident {
                fn fields() -> #quarry::Vec<#quarry::FieldDef> {
                    #quarry::Vec::from([ #( #field_defs, )* ])
                }
            }
        }
    }

    fn expand_field_def(&self, field: &Field) -> TokenStream {
        let quarry = &self.quarry;
        let ty = &field.ty;
        let name = &field.name;
        let accessor = self.expand_accessor(field);

        let kind = match field.kind {
            FieldKind::Embedded => quote! {
                #quarry::FieldKind::Embedded {
                    accessor: #accessor,
                    fields: <#ty as #quarry::Fields>::fields,
                }
            },
            FieldKind::Leaf | FieldKind::Skipped => quote! {
                #quarry::FieldKind::Leaf {
                    ty: <#ty as #quarry::FieldType>::type_info,
                    accessor: #accessor,
                }
            },
        };

        let tag = &field.tag;
        let json_name = match &field.json_name {
            Some(json_name) => quote!(#quarry::Some(#json_name)),
            None => quote!(#quarry::None),
        };

        quote! {
            #quarry::FieldDef {
                name: #name,
                tag: #tag,
                json_name: #json_name,
                kind: #kind,
            }
        }
    }

    /// Non-capturing closures that borrow the field out of a `&dyn Any`
    /// holding the struct.
    fn expand_accessor(&self, field: &Field) -> TokenStream {
        let quarry = &self.quarry;
        let model_ident = &self.model.ident;
        let field_ident = &field.ident;

        quote! {
            #quarry::Accessor {
                get: |value| {
                    value
                        .downcast_ref::<#model_ident>()
                        .map(|model| &model.#field_ident as &dyn #quarry::Any)
                },
                get_mut: |value| {
                    value
                        .downcast_mut::<#model_ident>()
                        .map(|model| &mut model.#field_ident as &mut dyn #quarry::Any)
                },
            }
        }
    }
}
