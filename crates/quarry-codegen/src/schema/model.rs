use super::{ErrorSet, Field, FieldKind, ModelAttr};

#[derive(Debug)]
pub(crate) struct Model {
    /// Type identifier
    pub(crate) ident: syn::Ident,

    /// Mapped fields in declaration order, skipped fields removed
    pub(crate) fields: Vec<Field>,

    /// Model-level attributes; always empty for plain `Fields` structs
    pub(crate) attr: ModelAttr,
}

impl Model {
    pub(crate) fn from_ast(ast: &syn::ItemStruct, is_model: bool) -> syn::Result<Self> {
        let syn::Fields::Named(node) = &ast.fields else {
            return Err(syn::Error::new_spanned(
                &ast.fields,
                "model fields must be named",
            ));
        };

        // Type-erased accessors need a concrete type
        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "model generics are not supported",
            ));
        }

        let mut errs = ErrorSet::new();
        let mut attr = ModelAttr::default();

        if is_model {
            if let Err(err) = attr.populate_from_ast(&ast.attrs) {
                errs.push(err);
            }
        }

        let mut fields = vec![];
        for node in &node.named {
            match Field::from_ast(node) {
                Ok(field) if field.kind == FieldKind::Skipped => {}
                Ok(field) => fields.push(field),
                Err(err) => errs.push(err),
            }
        }

        errs.finish()?;

        Ok(Self {
            ident: ast.ident.clone(),
            fields,
            attr,
        })
    }
}
