use super::ErrorSet;

use syn::{ext::IdentExt, parse::ParseStream, punctuated::Punctuated, Token};

#[derive(Debug)]
pub(crate) struct Field {
    /// Field identifier, as written
    pub(crate) ident: syn::Ident,

    /// Field name with any `r#` prefix removed
    pub(crate) name: String,

    pub(crate) ty: syn::Type,

    /// The raw `#[orm("...")]` tag, empty when absent
    pub(crate) tag: String,

    /// The name set by `#[serde(rename = "...")]`
    pub(crate) json_name: Option<String>,

    pub(crate) kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Maps to one column
    Leaf,

    /// `#[orm(embed)]`: the field's own fields are flattened into the parent
    Embedded,

    /// Tagged `-`; not mapped at all
    Skipped,
}

/// Contents of one `#[orm(...)]` attribute.
enum OrmAttr {
    Tag(syn::LitStr),
    Embed,
}

impl Field {
    pub(super) fn from_ast(field: &syn::Field) -> syn::Result<Self> {
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "model fields must be named"));
        };

        let mut errs = ErrorSet::new();
        let mut tag: Option<syn::LitStr> = None;
        let mut embed = false;
        let mut json_name = None;

        for attr in &field.attrs {
            if attr.path().is_ident("orm") {
                match attr.parse_args_with(parse_orm_attr) {
                    Ok(OrmAttr::Tag(lit)) if tag.is_some() => {
                        errs.push(syn::Error::new_spanned(lit, "duplicate `orm` tag"));
                    }
                    Ok(OrmAttr::Tag(lit)) => tag = Some(lit),
                    Ok(OrmAttr::Embed) if embed => {
                        errs.push(syn::Error::new_spanned(attr, "duplicate #[orm(embed)]"));
                    }
                    Ok(OrmAttr::Embed) => embed = true,
                    Err(err) => errs.push(err),
                }
            } else if attr.path().is_ident("serde") {
                if let Some(rename) = serde_rename(attr) {
                    json_name = Some(rename);
                }
            }
        }

        if embed {
            if let Some(tag) = &tag {
                errs.push(syn::Error::new_spanned(
                    tag,
                    "an embedded field cannot also have a column tag",
                ));
            }
        }

        errs.finish()?;

        let tag = tag.map(|lit| lit.value()).unwrap_or_default();

        let kind = if embed {
            FieldKind::Embedded
        } else if tag.trim() == "-" {
            FieldKind::Skipped
        } else {
            FieldKind::Leaf
        };

        Ok(Self {
            ident: ident.clone(),
            name: ident.unraw().to_string(),
            ty: field.ty.clone(),
            tag,
            json_name,
            kind,
        })
    }
}

fn parse_orm_attr(input: ParseStream<'_>) -> syn::Result<OrmAttr> {
    if input.peek(syn::LitStr) {
        return Ok(OrmAttr::Tag(input.parse()?));
    }

    let ident: syn::Ident = input.parse()?;
    if ident == "embed" {
        Ok(OrmAttr::Embed)
    } else {
        Err(syn::Error::new_spanned(
            ident,
            "expected a tag string or `embed`",
        ))
    }
}

/// Reads `rename = "..."` out of a `#[serde(...)]` attribute.
///
/// Attributes that do not parse are left for serde to report.
fn serde_rename(attr: &syn::Attribute) -> Option<String> {
    let metas = attr
        .parse_args_with(Punctuated::<syn::Meta, Token![,]>::parse_terminated)
        .ok()?;

    metas.iter().find_map(|meta| match meta {
        syn::Meta::NameValue(nv) if nv.path.is_ident("rename") => match &nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => Some(lit.value()),
            _ => None,
        },
        _ => None,
    })
}
