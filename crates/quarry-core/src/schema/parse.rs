use super::{Accessor, FieldDef, FieldKind, FieldMetadata, Tag};
use crate::handler::Codec;

/// The flattened, column-backed fields of a struct.
#[derive(Debug, Clone, Default)]
pub struct ParsedFields {
    pub fields: Vec<FieldMetadata>,

    /// Index of the first field tagged `pk`, if any
    pub pk_index: Option<usize>,
}

impl ParsedFields {
    pub fn columns(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.column.clone()).collect()
    }
}

/// Flattens field definitions, recursing into embedded structs.
///
/// Skipped fields are dropped. Embedded fields take the position of the
/// embedding field, so declaration order is preserved.
pub fn parse_fields(defs: Vec<FieldDef>) -> ParsedFields {
    let mut parsed = ParsedFields::default();
    parse_into(defs, &[], &mut parsed);
    parsed
}

fn parse_into(defs: Vec<FieldDef>, base: &[Accessor], parsed: &mut ParsedFields) {
    for def in defs {
        match def.kind {
            FieldKind::Embedded { accessor, fields } => {
                let mut path = base.to_vec();
                path.push(accessor);
                parse_into(fields(), &path, parsed);
            }
            FieldKind::Leaf { ty, accessor } => {
                let tag = Tag::parse(def.tag);
                if tag.skip {
                    continue;
                }

                if tag.pk && parsed.pk_index.is_none() {
                    parsed.pk_index = Some(parsed.fields.len());
                }

                let column = tag.column_or(def.name).to_string();
                let ty = ty();
                let mut path = base.to_vec();
                path.push(accessor);

                parsed.fields.push(FieldMetadata {
                    name: def.name,
                    json_name: def.json_name,
                    explicit_column: tag.column.is_some(),
                    codec: Codec::resolve(ty.clone(), column.as_str()),
                    column,
                    ty,
                    pk: tag.pk,
                    auto_increment: tag.auto_increment,
                    nullable: tag.nullable,
                    unique: tag.unique,
                    sql_type: tag.sql_type,
                    default: tag.default,
                    path,
                });
            }
        }
    }
}
