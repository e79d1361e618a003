/// Options parsed from a field's `#[orm("...")]` attribute.
///
/// Tokens are separated by `;`. Recognized tokens are `column:<name>`, `pk`,
/// `auto`, `nullable`, `unique`, `type:<sql type>` and `default:<expr>`. A
/// lone `-` skips the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub skip: bool,
    pub column: Option<String>,
    pub pk: bool,
    pub auto_increment: bool,
    pub nullable: bool,
    pub unique: bool,
    pub sql_type: Option<String>,
    pub default: Option<String>,
}

impl Tag {
    /// Parses a tag. Parsing never fails: unknown tokens are logged and ignored.
    pub fn parse(src: &str) -> Tag {
        let mut tag = Tag::default();

        if src.trim() == "-" {
            tag.skip = true;
            return tag;
        }

        for token in src.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            match token.split_once(':') {
                Some(("column", name)) if !name.trim().is_empty() => {
                    tag.column = Some(name.trim().to_string());
                }
                Some(("type", ty)) => tag.sql_type = Some(ty.trim().to_string()),
                Some(("default", expr)) => tag.default = Some(expr.trim().to_string()),
                None if token == "pk" => tag.pk = true,
                None if token == "auto" => tag.auto_increment = true,
                None if token == "nullable" => tag.nullable = true,
                None if token == "unique" => tag.unique = true,
                _ => log::warn!("ignoring unknown orm tag token `{token}` in `{src}`"),
            }
        }

        tag
    }

    /// The column name for a field, defaulting to the field's own name.
    pub fn column_or<'a>(&'a self, field_name: &'a str) -> &'a str {
        self.column.as_deref().unwrap_or(field_name)
    }
}
