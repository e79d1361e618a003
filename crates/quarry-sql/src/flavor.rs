/// SQL dialect a driver speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Postgresql,
    Sqlite,
}

impl Flavor {
    /// Rewrites `$N` placeholders into this flavor's positional syntax.
    ///
    /// SQLite treats `$1` as a *named* parameter and numbers parameters by
    /// first appearance, which breaks statements that bind `$2` before `$1`.
    /// `?N` keeps the explicit index. Placeholders inside quoted strings,
    /// quoted identifiers and comments are left untouched.
    pub fn rewrite(self, sql: &str) -> String {
        match self {
            Flavor::Postgresql => sql.to_string(),
            Flavor::Sqlite => rewrite_numbered(sql, '?'),
        }
    }
}

fn rewrite_numbered(sql: &str, marker: char) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                for inner in chars.by_ref() {
                    out.push(inner);
                    if inner == c {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(c);
                for inner in chars.by_ref() {
                    out.push(inner);
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '$' if chars.peek().is_some_and(|next| next.is_ascii_digit()) => {
                out.push(marker);
                while let Some(&digit) = chars.peek() {
                    if !digit.is_ascii_digit() {
                        break;
                    }
                    out.push(digit);
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }

    out
}
