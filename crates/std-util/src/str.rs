use heck::ToSnakeCase;

/// Returns the plural form of an English word.
pub fn pluralize(word: &str) -> String {
    pluralizer::pluralize(word, 2, false)
}

pub fn snake_case(src: &str) -> String {
    src.to_snake_case()
}
