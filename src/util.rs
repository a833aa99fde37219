//! Shared utility functions.

/// Convert a slug to title case.
///
/// Splits on `-` and `_`, capitalizes each word.
/// "error-handling" -> "Error Handling"
/// "dependency_injection" -> "Dependency Injection"
pub fn title_case(s: &str) -> String {
    s.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a string to a URL-safe slug.
///
/// Lowercases, replaces whitespace with `-`, drops everything that is not
/// alphanumeric or `-`.
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .replace(char::is_whitespace, "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("error-handling"), "Error Handling");
        assert_eq!(title_case("introduction"), "Introduction");
        assert_eq!(title_case("dependency_injection"), "Dependency Injection");
        assert_eq!(title_case("README"), "README");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("Functional Error Handling"), "functional-error-handling");
    }
}
