//! Heading slugs.

/// Convert heading text to a URL-safe slug.
///
/// Lowercases the text and collapses every run of whitespace or punctuation
/// into a single hyphen. The result never starts or ends with a hyphen.
///
/// ```
/// use folio_mdx::slug::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("snake_case and kebab-case"), "snake-case-and-kebab-case");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(slugify("Ünïcode Héading"), "ünïcode-héading");
    }

    #[test]
    fn punctuation_only_is_empty() {
        assert_eq!(slugify("?!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn is_idempotent() {
        let once = slugify("Why Rust? A retrospective.");
        assert_eq!(slugify(&once), once);
        assert_eq!(once, "why-rust-a-retrospective");
    }
}
