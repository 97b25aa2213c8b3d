//! Label derivation from property names.

/// Derives a human-friendly title from a camelCase property name.
///
/// The first character is upper-cased and a space is inserted at every
/// lowercase-to-uppercase boundary: `firstName` becomes `First Name`.
/// Consecutive capitals stay together (`imageURL` becomes `Image URL`).
pub fn title_from_camel_case(camel: &str) -> String {
    let mut title = String::with_capacity(camel.len() + 4);
    let mut prev_is_lower = false;
    for (index, ch) in camel.chars().enumerate() {
        if index == 0 {
            title.extend(ch.to_uppercase());
        } else if ch.is_uppercase() && prev_is_lower {
            title.push(' ');
            title.push(ch);
        } else {
            title.push(ch);
        }
        prev_is_lower = ch.is_lowercase();
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_at_case_boundaries() {
        assert_eq!(title_from_camel_case("firstName"), "First Name");
        assert_eq!(title_from_camel_case("yearIncorporated"), "Year Incorporated");
    }

    #[test]
    fn test_single_word_is_capitalized() {
        assert_eq!(title_from_camel_case("email"), "Email");
        assert_eq!(title_from_camel_case("name"), "Name");
    }

    #[test]
    fn test_consecutive_capitals_stay_together() {
        assert_eq!(title_from_camel_case("imageURL"), "Image URL");
        assert_eq!(title_from_camel_case("URL"), "URL");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(title_from_camel_case(""), "");
    }
}
