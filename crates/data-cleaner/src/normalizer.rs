//! Header and Text Normalization

/// Normalize a column name: trim, lowercase, each space becomes `_`
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Title-case text: a letter is upper-cased when it follows a non-letter
/// (or starts the string) and lower-cased otherwise
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Sale Date "), "sale_date");
        assert_eq!(normalize_header("Year_Built"), "year_built");
        assert_eq!(normalize_header("Land  Use"), "land__use");
        assert_eq!(normalize_header("acreage"), "acreage");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("SINGLE FAMILY"), "Single Family");
        assert_eq!(title_case("vacant res land"), "Vacant Res Land");
        assert_eq!(title_case("o'neil-3rd"), "O'Neil-3Rd");
        assert_eq!(title_case(""), "");
    }
}
