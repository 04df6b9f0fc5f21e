/// Flattens extracted document text into a single line of
/// `[alphanumeric, space, '@', '.']` characters.
///
/// Punctuation is replaced by a space before whitespace runs are collapsed,
/// so the output never holds two consecutive spaces.
pub fn normalize(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_alphanumeric() || c == '@' || c == '.' {
            if pending_space && !output.is_empty() {
                output.push(' ');
            }
            pending_space = false;
            output.push(c);
        } else {
            pending_space = true;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_clean(text: &str) -> bool {
        !text.contains("  ")
            && text
                .chars()
                .all(|c| c.is_alphanumeric() || c == ' ' || c == '@' || c == '.')
            && text.trim() == text
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  Senior\tEngineer\n\n at   Acme  "), "Senior Engineer at Acme");
    }

    #[test]
    fn test_strips_punctuation_but_keeps_email_shape() {
        assert_eq!(
            normalize("Contact: john.doe@example.com, (555) 123-4567"),
            "Contact john.doe@example.com 555 123 4567"
        );
    }

    #[test]
    fn test_empty_and_noise_only_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
        assert_eq!(normalize("*** --- ///"), "");
    }

    #[test]
    fn test_unicode_letters_survive() {
        assert_eq!(normalize("Zürich • München"), "Zürich München");
    }

    #[test]
    fn test_output_is_always_clean() {
        let samples = [
            "a, b",
            "Skills:\u{00a0}python;  sql|aws",
            "\u{2022} Led team of 5 (2019–2021)\r\n",
            "under_score & ampersand",
            "...@@@...",
        ];
        for sample in samples {
            let normalized = normalize(sample);
            assert!(is_clean(&normalized), "unclean output for {:?}: {:?}", sample, normalized);
        }
    }
}
