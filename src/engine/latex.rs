use regex::Regex;
use std::sync::LazyLock;

/// Matches empty (or whitespace-only) brace pairs in a LaTeX template
static EMPTY_BRACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*\}").expect("Invalid brace regex"));

/// Replace every empty `{}` placeholder with a colorized, sequentially
/// lettered argument marker, giving users a visual cue of argument
/// slots. Letters run a..z and cycle past 26.
pub fn fill_latex_braces(input: &str, color: &str) -> String {
    let mut slot = 0u32;
    EMPTY_BRACES
        .replace_all(input, |_: &regex::Captures| {
            let letter = (b'a' + (slot % 26) as u8) as char;
            slot += 1;
            format!("{{\\color{{{}}}{{{}}}}}", color, letter)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_empty_braces_in_sequence() {
        assert_eq!(
            fill_latex_braces("\\frac{}{}", "blue"),
            "\\frac{\\color{blue}{a}}{\\color{blue}{b}}"
        );
    }

    #[test]
    fn test_whitespace_only_braces_count_as_empty() {
        assert_eq!(
            fill_latex_braces("\\sqrt{ }", "red"),
            "\\sqrt{\\color{red}{a}}"
        );
    }

    #[test]
    fn test_filled_braces_untouched() {
        assert_eq!(fill_latex_braces("\\frac{1}{2}", "blue"), "\\frac{1}{2}");
        assert_eq!(fill_latex_braces("\\sum", "blue"), "\\sum");
    }

    #[test]
    fn test_letters_cycle_past_z() {
        let input = "{}".repeat(27);
        let filled = fill_latex_braces(&input, "blue");
        assert!(filled.starts_with("{\\color{blue}{a}}"));
        assert!(filled.ends_with("{\\color{blue}{a}}"));
        assert!(filled.contains("{\\color{blue}{z}}"));
    }
}
