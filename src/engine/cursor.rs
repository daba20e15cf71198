use crate::config::UserSettings;

/// Which kind of text surrounds the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Outside any math region; only patterns opted in via normal_mode apply
    Normal,
    /// Inside an unclosed `$`/`$$` region
    Math,
}

/// The lexical token immediately preceding the cursor, tagged with the
/// surrounding text mode. Produced fresh per query, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorWord {
    pub word: String,
    pub mode: TextMode,
}

const DELIMS: [char; 2] = ['$', ' '];
const ESCAPED_DELIMS: [char; 3] = ['{', '}', '$'];

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Scan the text before the cursor and report whether it leaves a math
/// region open.
///
/// `\$` never toggles state. Two unescaped `$` toggle double-dollar math
/// as a unit. A single unescaped `$` toggles single-dollar math, except
/// inside an open `$$` region. A `$` directly followed by whitespace
/// reads as currency, not as a math opener; at the end of the scanned
/// prefix the cursor sits right after it, so it still opens.
pub fn has_unclosed_math(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut in_math = false;
    let mut double_dollar = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        // Escaped dollar: consume both characters without toggling
        if c == '\\' && chars.get(i + 1) == Some(&'$') {
            i += 2;
            continue;
        }

        if c == '$' && chars.get(i + 1) == Some(&'$') {
            if !in_math {
                in_math = true;
                double_dollar = true;
                i += 2;
            } else if double_dollar {
                in_math = false;
                double_dollar = false;
                i += 2;
            } else {
                // Inside single-dollar math "$$" is not a unit; the next
                // iteration handles the second '$' as a closer.
                i += 1;
            }
            continue;
        }

        if c == '$' {
            if !in_math {
                if !chars.get(i + 1).is_some_and(|c| c.is_whitespace()) {
                    in_math = true;
                    double_dollar = false;
                }
            } else if !double_dollar {
                in_math = false;
            }
        }
        i += 1;
    }

    in_math
}

/// Extract the raw word before the cursor, tagged with the text mode.
///
/// Cuts only at hard delimiters (`$`, space) so regex patterns still see
/// the longer contextual span; class-based narrowing is `trim_word`'s
/// job. Returns None outside math when normal mode is disabled.
pub fn word_under_cursor(
    line: &str,
    cursor: usize,
    settings: &UserSettings,
) -> Option<CursorWord> {
    let chars: Vec<char> = line.chars().collect();
    let cursor = cursor.min(chars.len());
    let prefix: String = chars[..cursor].iter().collect();

    let mode = if has_unclosed_math(&prefix) {
        TextMode::Math
    } else {
        TextMode::Normal
    };
    if mode == TextMode::Normal && !settings.enable_normal_mode {
        return None;
    }

    let mut i = cursor as isize - 1;
    while i >= 0 {
        if DELIMS.contains(&chars[i as usize]) {
            i += 1;
            break;
        }
        i -= 1;
    }
    if i <= 0 {
        return Some(CursorWord { word: prefix, mode });
    }
    let word: String = chars[i as usize..cursor].iter().collect();
    Some(CursorWord { word, mode })
}

/// Narrow a raw cursor word to the token that feeds exact and fuzzy
/// lookup.
///
/// For the most part we assume a command is either entirely alpha or
/// entirely symbols; this way if the user types "\alpha=bet" we search
/// for "bet" and not the whole thing. The main exceptions are parens and
/// brackets, aka commands like \big). A backslash is always part of the
/// current token; `{`, `}`, `$` stop the scan, keeping the backslash
/// when they are escaped.
pub fn trim_word(word: &str) -> &str {
    if word.is_empty() {
        return word;
    }
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let alpha_end = is_alpha(chars[chars.len() - 1].1);

    let mut i = chars.len() as isize - 1;
    if alpha_end {
        i -= 1;
    }
    while i >= 0 {
        let cur = chars[i as usize].1;
        if DELIMS.contains(&cur) || (cur != '\\' && is_alpha(cur) != alpha_end) {
            i += 1;
            break;
        } else if ESCAPED_DELIMS.contains(&cur) {
            if i > 0 && chars[i as usize - 1].1 == '\\' {
                i -= 1;
            }
            break;
        } else {
            i -= 1;
        }
    }
    if i <= 0 {
        return word;
    }
    match chars.get(i as usize) {
        Some(&(byte, _)) => &word[byte..],
        None => "",
    }
}
