//! Case conversion for derived annotation names
//!
//! Field identifiers become annotation names through the delimited
//! conversion below. Acronyms stay one word (`JSONData` -> `json-data`,
//! `userID` -> `user-id`) and a digit ends a word when a letter follows it
//! (`numbers2and55with000` -> `numbers2_and55_with000`). The output is part
//! of the annotation vocabulary, so these rules must not drift.

use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// `snake_case`
pub fn to_snake(s: &str) -> String {
    to_delimited(s, b'_')
}

/// `snake_case`, leaving words that follow `ignore` untouched by boundary rules
pub fn to_snake_with_ignore(s: &str, ignore: u8) -> String {
    to_screaming_delimited(s, b'_', ignore, false)
}

/// `SCREAMING_SNAKE_CASE`
pub fn to_screaming_snake(s: &str) -> String {
    to_screaming_delimited(s, b'_', 0, true)
}

/// `kebab-case`
pub fn to_kebab(s: &str) -> String {
    to_delimited(s, b'-')
}

/// `SCREAMING-KEBAB-CASE`
pub fn to_screaming_kebab(s: &str) -> String {
    to_screaming_delimited(s, b'-', 0, true)
}

/// `lowerCamelCase`
pub fn to_lower_camel(s: &str) -> String {
    s.to_lower_camel_case()
}

/// `UpperCamelCase`
pub fn to_upper_camel(s: &str) -> String {
    s.to_upper_camel_case()
}

/// Lowercase words joined by `delimiter`
pub fn to_delimited(s: &str, delimiter: u8) -> String {
    to_screaming_delimited(s, delimiter, 0, false)
}

/// Words joined by `delimiter`, upper-cased when `screaming`
///
/// A byte equal to `ignore` is copied as is, and no word boundary is
/// inserted right after it. Spaces are collapsed into one delimiter per
/// space; leading and trailing spaces are dropped.
pub fn to_screaming_delimited(s: &str, delimiter: u8, ignore: u8, screaming: bool) -> String {
    let bytes = s.as_bytes();
    let mut n: Vec<u8> = Vec::with_capacity(bytes.len() + 2);
    let mut start = true;
    let mut spaces = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        if b == b' ' {
            spaces += 1;
            continue;
        } else if start {
            start = false;
            spaces = 0;
        } else {
            while spaces > 0 {
                n.push(if ignore == b' ' { b' ' } else { delimiter });
                spaces -= 1;
            }
        }

        let is_cap = b.is_ascii_uppercase();
        let is_low = b.is_ascii_lowercase();
        let mut v = b;
        if is_low && screaming {
            v = v.to_ascii_uppercase();
        } else if is_cap && !screaming {
            v = v.to_ascii_lowercase();
        }

        if let Some(&next) = bytes.get(i + 1) {
            let is_num = v.is_ascii_digit();
            let next_cap = next.is_ascii_uppercase();
            let next_low = next.is_ascii_lowercase();

            if (is_cap && next_low) || (is_low && next_cap) || (is_num && (next_cap || next_low)) {
                let prev_ignore = ignore > 0 && i > 0 && bytes[i - 1] == ignore;
                if !prev_ignore {
                    // Last letter of an acronym starts the next word: JSONData
                    if is_cap && next_low && i > 0 && bytes[i - 1].is_ascii_uppercase() {
                        n.push(delimiter);
                    }
                    n.push(v);
                    if is_low || is_num {
                        n.push(delimiter);
                    }
                    continue;
                }
            }
        }

        if (v == b' ' || v == b'_' || v == b'-') && v != ignore {
            n.push(delimiter);
        } else {
            n.push(v);
        }
    }

    String::from_utf8_lossy(&n).into_owned()
}
