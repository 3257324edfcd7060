use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Normalize a decoded string before it becomes part of a span.
///
/// NFC composition, ligature expansion, replacement-character and control
/// removal, and runs of spaces collapsed to one.
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.nfc() {
        match LIGATURES.iter().find(|(lig, _)| *lig == ch) {
            Some((_, expansion)) => result.push_str(expansion),
            None if ch == '\u{FFFD}' => {}
            None if ch == '\t' => result.push(' '),
            None if ch.is_control() => {}
            None => result.push(ch),
        }
    }

    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    let re_spaces = RE_SPACES.get_or_init(|| Regex::new(r" {2,}").expect("valid pattern"));
    re_spaces.replace_all(&result, " ").into_owned()
}

/// Returns `true` if `c` belongs to a script written without inter-word
/// spaces.
pub fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        // CJK Unified Ideographs and Extension A
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        // Extension B
        | 0x20000..=0x2A6DF
        | 0xF900..=0xFAFF
        // Hiragana, Katakana
        | 0x3040..=0x30FF
        | 0x31F0..=0x31FF
        // Hangul
        | 0xAC00..=0xD7AF
        | 0x1100..=0x11FF
        | 0x3130..=0x318F
        | 0x3000..=0x303F
        | 0xFF00..=0xFFEF
        // Thai, Lao
        | 0x0E00..=0x0EFF
    )
}
