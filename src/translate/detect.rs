// Source-language detection.
// Character-set heuristics for the languages the app ships with.

pub const ENGLISH: &str = "en";
pub const JAPANESE: &str = "ja";
pub const TURKISH: &str = "tr";

const TURKISH_LETTERS: &[char] = &['ç', 'ğ', 'ı', 'ö', 'ş', 'ü', 'Ç', 'Ğ', 'İ', 'Ö', 'Ş', 'Ü'];

/// Hiragana, katakana, common kanji and half-width katakana.
fn is_japanese(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{4E00}'..='\u{9FAF}'
        | '\u{FF66}'..='\u{FF9F}')
}

/// Guess the language of `text`. Japanese wins over Turkish; default is English.
pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(is_japanese) {
        JAPANESE
    } else if text.chars().any(|c| TURKISH_LETTERS.contains(&c)) {
        TURKISH
    } else {
        ENGLISH
    }
}
