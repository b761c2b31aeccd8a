//! Cyrillic to Latin transliteration table.
use std::collections::HashMap;
use std::sync::LazyLock;

/// Source alphabet, lower case. Upper-case letters are derived from it.
const CYRILLIC_SYMBOLS: &str = "абвгдеёжзийклмнопрстуфхцчшщъыьэюяєіїґ";

/// Replacement for each letter of [`CYRILLIC_SYMBOLS`], in the same order.
const TRANSLATION: [&str; 37] = [
    "a", "b", "v", "g", "d", "e", "e", "j", "z", "i", "j", "k", "l", "m", "n", "o", "p", "r", "s",
    "t", "u", "f", "h", "ts", "ch", "sh", "sch", "", "y", "", "e", "yu", "ya", "je", "i", "ji",
    "g",
];

static TABLE: LazyLock<HashMap<char, String>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(TRANSLATION.len() * 2);
    for (c, t) in CYRILLIC_SYMBOLS.chars().zip(TRANSLATION) {
        table.insert(c, t.to_string());
        for upper in c.to_uppercase() {
            table.insert(upper, t.to_uppercase());
        }
    }
    table
});

/// Returns the replacement for `c`, or `None` when `c` is not in the source alphabet.
pub fn lookup(c: char) -> Option<&'static str> {
    TABLE.get(&c).map(String::as_str)
}

/// Transliterates every character found in the table; other characters pass through.
///
/// ```
/// use clean_folder::translit::transliterate;
///
/// assert_eq!(transliterate("Отчёт"), "Otchet");
/// assert_eq!(transliterate("photo-1"), "photo-1");
/// ```
pub fn transliterate(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match lookup(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}
