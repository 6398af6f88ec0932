use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const ROMAN_DIGITS: [(char, &str); 5] = [
    ('2', "ii"),
    ('3', "iii"),
    ('4', "iv"),
    ('5', "v"),
    ('6', "vi"),
];

/// `normalize("Pokémon 3") == normalize("pokemon iii") == "pokemoniii"`.
pub fn normalize(title: &str) -> String {
    let stripped: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    let mut out = String::with_capacity(stripped.len() + 8);
    for ch in stripped.chars() {
        match ROMAN_DIGITS.iter().find(|(d, _)| *d == ch) {
            Some((_, roman)) => out.push_str(roman),
            None => out.push(ch),
        }
    }
    out
}
