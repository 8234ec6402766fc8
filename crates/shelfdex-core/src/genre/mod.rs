//! Genre code normalization
//!
//! Maps opaque FB2 genre codes to display names and a Latin transliteration
//! of the display name, so `detektivnaya` finds `Детективная фантастика`.

mod table;

use std::collections::HashMap;
use std::sync::OnceLock;

static DISPLAY_NAMES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn display_names() -> &'static HashMap<&'static str, &'static str> {
    DISPLAY_NAMES.get_or_init(|| table::GENRES.iter().copied().collect())
}

/// Derived names of one genre
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreNames {
    pub name: String,
    pub translit: String,
}

/// Display name for a code; unmapped codes display as themselves
pub fn display_name(code: &str) -> &str {
    display_names().get(code).copied().unwrap_or(code)
}

pub fn normalize(code: &str) -> GenreNames {
    let name = display_name(code);
    GenreNames {
        name: name.to_string(),
        translit: transliterate(name),
    }
}

/// Character-by-character Cyrillic to Latin substitution
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        match latin(lower) {
            Some(sub) if c != lower => {
                let mut chars = sub.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                }
            }
            Some(sub) => out.push_str(sub),
            None => out.push(c),
        }
    }
    out
}

fn latin(c: char) -> Option<&'static str> {
    let sub = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' | 'ы' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ґ' => "g",
        _ => return None,
    };
    Some(sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_code() {
        let names = normalize("sf_detective");
        assert_eq!(names.name, "Детективная фантастика");
        assert_eq!(names.translit, "Detektivnaya fantastika");
    }

    #[test]
    fn test_unmapped_code_falls_back() {
        let names = normalize("made_up_genre");
        assert_eq!(names.name, "made_up_genre");
        assert_eq!(names.translit, "made_up_genre");
    }

    #[test]
    fn test_transliterate_case_and_soft_signs() {
        assert_eq!(transliterate("Щука и Ёж"), "Shchuka i Ezh");
        assert_eq!(transliterate("Объятья"), "Obyatya");
        assert_eq!(transliterate("SF & фэнтези"), "SF & fentezi");
    }

    #[test]
    fn test_table_has_no_duplicate_codes() {
        assert_eq!(display_names().len(), table::GENRES.len());
    }
}
