use lazy_static::lazy_static;
use std::collections::HashMap;

const CYRILLIC: &str = "абвгдеєжзиіїйклмнопрстуфхцчшщьюя";

const LATIN: [&str; 32] = [
    "a", "b", "v", "g", "d", "e", "je", "zh", "z", "y", "i", "ji", "j", "k", "l", "m", "n", "o",
    "p", "r", "s", "t", "u", "f", "h", "ts", "ch", "sh", "sch", "", "ju", "ja",
];

lazy_static! {
    /// Lower- and upper-case Ukrainian letters to their Latin spelling.
    /// The soft sign maps to "" and disappears.
    static ref TRANSLITERATION: HashMap<char, String> = {
        let mut table = HashMap::with_capacity(CYRILLIC.chars().count() * 2);
        for (letter, latin) in CYRILLIC.chars().zip(LATIN) {
            table.insert(letter, latin.to_string());
            for upper in letter.to_uppercase() {
                table.insert(upper, latin.to_uppercase());
            }
        }
        table
    };
}

/// Normalize a file name: transliterate and sanitize the part before the
/// first `.`, keep everything after it verbatim.
///
/// `Привіт.txt` becomes `Pryvit.txt`; `my photo (1).tar.gz` becomes
/// `my_photo__1_.tar.gz`. Names without a `.` come back without one rather
/// than being reassembled as `{stem}.` (`Makefile`, not `Makefile.`).
pub fn normalize(name: &str) -> String {
    match name.split_once('.') {
        Some((stem, extension)) => format!("{}.{}", normalize_stem(stem), extension),
        None => normalize_stem(name),
    }
}

fn normalize_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    for c in stem.chars() {
        match TRANSLITERATION.get(&c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_safe_stem(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    #[test]
    fn test_transliterates_stem_and_keeps_extension() {
        assert_eq!(normalize("Привіт.txt"), "Pryvit.txt");
        assert_eq!(normalize("звіт.docx"), "zvit.docx");
    }

    #[test]
    fn test_upper_case_targets_are_upper_cased() {
        assert_eq!(normalize("Євген.jpg"), "JEvgen.jpg");
        assert_eq!(normalize("ЩУКА.png"), "SCHUKA.png");
        assert_eq!(normalize("Юля.mp3"), "JUlja.mp3");
    }

    #[test]
    fn test_soft_sign_is_elided() {
        assert_eq!(normalize("сіль.txt"), "sil.txt");
        assert_eq!(normalize("СІЛЬ.txt"), "SIL.txt");
    }

    #[test]
    fn test_non_word_characters_become_underscores() {
        assert_eq!(normalize("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(normalize("a-b+c!.pdf"), "a_b_c_.pdf");
    }

    #[test]
    fn test_unmapped_letters_are_sanitized() {
        // Russian ё and ы are outside the table.
        assert_eq!(normalize("ёлка.txt"), "_lka.txt");
        assert_eq!(normalize("café.txt"), "caf_.txt");
    }

    #[test]
    fn test_extension_remainder_is_verbatim() {
        assert_eq!(normalize("архів.tar.gz"), "arhiv.tar.gz");
        assert_eq!(normalize("x.Some Weird.Ext"), "x.Some Weird.Ext");
    }

    #[test]
    fn test_name_without_dot() {
        assert_eq!(normalize("Makefile"), "Makefile");
        assert_eq!(normalize("нотатки"), "notatky");
    }

    #[test]
    fn test_dotfile_has_empty_stem() {
        assert_eq!(normalize(".bashrc"), ".bashrc");
    }

    #[test]
    fn test_idempotent_without_collapsing_underscores() {
        let inputs = ["Привіт.txt", "a  b__c.md", "Щ-Ь-Ю.tar.gz", "plain"];
        for input in inputs {
            let once = normalize(input);
            let twice = normalize(&once);
            assert_eq!(once, twice, "normalize is not idempotent for {input:?}");
        }
        assert_eq!(normalize("a  b__c.md"), "a__b__c.md");
    }

    #[test]
    fn test_every_mapped_letter_yields_safe_stem() {
        let lower: String = CYRILLIC.chars().collect();
        let upper: String = CYRILLIC.chars().flat_map(char::to_uppercase).collect();
        for stem in [lower, upper] {
            let name = format!("{stem}_42.tar.gz");
            let normalized = normalize(&name);
            let (out_stem, out_ext) = normalized.split_once('.').unwrap();
            assert!(is_safe_stem(out_stem), "unsafe stem {out_stem:?}");
            assert!(!out_stem.is_empty());
            assert_eq!(out_ext, "tar.gz");
        }
    }
}
