//! Supported UI locales and their number/collation conventions.
//!
//! The calculator never owns locale *selection*; it only reacts when the host
//! hands it a different [`Locale`].

use std::cmp::Ordering;

/// A UI / number-formatting locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    /// BCP 47 tag, e.g. `de-DE`.
    pub code: &'static str,
    /// Native display name for the locale picker.
    pub label: &'static str,
    pub decimal_separator: char,
    pub group_separator: char,
    /// Digits the integer part needs beyond the first group before grouping kicks in.
    pub min_grouping_digits: usize,
}

impl Locale {
    /// Two-letter language code used by the message and item-name tables.
    pub fn lang_code(&self) -> &'static str {
        match self.code.split_once('-') {
            Some((lang, _)) => lang,
            None => self.code,
        }
    }

    /// Look up a supported locale by full code (`de-DE`) or bare language (`de`).
    pub fn find(code: &str) -> Option<Locale> {
        let code = code.trim();
        LOCALES
            .iter()
            .find(|l| l.code.eq_ignore_ascii_case(code))
            .or_else(|| {
                let lang = code.split(['-', '_']).next().unwrap_or(code);
                LOCALES.iter().find(|l| l.lang_code().eq_ignore_ascii_case(lang))
            })
            .copied()
    }

    /// Position in [`LOCALES`].
    pub fn index(&self) -> usize {
        LOCALES.iter().position(|l| l.code == self.code).unwrap_or(0)
    }

    /// The next locale in picker order, wrapping around.
    pub fn next(&self) -> Locale {
        LOCALES[(self.index() + 1) % LOCALES.len()]
    }
}

impl Default for Locale {
    fn default() -> Self {
        LOCALES[0]
    }
}

const NBSP: char = '\u{a0}';
const NNBSP: char = '\u{202f}';

/// Every locale the message table carries text for, in picker order.
pub const LOCALES: [Locale; 10] = [
    Locale { code: "en-US", label: "English", decimal_separator: '.', group_separator: ',', min_grouping_digits: 1 },
    Locale { code: "fr-FR", label: "Français", decimal_separator: ',', group_separator: NNBSP, min_grouping_digits: 1 },
    Locale { code: "es-ES", label: "Español", decimal_separator: ',', group_separator: '.', min_grouping_digits: 2 },
    Locale { code: "de-DE", label: "Deutsch", decimal_separator: ',', group_separator: '.', min_grouping_digits: 1 },
    Locale { code: "pl-PL", label: "Polski", decimal_separator: ',', group_separator: NBSP, min_grouping_digits: 2 },
    Locale { code: "ru-RU", label: "Русский", decimal_separator: ',', group_separator: NBSP, min_grouping_digits: 1 },
    Locale { code: "uk-UA", label: "Українська", decimal_separator: ',', group_separator: NBSP, min_grouping_digits: 1 },
    Locale { code: "ko-KR", label: "한국어", decimal_separator: '.', group_separator: ',', min_grouping_digits: 1 },
    Locale { code: "zh-CN", label: "中文", decimal_separator: '.', group_separator: ',', min_grouping_digits: 1 },
    Locale { code: "ja-JP", label: "日本語", decimal_separator: '.', group_separator: ',', min_grouping_digits: 1 },
];

/// Compare two display names the way `locale`'s collator would at primary
/// strength: case and diacritics are ignored first, then the raw text breaks
/// ties so the result is a total order. Alphabets that treat an accented
/// form as a letter of its own (Spanish `ñ`, Polish `ł`, Ukrainian `ї`) sort
/// it after its base letter.
pub fn compare_names(a: &str, b: &str, locale: &Locale) -> Ordering {
    let lang = locale.lang_code();
    let primary = collation_key(a, lang).cmp(&collation_key(b, lang));
    primary.then_with(|| a.cmp(b))
}

/// Primary weights: base letter, then the letter's rank after that base.
fn collation_key(s: &str, lang: &str) -> Vec<(char, u8)> {
    let mut key = Vec::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        if let Some(weight) = tailored(c, lang) {
            key.push(weight);
        } else if let Some(folded) = fold_root(c) {
            key.extend(folded.chars().map(|f| (f, 0)));
        } else {
            key.push((c, 0));
        }
    }
    key
}

fn tailored(c: char, lang: &str) -> Option<(char, u8)> {
    let weight = match (lang, c) {
        ("es", 'ñ') => ('n', 1),
        ("pl", 'ą') => ('a', 1),
        ("pl", 'ć') => ('c', 1),
        ("pl", 'ę') => ('e', 1),
        ("pl", 'ł') => ('l', 1),
        ("pl", 'ń') => ('n', 1),
        ("pl", 'ó') => ('o', 1),
        ("pl", 'ś') => ('s', 1),
        ("pl", 'ź') => ('z', 1),
        ("pl", 'ż') => ('z', 2),
        ("uk", 'ґ') => ('г', 1),
        ("uk", 'є') => ('е', 1),
        ("uk", 'і') => ('и', 1),
        ("uk", 'ї') => ('и', 2),
        _ => return None,
    };
    Some(weight)
}

fn fold_root(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'ę' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ł' => "l",
        'ñ' | 'ń' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ś' | 'š' => "s",
        'ß' => "ss",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'ё' => "е",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_code_strips_region() {
        assert_eq!(Locale::find("de-DE").unwrap().lang_code(), "de");
        assert_eq!(Locale::default().lang_code(), "en");
    }

    #[test]
    fn find_accepts_bare_language_and_underscores() {
        assert_eq!(Locale::find("fr").unwrap().code, "fr-FR");
        assert_eq!(Locale::find("pl_PL").unwrap().code, "pl-PL");
        assert_eq!(Locale::find("DE-de").unwrap().code, "de-DE");
        assert!(Locale::find("xx").is_none());
    }

    #[test]
    fn next_wraps_around() {
        let last = LOCALES[LOCALES.len() - 1];
        assert_eq!(last.next(), LOCALES[0]);
        assert_eq!(LOCALES[0].next(), LOCALES[1]);
    }

    #[test]
    fn compare_ignores_case_and_accents() {
        let de = Locale::find("de").unwrap();
        // "Öl" sorts with "ol", before "Pech"
        assert_eq!(compare_names("Öl", "Pech", &de), Ordering::Less);
        assert_eq!(compare_names("apfel", "Birne", &de), Ordering::Less);
        assert_eq!(compare_names("Birne", "apfel", &de), Ordering::Greater);
    }

    #[test]
    fn compare_is_total_for_case_variants() {
        let en = Locale::default();
        assert_ne!(compare_names("wood", "Wood", &en), Ordering::Equal);
        assert_eq!(compare_names("Wood", "Wood", &en), Ordering::Equal);
    }

    #[test]
    fn spanish_sorts_enye_after_n() {
        assert_eq!(compare_names("Ñu", "Nz", &Locale::find("es").unwrap()), Ordering::Greater);
        assert_eq!(compare_names("Ñu", "Oso", &Locale::find("es").unwrap()), Ordering::Less);
        // elsewhere ñ is an accented n
        assert_eq!(compare_names("Ñu", "Nz", &Locale::default()), Ordering::Less);
    }

    #[test]
    fn polish_letters_follow_their_base() {
        let pl = Locale::find("pl").unwrap();
        assert_eq!(compare_names("Kłb", "Klz", &pl), Ordering::Greater);
        assert_eq!(compare_names("Śruba", "Szkło", &pl), Ordering::Greater);
        assert_eq!(compare_names("Źdźbło", "Żelazo", &pl), Ordering::Less);
        assert_eq!(compare_names("Żelazo", "Zboże", &pl), Ordering::Greater);
        assert_eq!(compare_names("Kłb", "Klz", &Locale::default()), Ordering::Less);
    }

    #[test]
    fn ukrainian_letters_follow_their_base() {
        let uk = Locale::find("uk").unwrap();
        assert_eq!(compare_names("Ґанок", "Гя", &uk), Ordering::Greater);
        assert_eq!(compare_names("Ґанок", "Дуб", &uk), Ordering::Less);
        assert_eq!(compare_names("Їжа", "Ізюм", &uk), Ordering::Greater);
        assert_eq!(compare_names("Ізюм", "Йод", &uk), Ordering::Less);
        assert_eq!(compare_names("Євро", "Жито", &uk), Ordering::Less);
    }

    #[test]
    fn russian_yo_sorts_with_ye() {
        let ru = Locale::find("ru").unwrap();
        assert_eq!(compare_names("Тёсаный камень", "Тесто", &ru), Ordering::Less);
        assert_eq!(compare_names("Тёсаный камень", "Тж", &ru), Ordering::Less);
    }
}
