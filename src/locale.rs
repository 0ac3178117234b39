//! Locale helpers: current locale, localized dates and language names

use chrono::{DateTime, Locale};

/// Locale used when nothing else is configured
pub const DEFAULT_LOCALE: &str = "en_US";

/// Native language names, keyed by ISO 639-1 code
const NATIVE_NAMES: &[(&str, &str)] = &[
    ("ar", "العربية"),
    ("bg", "български"),
    ("bs", "bosanski"),
    ("cs", "čeština"),
    ("da", "dansk"),
    ("de", "Deutsch"),
    ("el", "Ελληνικά"),
    ("en", "English"),
    ("es", "español"),
    ("et", "eesti"),
    ("eu", "euskara"),
    ("fa", "فارسی"),
    ("fi", "suomi"),
    ("fr", "français"),
    ("he", "עברית"),
    ("hi", "हिन्दी"),
    ("hr", "hrvatski"),
    ("hu", "magyar"),
    ("id", "Indonesia"),
    ("is", "íslenska"),
    ("it", "italiano"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("lt", "lietuvių"),
    ("ms", "Melayu"),
    ("nl", "Nederlands"),
    ("no", "norsk"),
    ("pl", "polski"),
    ("pt", "português"),
    ("pt-br", "português (Brasil)"),
    ("ro", "română"),
    ("ru", "русский"),
    ("sk", "slovenčina"),
    ("sl", "slovenščina"),
    ("sr", "српски"),
    ("sv", "svenska"),
    ("th", "ไทย"),
    ("tr", "Türkçe"),
    ("uk", "українська"),
    ("vi", "Tiếng Việt"),
    ("zh", "中文"),
];

/// ISO 639-2 (B and T) codes as returned by OpenSubtitles, mapped to 639-1
const THREE_LETTER: &[(&str, &str)] = &[
    ("ara", "ar"),
    ("bul", "bg"),
    ("bos", "bs"),
    ("cze", "cs"),
    ("ces", "cs"),
    ("dan", "da"),
    ("ger", "de"),
    ("deu", "de"),
    ("gre", "el"),
    ("ell", "el"),
    ("eng", "en"),
    ("spa", "es"),
    ("est", "et"),
    ("baq", "eu"),
    ("eus", "eu"),
    ("per", "fa"),
    ("fas", "fa"),
    ("fin", "fi"),
    ("fre", "fr"),
    ("fra", "fr"),
    ("heb", "he"),
    ("hin", "hi"),
    ("hrv", "hr"),
    ("hun", "hu"),
    ("ind", "id"),
    ("ice", "is"),
    ("isl", "is"),
    ("ita", "it"),
    ("jpn", "ja"),
    ("kor", "ko"),
    ("lit", "lt"),
    ("may", "ms"),
    ("msa", "ms"),
    ("dut", "nl"),
    ("nld", "nl"),
    ("nor", "no"),
    ("pol", "pl"),
    ("por", "pt"),
    ("pob", "pt-br"),
    ("rum", "ro"),
    ("ron", "ro"),
    ("rus", "ru"),
    ("slo", "sk"),
    ("slk", "sk"),
    ("slv", "sl"),
    ("srp", "sr"),
    ("swe", "sv"),
    ("tha", "th"),
    ("tur", "tr"),
    ("ukr", "uk"),
    ("vie", "vi"),
    ("chi", "zh"),
    ("zho", "zh"),
];

/// Resolve the locale to format dates with.
///
/// Order: explicit value (config or CLI), `LC_ALL`, `LANG`, then [`DEFAULT_LOCALE`].
pub fn current_locale(configured: Option<&str>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var("LC_ALL").ok())
        .or_else(|| std::env::var("LANG").ok())
        .and_then(|tag| normalize_locale(&tag))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// Turn a POSIX or BCP-47 tag into `ll_CC` form ("fr-FR", "fr_FR.UTF-8" -> "fr_FR").
///
/// Returns None for the C/POSIX locale and empty tags.
pub fn normalize_locale(tag: &str) -> Option<String> {
    let base = tag.split(['.', '@']).next().unwrap_or("").trim();
    if base.is_empty() || base.eq_ignore_ascii_case("c") || base.eq_ignore_ascii_case("posix") {
        return None;
    }

    let mut parts = base.split(['_', '-']);
    let lang = parts.next()?.to_lowercase();
    match parts.next() {
        Some(region) if !region.is_empty() => Some(format!("{}_{}", lang, region.to_uppercase())),
        _ => Some(lang),
    }
}

/// Format an air date (unix seconds) as "MMM dd, yyyy" in the given locale
pub fn format_aired(aired: i64, locale: &str) -> String {
    let Some(date) = DateTime::from_timestamp(aired, 0) else {
        return String::new();
    };
    let locale = Locale::try_from(locale).unwrap_or(Locale::POSIX);
    date.format_localized("%b %d, %Y", locale).to_string()
}

/// Canonical two-letter form of a subtitle language code
pub fn canonical_code(code: &str) -> String {
    let code = code.trim().to_lowercase().replace('_', "-");
    THREE_LETTER
        .iter()
        .find(|(three, _)| *three == code)
        .map(|(_, two)| two.to_string())
        .unwrap_or(code)
}

/// Name of a language in that language ("fr" -> "français").
///
/// Region variants fall back to the base language, unknown codes to the
/// uppercased code.
pub fn display_name(code: &str) -> String {
    let canonical = canonical_code(code);
    let lookup = |key: &str| {
        NATIVE_NAMES
            .iter()
            .find(|(c, _)| *c == key)
            .map(|(_, name)| name.to_string())
    };

    lookup(&canonical)
        .or_else(|| {
            canonical
                .split('-')
                .next()
                .and_then(|base| lookup(base))
        })
        .unwrap_or_else(|| code.to_uppercase())
}

/// Uppercase the first character ("français" -> "Français")
pub fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("fr_FR.UTF-8"), Some("fr_FR".into()));
        assert_eq!(normalize_locale("de-de"), Some("de_DE".into()));
        assert_eq!(normalize_locale("nl"), Some("nl".into()));
        assert_eq!(normalize_locale("C.UTF-8"), None);
        assert_eq!(normalize_locale("POSIX"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn test_current_locale_prefers_configured() {
        assert_eq!(current_locale(Some("es-ES")), "es_ES");
    }

    #[test]
    fn test_format_aired_english() {
        // 2008-01-20 02:00 UTC
        assert_eq!(format_aired(1_200_794_400, "en_US"), "Jan 20, 2008");
    }

    #[test]
    fn test_format_aired_unknown_locale_falls_back() {
        assert_eq!(format_aired(1_200_794_400, "xx_YY"), "Jan 20, 2008");
    }

    #[test]
    fn test_format_aired_localized() {
        let formatted = format_aired(1_200_794_400, "fr_FR");
        assert!(formatted.ends_with("20, 2008"), "{}", formatted);
        assert!(!formatted.starts_with("Jan "), "{}", formatted);
    }

    #[test]
    fn test_canonical_code() {
        assert_eq!(canonical_code("eng"), "en");
        assert_eq!(canonical_code("FRE"), "fr");
        assert_eq!(canonical_code("pob"), "pt-br");
        assert_eq!(canonical_code("pt_BR"), "pt-br");
        assert_eq!(canonical_code("nl"), "nl");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("fr"), "français");
        assert_eq!(display_name("eng"), "English");
        assert_eq!(display_name("pt-br"), "português (Brasil)");
        assert_eq!(display_name("es-MX"), "español");
        assert_eq!(display_name("xx"), "XX");
    }

    #[test]
    fn test_uppercase_first() {
        assert_eq!(uppercase_first("français"), "Français");
        assert_eq!(uppercase_first("ελληνικά"), "Ελληνικά");
        assert_eq!(uppercase_first(""), "");
    }
}
