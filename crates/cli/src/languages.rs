//! Display-name to language-code registry owned by the command line layer.
//! The core never sees names, only the codes resolved here.

pub const DEFAULT_SOURCE_LANG: &str = "English";
pub const DEFAULT_TARGET_LANG: &str = "Spanish";

pub const LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Chinese", "zh"),
    ("Japanese", "ja"),
    ("Russian", "ru"),
    ("Arabic", "ar"),
    ("Hindi", "hi"),
    ("Swahili", "sw"),
    ("Italian", "it"),
    ("Portuguese", "pt"),
    ("Korean", "ko"),
    ("Dutch", "nl"),
    ("Turkish", "tr"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    pub label: String,
    pub code: String,
}

/// Accepts a display name or a code, both case-insensitive. Anything not in
/// the registry passes through untouched as its own code.
pub fn resolve(input: &str) -> Language {
    let input = input.trim();
    LANGUAGES
        .iter()
        .find(|(name, code)| name.eq_ignore_ascii_case(input) || code.eq_ignore_ascii_case(input))
        .map(|(name, code)| Language {
            label: (*name).to_owned(),
            code: (*code).to_owned(),
        })
        .unwrap_or_else(|| Language {
            label: input.to_owned(),
            code: input.to_owned(),
        })
}
