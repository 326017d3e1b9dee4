/// Greeting, substitutions and trailing tag for targets that get a
/// language-flavoured placeholder.
struct MockStyle {
    greeting: &'static str,
    substitutions: &'static [(&'static str, &'static str)],
    tag: &'static str,
}

const SPANISH: MockStyle = MockStyle {
    greeting: "¡Hola! Esta es una traducción simulada al español: ",
    substitutions: &[
        ("hello", "hola"),
        ("world", "mundo"),
        ("good", "bueno"),
        ("thank you", "gracias"),
    ],
    tag: " (traducción simulada)",
};

const FRENCH: MockStyle = MockStyle {
    greeting: "Bonjour! Ceci est une traduction simulée en français: ",
    substitutions: &[
        ("hello", "bonjour"),
        ("world", "monde"),
        ("good", "bon"),
        ("thank you", "merci"),
    ],
    tag: " (traduction simulée)",
};

const GERMAN: MockStyle = MockStyle {
    greeting: "Hallo! Dies ist eine simulierte deutsche Übersetzung: ",
    substitutions: &[
        ("hello", "hallo"),
        ("world", "Welt"),
        ("good", "gut"),
        ("thank you", "danke"),
    ],
    tag: " (simulierte Übersetzung)",
};

const CHINESE: MockStyle = MockStyle {
    greeting: "您好！这是一个模拟翻译：",
    substitutions: &[],
    tag: " (模拟)",
};

const JAPANESE: MockStyle = MockStyle {
    greeting: "こんにちは！これは模擬翻訳です：",
    substitutions: &[],
    tag: " (シミュレーション)",
};

const RUSSIAN: MockStyle = MockStyle {
    greeting: "Привет! Это симулированный перевод: ",
    substitutions: &[],
    tag: " (симуляция)",
};

const ARABIC: MockStyle = MockStyle {
    greeting: "مرحبا! هذه ترجمة محاكاة: ",
    substitutions: &[],
    tag: " (محاكاة)",
};

const HINDI: MockStyle = MockStyle {
    greeting: "नमस्ते! यह एक अनुकरणीय अनुवाद है: ",
    substitutions: &[],
    tag: " (अनुकरण)",
};

const SWAHILI: MockStyle = MockStyle {
    greeting: "Hujambo! Hii ni tafsiri ya kuigiza: ",
    substitutions: &[],
    tag: " (mfano)",
};

fn style_for(target_code: &str) -> Option<&'static MockStyle> {
    match target_code {
        "es" => Some(&SPANISH),
        "fr" => Some(&FRENCH),
        "de" => Some(&GERMAN),
        "zh" => Some(&CHINESE),
        "ja" => Some(&JAPANESE),
        "ru" => Some(&RUSSIAN),
        "ar" => Some(&ARABIC),
        "hi" => Some(&HINDI),
        "sw" => Some(&SWAHILI),
        _ => None,
    }
}

/// Deterministic placeholder used when no provider produced a result.
///
/// Substitutions are plain, case-sensitive substring replacements applied in
/// table order. Unknown targets get `[Mock: src → tgt] text`.
pub fn generate_mock_translation(text: &str, source_code: &str, target_code: &str) -> String {
    match style_for(target_code) {
        Some(style) => {
            let body = style
                .substitutions
                .iter()
                .fold(text.to_owned(), |acc, (from, to)| acc.replace(from, to));
            format!("{}{}{}", style.greeting, body, style.tag)
        }
        None => format!("[Mock: {source_code} → {target_code}] {text}"),
    }
}

#[derive(Clone, Debug)]
pub struct MockTranslator;

impl MockTranslator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, text: &str, source_code: &str, target_code: &str) -> String {
        generate_mock_translation(text, source_code, target_code)
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}
