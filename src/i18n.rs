use once_cell::sync::OnceCell;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use tracing::debug;

static TRANSLATIONS: OnceCell<HashMap<String, String>> = OnceCell::new();

const EMBEDDED: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.yml")),
    ("pt-br", include_str!("../locales/pt-br.yml")),
];

/// Picks the catalog once. Later calls are ignored.
pub fn init(language: Option<&str>) {
    let lang = language
        .map(normalize_language)
        .unwrap_or_else(detect_language);
    let _ = TRANSLATIONS.set(load_translations(&lang));
}

fn translations() -> &'static HashMap<String, String> {
    TRANSLATIONS.get_or_init(|| load_translations(&detect_language()))
}

fn load_translations(lang: &str) -> HashMap<String, String> {
    // A locales/<lang>.yml next to the binary's working dir wins over the embedded copy
    let locale_file = format!("locales/{}.yml", lang);
    if let Ok(content) = fs::read_to_string(&locale_file) {
        let translations = parse_catalog(&content, lang);
        if !translations.is_empty() {
            debug!(file = %locale_file, "loaded translations from disk");
            return translations;
        }
    }

    let embedded = |lang: &str| {
        EMBEDDED
            .iter()
            .find(|(code, _)| *code == lang)
            .map(|(code, content)| parse_catalog(content, code))
            .unwrap_or_default()
    };

    let translations = embedded(lang);
    if translations.is_empty() {
        embedded("en")
    } else {
        translations
    }
}

/// Catalogs are a single top-level key (the language) mapping message ids to strings.
fn parse_catalog(content: &str, lang: &str) -> HashMap<String, String> {
    let mut translations = HashMap::new();

    let Ok(yaml) = serde_yaml::from_str::<Value>(content) else {
        return translations;
    };
    let Some(trans_map) = yaml
        .get(lang)
        .and_then(Value::as_mapping)
    else {
        return translations;
    };

    for (key, value) in trans_map {
        if let (Some(k), Some(v)) = (key.as_str(), value.as_str()) {
            translations.insert(k.to_string(), v.to_string());
        }
    }
    translations
}

fn normalize_language(lang: &str) -> String {
    let lang = lang.to_lowercase().replace('_', "-");
    if lang.starts_with("pt") {
        return "pt-br".to_string();
    }
    for short in ["es", "fr", "de"] {
        if lang.starts_with(short) {
            return short.to_string();
        }
    }
    if lang.starts_with("en") {
        return "en".to_string();
    }
    lang
}

fn detect_language() -> String {
    for var in ["LC_ALL", "LANG", "LOCALE"] {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() && value != "C" && value != "POSIX" && !value.starts_with("C.") {
                return normalize_language(&value);
            }
        }
    }

    "en".to_string() // Default to English
}

pub fn t(key: &str) -> String {
    translations()
        .get(key)
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    interpolate(&t(key), args)
}

/// Replaces `%{name}` placeholders.
fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (k, v) in args {
        result = result.replace(&format!("%{{{}}}", k), v);
    }
    result
}
