use crate::domain::driftavbrott::Driftavbrott;
use std::collections::HashMap;

/// Language part of a locale tag; `"en-US"`, `"en_US"` and `"EN"` all
/// normalize to `en`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(String);

impl Locale {
    pub fn parse(tag: &str) -> Option<Locale> {
        let language: String = tag
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if language.is_empty() {
            None
        } else {
            Some(Locale(language.to_ascii_lowercase()))
        }
    }

    pub fn language(&self) -> &str {
        &self.0
    }

    pub fn is_english(&self) -> bool {
        self.0 == "en"
    }
}

/// Forced configuration wins, then whatever the downstream response says,
/// then the caller's Accept-Language, then Swedish.
pub fn resolve_locale(
    forced: Option<&Locale>,
    content_language: Option<&str>,
    accept_language: Option<&str>,
) -> Locale {
    if let Some(locale) = forced {
        return locale.clone();
    }
    if let Some(locale) = content_language.and_then(Locale::parse) {
        return locale;
    }
    if let Some(locale) = accept_language
        .and_then(|header| header.split(',').next())
        .and_then(Locale::parse)
    {
        return locale;
    }
    Locale("sv".to_string())
}

/// Per-language channel to template tables; `{0}` carries the window start,
/// `{1}` the end.
#[derive(Debug, Default)]
pub struct MessageCatalog {
    tables: HashMap<String, HashMap<String, String>>,
}

impl MessageCatalog {
    /// The catalogs bundled with the crate (Swedish and English).
    pub fn builtin() -> MessageCatalog {
        let mut catalog = MessageCatalog::default();
        catalog.load("sv", include_str!("../i18n/sv.toml"));
        catalog.load("en", include_str!("../i18n/en.toml"));
        catalog
    }

    pub fn with_entry(mut self, language: &str, kanal: &str, template: &str) -> Self {
        self.tables
            .entry(language.to_string())
            .or_default()
            .insert(kanal.to_string(), template.to_string());
        self
    }

    pub fn lookup(&self, locale: &Locale, kanal: &str) -> Option<&str> {
        self.tables
            .get(locale.language())
            .and_then(|table| table.get(kanal))
            .map(String::as_str)
    }

    fn load(&mut self, language: &str, text: &str) {
        match toml::from_str::<HashMap<String, String>>(text) {
            Ok(entries) => {
                self.tables.insert(language.to_string(), entries);
            }
            Err(e) => tracing::error!("unreadable {language} message catalog: {e}"),
        }
    }
}

/// The catalog template for the channel, or the window's own message when
/// the locale has none.
pub fn resolve_message(catalog: &MessageCatalog, avbrott: &Driftavbrott, locale: &Locale) -> String {
    match catalog
        .lookup(locale, &avbrott.kanal)
        .filter(|template| !template.is_empty())
    {
        Some(template) => fill_template(template, &avbrott.start_text(), &avbrott.slut_text()),
        None => {
            tracing::debug!(
                "no {} translation for kanal {}, using the window's own message",
                locale.language(),
                avbrott.kanal
            );
            if locale.is_english() {
                avbrott.meddelande_en.clone()
            } else {
                avbrott.meddelande_sv.clone()
            }
        }
    }
}

fn fill_template(template: &str, start: &str, slut: &str) -> String {
    template.replace("{0}", start).replace("{1}", slut)
}
