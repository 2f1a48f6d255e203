//! String tables and the localization service.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use arena_core::error::LoadError;

use crate::collaborators::LocalizationService;

/// Language used when the requested one has no table.
pub const DEFAULT_LANGUAGE: &str = "en";

const BUILTIN_TABLES: [(&str, &str); 2] = [
    ("en", include_str!("../assets/strings/en.json")),
    ("es", include_str!("../assets/strings/es.json")),
];

/// Key to text mapping for one language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringTable {
    entries: HashMap<String, String>,
}

impl StringTable {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replace every `{name}` with its value from `options`. Unknown
/// placeholders are left as written.
pub fn substitute(template: &str, options: &[(&str, String)]) -> String {
    let mut text = template.to_string();
    for (name, value) in options {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

/// String tables for every known language plus the current selection.
///
/// Lookups miss through to the default language, then to the key itself.
#[derive(Debug, Clone)]
pub struct Localization {
    tables: HashMap<String, StringTable>,
    language: String,
}

impl Localization {
    /// Empty service with no tables.
    pub fn empty() -> Self {
        Self {
            tables: HashMap::new(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Service with the tables compiled into the binary.
    pub fn builtin() -> Result<Self, LoadError> {
        let mut localization = Self::empty();
        for (language, json) in BUILTIN_TABLES {
            localization.add_table(language, StringTable::from_json(json)?);
        }
        Ok(localization)
    }

    pub fn add_table(&mut self, language: &str, table: StringTable) {
        debug!(language, entries = table.len(), "string table added");
        self.tables.insert(language.to_string(), table);
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl Default for Localization {
    fn default() -> Self {
        Self::empty()
    }
}

impl LocalizationService for Localization {
    fn set_language(&mut self, language: &str) -> Result<(), LoadError> {
        if self.tables.contains_key(language) {
            self.language = language.to_string();
            return Ok(());
        }
        warn!(language, fallback = DEFAULT_LANGUAGE, "no string table for language");
        self.language = DEFAULT_LANGUAGE.to_string();
        Err(LoadError::NotFound(format!("strings/{language}.json")))
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn get_text(&self, key: &str, options: &[(&str, String)]) -> String {
        let template = self
            .tables
            .get(&self.language)
            .and_then(|t| t.get(key))
            .or_else(|| self.tables.get(DEFAULT_LANGUAGE).and_then(|t| t.get(key)))
            .unwrap_or(key);
        substitute(template, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_named_placeholders() {
        let text = substitute(
            "Wave {wave}: {count} left, wave {wave}",
            &[("wave", "3".into()), ("count", "7".into())],
        );
        assert_eq!(text, "Wave 3: 7 left, wave 3");
    }

    #[test]
    fn test_unknown_placeholder_left_alone() {
        assert_eq!(substitute("Hi {name}", &[]), "Hi {name}");
    }

    #[test]
    fn test_builtin_tables_parse() {
        let strings = Localization::builtin().unwrap();
        let mut languages: Vec<_> = strings.languages().collect();
        languages.sort();
        assert_eq!(languages, vec!["en", "es"]);
    }

    #[test]
    fn test_missing_key_falls_back_to_default_then_key() {
        let mut strings = Localization::builtin().unwrap();
        strings.set_language("es").unwrap();

        assert_eq!(strings.get_text("state.paused", &[]), "En pausa");
        // Only in the English table
        assert_eq!(
            strings.get_text("notice.power_up", &[("kind", "heal".into())]),
            "Picked up heal"
        );
        assert_eq!(strings.get_text("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let mut strings = Localization::builtin().unwrap();
        strings.set_language("es").unwrap();

        let err = strings.set_language("tlh").unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert_eq!(strings.language(), DEFAULT_LANGUAGE);
        assert_eq!(strings.get_text("state.paused", &[]), "Paused");
    }

    #[test]
    fn test_bad_table_rejected() {
        assert!(matches!(
            StringTable::from_json("[1, 2]"),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            StringTable::load(Path::new("/definitely/not/here.json")),
            Err(LoadError::NotFound(_))
        ));
    }
}
