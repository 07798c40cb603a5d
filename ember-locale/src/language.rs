use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use ember_core::ConfigError;

use crate::replace::replace_placeholders;
use crate::text::CommandText;

/// One language: the locale codes it covers, free-form texts and the
/// per-command text entries.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub languages: Vec<String>,
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
    #[serde(default)]
    pub command_texts: BTreeMap<String, CommandText>,
    #[serde(skip)]
    source: String,
}

impl Language {
    pub fn new(source: impl Into<String>, languages: Vec<String>) -> Self {
        Self {
            languages,
            texts: BTreeMap::new(),
            command_texts: BTreeMap::new(),
            source: source.into(),
        }
    }

    /// Parse a language from YAML. `source` names it in error messages.
    pub fn from_yaml(source: impl Into<String>, raw: &str) -> Result<Self, ConfigError> {
        let source = source.into();
        let mut language: Language = serde_yaml::from_str(raw).map_err(|e| ConfigError::InvalidLanguage {
            source_name: source.clone(),
            message: e.to_string(),
        })?;

        if language.languages.is_empty() {
            return Err(ConfigError::InvalidLanguage {
                source_name: source,
                message: "language covers no locale codes".to_owned(),
            });
        }

        language.source = source;
        Ok(language)
    }

    pub fn with_text(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.texts.insert(key.into(), template.into());
        self
    }

    pub fn with_command_text(mut self, command: impl Into<String>, text: CommandText) -> Self {
        self.command_texts.insert(command.into(), text);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The first covered locale, used when showing the language to users.
    pub fn display_locale(&self) -> &str {
        self.languages.first().map(String::as_str).unwrap_or_default()
    }

    pub fn covers(&self, locale: &str) -> bool {
        self.languages.iter().any(|code| code == locale)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    /// Look up `key` and fill its `{n}` placeholders.
    pub fn format<S: AsRef<str>>(&self, key: &str, args: &[S]) -> Option<String> {
        self.text(key).map(|template| replace_placeholders(template, args))
    }

    pub fn command_text(&self, command: &str) -> Option<&CommandText> {
        self.command_texts.get(command)
    }
}

/// Validated set of languages with a designated default.
#[derive(Clone, Debug)]
pub struct LanguageSet {
    languages: Vec<Arc<Language>>,
    default: usize,
}

impl LanguageSet {
    /// No locale code may be covered twice, and `default_locale` must be covered.
    pub fn new(languages: Vec<Language>, default_locale: &str) -> Result<Self, ConfigError> {
        let duplicates: Vec<String> = languages
            .iter()
            .enumerate()
            .filter(|(index, language)| {
                languages.iter().enumerate().any(|(other_index, other)| {
                    other_index != *index && other.languages.iter().any(|code| language.covers(code))
                })
            })
            .map(|(_, language)| language.source().to_owned())
            .collect();

        if !duplicates.is_empty() {
            return Err(ConfigError::DuplicateLanguage { sources: duplicates });
        }

        let default = languages
            .iter()
            .position(|language| language.covers(default_locale))
            .ok_or_else(|| ConfigError::DefaultLanguageNotFound {
                locale: default_locale.to_owned(),
            })?;

        Ok(Self {
            languages: languages.into_iter().map(Arc::new).collect(),
            default,
        })
    }

    pub fn all(&self) -> &[Arc<Language>] {
        &self.languages
    }

    pub fn default_language(&self) -> &Arc<Language> {
        &self.languages[self.default]
    }

    /// Every language except the default, in registration order.
    pub fn overlays(&self) -> impl Iterator<Item = &Arc<Language>> {
        self.languages
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != self.default)
            .map(|(_, language)| language)
    }

    pub fn find(&self, locale: &str) -> Option<&Arc<Language>> {
        self.languages.iter().find(|language| language.covers(locale))
    }

    /// The language covering `locale`, or the default one.
    pub fn resolve(&self, locale: Option<&str>) -> &Arc<Language> {
        locale
            .and_then(|locale| self.find(locale))
            .unwrap_or_else(|| self.default_language())
    }
}
