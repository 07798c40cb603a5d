use std::collections::BTreeMap;

use crate::schema::{ChoiceValue, NodeTag, OptionSchema, TreeNode};

/// Locale code to localized string.
pub type LocalizationMap = BTreeMap<String, String>;

/// Base strings from the default language plus overlays from the others.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalizedText {
    pub name: String,
    pub description: String,
    pub name_localizations: LocalizationMap,
    pub description_localizations: LocalizationMap,
}

impl LocalizedText {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Record overlay strings for every locale code. Base strings stay as they are.
    pub fn localize<'a>(&mut self, locales: impl IntoIterator<Item = &'a str>, name: &str, description: &str) {
        for locale in locales {
            self.name_localizations.insert(locale.to_owned(), name.to_owned());
            self.description_localizations
                .insert(locale.to_owned(), description.to_owned());
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocalizedChoice {
    pub name: String,
    pub name_localizations: LocalizationMap,
    pub value: ChoiceValue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocalizedOption {
    pub schema: OptionSchema,
    pub text: LocalizedText,
    pub choices: Vec<LocalizedChoice>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LocalizedNode {
    Value(LocalizedOption),
    Subcommand {
        key: String,
        text: LocalizedText,
        options: Vec<LocalizedNode>,
    },
    Group {
        key: String,
        text: LocalizedText,
        children: Vec<LocalizedNode>,
    },
}

impl LocalizedNode {
    pub fn text(&self) -> &LocalizedText {
        match self {
            Self::Value(option) => &option.text,
            Self::Subcommand { text, .. } | Self::Group { text, .. } => text,
        }
    }
}

impl TreeNode for LocalizedNode {
    fn key(&self) -> &str {
        match self {
            Self::Value(option) => &option.schema.key,
            Self::Subcommand { key, .. } | Self::Group { key, .. } => key,
        }
    }

    fn tag(&self) -> NodeTag {
        match self {
            Self::Value(_) => NodeTag::Option,
            Self::Subcommand { .. } => NodeTag::Subcommand,
            Self::Group { .. } => NodeTag::Group,
        }
    }

    fn children(&self) -> &[Self] {
        match self {
            Self::Value(_) => &[],
            Self::Subcommand { options, .. } => options,
            Self::Group { children, .. } => children,
        }
    }
}

/// A command schema with merged localization data, ready for publication.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalizedCommand {
    pub key: String,
    pub text: LocalizedText,
    pub nodes: Vec<LocalizedNode>,
}

impl LocalizedCommand {
    /// Localized command names, deduplicated, in locale order.
    pub fn localized_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.text.name_localizations.values() {
            if name != &self.text.name && !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}
