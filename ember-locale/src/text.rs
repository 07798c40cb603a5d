use serde::Deserialize;

/// Text entries that can be matched against schema nodes.
///
/// An entry without an explicit `key` is matched by its `name`, which is the
/// usual case for the default language.
pub trait KeyedText {
    fn key(&self) -> &str;
    fn name(&self) -> &str;
}

/// Per-locale text of one command.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandText {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub options: Vec<OptionText>,
    #[serde(default)]
    pub subcommands: Vec<SubcommandText>,
    #[serde(default)]
    pub subcommand_groups: Vec<GroupText>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct OptionText {
    #[serde(default)]
    pub key: Option<String>,
    pub name: String,
    pub description: String,
    /// Ordered choice labels, aligned with the schema's choice values.
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct SubcommandText {
    #[serde(default)]
    pub key: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub options: Vec<OptionText>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct GroupText {
    #[serde(default)]
    pub key: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub subcommands: Vec<SubcommandText>,
}

macro_rules! keyed_text {
    ($($ty:ty),*) => {
        $(
            impl KeyedText for $ty {
                fn key(&self) -> &str {
                    self.key.as_deref().unwrap_or(&self.name)
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

keyed_text!(OptionText, SubcommandText, GroupText);

#[cfg(test)]
mod tests {
    use super::{CommandText, KeyedText};

    #[test]
    fn deserializes_nested_command_text() {
        let raw = r#"
name: owo
description: Manages owo reminders
subcommands:
  - name: list
    description: Lists reminders
  - key: enable
    name: aç
    description: Enables reminders
    options:
      - key: reminders
        name: hatırlatıcılar
        description: Reminders to enable
"#;
        let text: CommandText = serde_yaml::from_str(raw).unwrap();
        assert!(text.options.is_empty());
        assert_eq!(text.subcommands.len(), 2);
        assert_eq!(text.subcommands[0].key(), "list");
        assert_eq!(text.subcommands[1].key(), "enable");
        assert_eq!(text.subcommands[1].name(), "aç");
        assert_eq!(text.subcommands[1].options[0].key(), "reminders");
    }

    #[test]
    fn reads_camel_case_group_field() {
        let raw = r#"
name: settings
description: Settings
subcommandGroups:
  - name: config
    description: Configuration
    subcommands:
      - name: set
        description: Sets a value
"#;
        let text: CommandText = serde_yaml::from_str(raw).unwrap();
        assert_eq!(text.subcommand_groups.len(), 1);
        assert_eq!(text.subcommand_groups[0].subcommands[0].name, "set");
    }
}
