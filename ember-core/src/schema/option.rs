use std::fmt;

/// Value types a command option can carry.
///
/// `Member` has no dedicated gateway type; it is registered as a user option
/// and resolved against the guild member cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKind {
    String,
    Integer,
    Number,
    Boolean,
    User,
    Member,
    Role,
    Channel,
    Mentionable,
}

impl OptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::User => "user",
            Self::Member => "member",
            Self::Role => "role",
            Self::Channel => "channel",
            Self::Mentionable => "mentionable",
        }
    }

    /// Whether a value requested as `requested` may be read from an option
    /// declared as `self`.
    pub fn accepts(self, requested: OptionKind) -> bool {
        match (self, requested) {
            (declared, wanted) if declared == wanted => true,
            (Self::User | Self::Member, Self::User | Self::Member) => true,
            _ => false,
        }
    }

    /// Only string, integer and number options may declare choices.
    pub fn supports_choices(self) -> bool {
        matches!(self, Self::String | Self::Integer | Self::Number)
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed choice value. Its display label comes from locale text.
#[derive(Clone, Debug, PartialEq)]
pub enum ChoiceValue {
    String(String),
    Integer(i64),
    Number(f64),
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ChoiceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A single typed option. `key` is the stable identifier handlers use; the
/// display name is supplied by the default language.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionSchema {
    pub key: String,
    pub kind: OptionKind,
    pub required: bool,
    pub choices: Vec<ChoiceValue>,
    pub min_length: Option<u16>,
    pub max_length: Option<u16>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl OptionSchema {
    pub fn new(kind: OptionKind, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            required: false,
            choices: Vec::new(),
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
        }
    }

    pub fn string(key: impl Into<String>) -> Self {
        Self::new(OptionKind::String, key)
    }

    pub fn integer(key: impl Into<String>) -> Self {
        Self::new(OptionKind::Integer, key)
    }

    pub fn number(key: impl Into<String>) -> Self {
        Self::new(OptionKind::Number, key)
    }

    pub fn boolean(key: impl Into<String>) -> Self {
        Self::new(OptionKind::Boolean, key)
    }

    pub fn user(key: impl Into<String>) -> Self {
        Self::new(OptionKind::User, key)
    }

    pub fn member(key: impl Into<String>) -> Self {
        Self::new(OptionKind::Member, key)
    }

    pub fn role(key: impl Into<String>) -> Self {
        Self::new(OptionKind::Role, key)
    }

    pub fn channel(key: impl Into<String>) -> Self {
        Self::new(OptionKind::Channel, key)
    }

    pub fn mentionable(key: impl Into<String>) -> Self {
        Self::new(OptionKind::Mentionable, key)
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choice(mut self, value: impl Into<ChoiceValue>) -> Self {
        self.choices.push(value.into());
        self
    }

    pub fn min_length(mut self, length: u16) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: u16) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn min_value(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    pub fn max_value(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }
}

/// One entry of a command's declared option tree.
///
/// The tree is kept as declared so that shape errors (options mixed with
/// subcommands, non-subcommand children inside a group) surface at load
/// time with the offending path.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionNode {
    Value(OptionSchema),
    Subcommand {
        key: String,
        options: Vec<OptionNode>,
    },
    Group {
        key: String,
        children: Vec<OptionNode>,
    },
}

impl OptionNode {
    pub fn subcommand(key: impl Into<String>, options: impl IntoIterator<Item = OptionNode>) -> Self {
        Self::Subcommand {
            key: key.into(),
            options: options.into_iter().collect(),
        }
    }

    pub fn group(key: impl Into<String>, children: impl IntoIterator<Item = OptionNode>) -> Self {
        Self::Group {
            key: key.into(),
            children: children.into_iter().collect(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Value(option) => &option.key,
            Self::Subcommand { key, .. } | Self::Group { key, .. } => key,
        }
    }
}

impl From<OptionSchema> for OptionNode {
    fn from(option: OptionSchema) -> Self {
        Self::Value(option)
    }
}
