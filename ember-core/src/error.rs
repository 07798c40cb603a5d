use crate::schema::OptionKind;

/// Load and registration time failures. Any of these aborts the whole
/// registration batch; the previously published registry keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("command `{command}` mixes plain options with subcommands at `{path}`")]
    MixedOptionTree { command: String, path: String },

    #[error("command `{command}`: {found} `{key}` is not allowed inside `{path}`")]
    MisplacedNode {
        command: String,
        path: String,
        key: String,
        found: &'static str,
    },

    #[error("command `{command}`: duplicate key `{key}` inside `{path}`")]
    DuplicateKey {
        command: String,
        path: String,
        key: String,
    },

    #[error("command `{command}`: option `{key}` of type {kind} cannot declare choices")]
    ChoicesNotSupported {
        command: String,
        key: String,
        kind: OptionKind,
    },

    #[error(
        "command `{command}`: `{path}` declares {expected} {what} but locale `{locale}` provides {found}"
    )]
    CountMismatch {
        command: String,
        locale: String,
        path: String,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("command `{command}`: locale `{locale}` has text for unknown {what} `{key}` in `{path}`")]
    UnknownTextKey {
        command: String,
        locale: String,
        path: String,
        what: &'static str,
        key: String,
    },

    #[error("command `{command}`: locale `{locale}` repeats text for `{key}` in `{path}`")]
    DuplicateTextKey {
        command: String,
        locale: String,
        path: String,
        key: String,
    },

    #[error("empty command text data on command `{command}` for default locale `{locale}`")]
    MissingCommandText { command: String, locale: String },

    #[error("same command name or aliases found in ({})", commands.join(", "))]
    NameConflict { commands: Vec<String> },

    #[error("some commands include a command name in their aliases ({})", commands.join(", "))]
    AliasConflict { commands: Vec<String> },

    #[error("some commands use allowed and excluded guilds together ({})", commands.join(", "))]
    GuildListConflict { commands: Vec<String> },

    #[error("duplicate language configurations ({}) found", sources.join(", "))]
    DuplicateLanguage { sources: Vec<String> },

    #[error("default language `{locale}` not found")]
    DefaultLanguageNotFound { locale: String },

    #[error("language `{source_name}` could not be parsed: {message}")]
    InvalidLanguage { source_name: String, message: String },
}

/// Failures while resolving options for one invocation. These indicate a
/// schema defect rather than bad user input.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("command ({command}) requires {kind} option `{option}`")]
    MissingRequiredOption {
        command: String,
        option: String,
        kind: OptionKind,
    },

    #[error("command ({command}) does not have a proper option mapping for `{option}`")]
    UnmappedOption { command: String, option: String },

    #[error("command ({command}) declares option `{option}` as {declared}, requested as {requested}")]
    KindMismatch {
        command: String,
        option: String,
        declared: OptionKind,
        requested: OptionKind,
    },
}
