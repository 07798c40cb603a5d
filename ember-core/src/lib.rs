/// Resolved gateway entities handed to command handlers.
pub mod entities;
/// Configuration and invocation error taxonomy.
pub mod error;
/// Schema annotated with merged localization data.
pub mod localized;
/// Positional lookup structures derived from compiled schemas.
pub mod option_map;
/// Declarative command and option descriptors.
pub mod schema;

pub use error::{ConfigError, ResolutionError};
pub use option_map::{OptionDescriptor, OptionMap};
pub use schema::{AccessRules, ChoiceValue, CommandKind, CommandSchema, OptionKind, OptionNode, OptionSchema};

pub type Error = anyhow::Error;
