/// Projection of locale text onto command schemas.
pub mod compiler;
/// Language descriptors and the validated language set.
pub mod language;
/// `{0}`-style placeholder replacement for language texts.
pub mod replace;
/// Per-locale command text entries.
pub mod text;

pub use compiler::compile_command;
pub use language::{Language, LanguageSet};
pub use text::CommandText;
