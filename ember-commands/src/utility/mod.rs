pub mod language;
pub mod ping;
pub mod text;
