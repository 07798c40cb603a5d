pub mod reminders;
pub mod utility;

#[cfg(test)]
mod testing;

use ember_core::ConfigError;
use ember_framework::Command;
use ember_locale::Language;

const LANGUAGE_FILES: &[(&str, &str)] = &[
    ("languages/en.yml", include_str!("../languages/en.yml")),
    ("languages/tr.yml", include_str!("../languages/tr.yml")),
];

pub fn commands() -> Vec<Command> {
    vec![
        utility::ping::ping(),
        utility::text::text(),
        utility::language::language(),
        reminders::owo::owo(),
    ]
}

/// The bundled languages, parsed from the embedded YAML files.
pub fn languages() -> Result<Vec<Language>, ConfigError> {
    LANGUAGE_FILES
        .iter()
        .map(|(source, raw)| Language::from_yaml(*source, raw))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{commands, languages};
    use ember_framework::RegistryState;

    #[test]
    fn bundled_commands_compile_against_bundled_languages() {
        let state = RegistryState::build(commands(), Vec::new(), languages().unwrap(), "en-US").unwrap();
        assert_eq!(state.commands().len(), 4);

        for (name, key) in [("gecikme", "ping"), ("yazı", "text"), ("dil", "language"), ("owo", "owo")] {
            assert_eq!(state.command(name).map(|command| command.key()), Some(key));
        }
    }

    #[test]
    fn english_is_listed_first_under_en_gb() {
        let languages = languages().unwrap();
        assert_eq!(languages[0].display_locale(), "en-GB");
        assert!(languages[0].covers("en-US"));
        assert_eq!(languages[1].display_locale(), "tr");
    }
}
