use tracing::debug;

use ember_core::ConfigError;
use ember_core::localized::{LocalizedChoice, LocalizedCommand, LocalizedNode, LocalizedOption, LocalizedText};
use ember_core::schema::tree::{self, Partition, TreeNode, child_path};
use ember_core::schema::{CommandSchema, NodeTag, OptionNode};

use crate::language::LanguageSet;
use crate::text::{CommandText, GroupText, KeyedText, OptionText, SubcommandText};

/// Merge the default language's text and every overlay onto `schema`.
///
/// The default language supplies base names, descriptions and choice labels;
/// every other language adds `{locale: text}` entries for each locale code it
/// covers. Overlay entries are matched to schema nodes by key, and every
/// level must carry exactly as many entries as the schema declares.
pub fn compile_command(schema: &CommandSchema, languages: &LanguageSet) -> Result<LocalizedCommand, ConfigError> {
    let default = languages.default_language();
    let scope = Scope {
        command: &schema.key,
        locale: default.display_locale(),
    };

    let text = default
        .command_text(&schema.key)
        .ok_or_else(|| ConfigError::MissingCommandText {
            command: schema.key.clone(),
            locale: scope.locale.to_owned(),
        })?;

    let mut command = LocalizedCommand {
        key: schema.key.clone(),
        text: LocalizedText::new(&text.name, &text.description),
        nodes: base_tree(&scope, &schema.nodes, text)?,
    };

    for overlay in languages.overlays() {
        let Some(text) = overlay.command_text(&schema.key) else {
            debug!(
                command = %schema.key,
                language = %overlay.source(),
                "no command text in overlay language"
            );
            continue;
        };

        let scope = Scope {
            command: &schema.key,
            locale: overlay.display_locale(),
        };
        let locales: Vec<&str> = overlay.languages.iter().map(String::as_str).collect();
        overlay_command(&scope, &locales, &mut command, text)?;
    }

    Ok(command)
}

struct Scope<'a> {
    command: &'a str,
    locale: &'a str,
}

impl Scope<'_> {
    fn count(&self, path: &str, what: &'static str, expected: usize, found: usize) -> Result<(), ConfigError> {
        if expected == found {
            return Ok(());
        }

        Err(ConfigError::CountMismatch {
            command: self.command.to_owned(),
            locale: self.locale.to_owned(),
            path: path.to_owned(),
            what,
            expected,
            found,
        })
    }

    /// Align `texts` with `keys`, in `keys` order.
    fn match_texts<'t, T: KeyedText>(
        &self,
        path: &str,
        what: &'static str,
        keys: &[&str],
        texts: &'t [T],
    ) -> Result<Vec<&'t T>, ConfigError> {
        self.count(path, what, keys.len(), texts.len())?;

        for (index, text) in texts.iter().enumerate() {
            if texts[..index].iter().any(|earlier| earlier.key() == text.key()) {
                return Err(ConfigError::DuplicateTextKey {
                    command: self.command.to_owned(),
                    locale: self.locale.to_owned(),
                    path: path.to_owned(),
                    key: text.key().to_owned(),
                });
            }

            if !keys.contains(&text.key()) {
                return Err(self.unknown(path, what, text.key()));
            }
        }

        keys.iter()
            .map(|key| {
                texts
                    .iter()
                    .find(|text| text.key() == *key)
                    .ok_or_else(|| self.unknown(path, what, key))
            })
            .collect()
    }

    fn unknown(&self, path: &str, what: &'static str, key: &str) -> ConfigError {
        ConfigError::UnknownTextKey {
            command: self.command.to_owned(),
            locale: self.locale.to_owned(),
            path: path.to_owned(),
            what,
            key: key.to_owned(),
        }
    }
}

fn keys_of<'a, N: TreeNode>(nodes: impl IntoIterator<Item = &'a N>) -> Vec<&'a str>
where
    N: 'a,
{
    nodes.into_iter().map(TreeNode::key).collect()
}

fn base_tree(scope: &Scope<'_>, nodes: &[OptionNode], text: &CommandText) -> Result<Vec<LocalizedNode>, ConfigError> {
    let path = scope.command;

    match tree::partition(scope.command, nodes)? {
        Partition::Options(options) => {
            scope.count(path, "subcommands", 0, text.subcommands.len())?;
            scope.count(path, "subcommand groups", 0, text.subcommand_groups.len())?;
            base_options(scope, path, &options, &text.options)
        }
        Partition::Nested {
            groups,
            subcommands,
        } => {
            scope.count(path, "options", 0, text.options.len())?;

            let subcommand_texts = scope.match_texts(
                path,
                "subcommands",
                &keys_of(subcommands.iter().copied()),
                &text.subcommands,
            )?;
            let group_texts = scope.match_texts(
                path,
                "subcommand groups",
                &keys_of(groups.iter().copied()),
                &text.subcommand_groups,
            )?;

            let mut subcommand_texts = subcommand_texts.into_iter();
            let mut group_texts = group_texts.into_iter();
            let mut compiled = Vec::with_capacity(nodes.len());

            for node in nodes {
                match node.tag() {
                    NodeTag::Subcommand => {
                        if let Some(text) = subcommand_texts.next() {
                            compiled.push(base_subcommand(scope, path, node, text)?);
                        }
                    }
                    NodeTag::Group => {
                        if let Some(text) = group_texts.next() {
                            compiled.push(base_group(scope, path, node, text)?);
                        }
                    }
                    NodeTag::Option => {}
                }
            }

            Ok(compiled)
        }
    }
}

fn base_group(
    scope: &Scope<'_>,
    parent: &str,
    group: &OptionNode,
    text: &GroupText,
) -> Result<LocalizedNode, ConfigError> {
    let path = child_path(parent, group.key());
    let subcommands = tree::group_subcommands(scope.command, &path, group)?;
    let texts = scope.match_texts(
        &path,
        "subcommands",
        &keys_of(subcommands.iter().copied()),
        &text.subcommands,
    )?;

    let children = subcommands
        .into_iter()
        .zip(texts)
        .map(|(subcommand, text)| base_subcommand(scope, &path, subcommand, text))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LocalizedNode::Group {
        key: group.key().to_owned(),
        text: LocalizedText::new(&text.name, &text.description),
        children,
    })
}

fn base_subcommand(
    scope: &Scope<'_>,
    parent: &str,
    subcommand: &OptionNode,
    text: &SubcommandText,
) -> Result<LocalizedNode, ConfigError> {
    let path = child_path(parent, subcommand.key());
    let options = tree::subcommand_options(scope.command, &path, subcommand)?;

    Ok(LocalizedNode::Subcommand {
        key: subcommand.key().to_owned(),
        text: LocalizedText::new(&text.name, &text.description),
        options: base_options(scope, &path, &options, &text.options)?,
    })
}

fn base_options(
    scope: &Scope<'_>,
    path: &str,
    options: &[&OptionNode],
    texts: &[OptionText],
) -> Result<Vec<LocalizedNode>, ConfigError> {
    let texts = scope.match_texts(path, "options", &keys_of(options.iter().copied()), texts)?;

    options
        .iter()
        .zip(texts)
        .filter_map(|(node, text)| match node {
            OptionNode::Value(schema) => Some((schema, text)),
            OptionNode::Subcommand { .. } | OptionNode::Group { .. } => None,
        })
        .map(|(schema, text)| {
            if !schema.choices.is_empty() && !schema.kind.supports_choices() {
                return Err(ConfigError::ChoicesNotSupported {
                    command: scope.command.to_owned(),
                    key: schema.key.clone(),
                    kind: schema.kind,
                });
            }

            let option_path = child_path(path, &schema.key);
            scope.count(&option_path, "choices", schema.choices.len(), text.choices.len())?;

            let choices = schema
                .choices
                .iter()
                .zip(&text.choices)
                .map(|(value, label)| LocalizedChoice {
                    name: label.clone(),
                    name_localizations: Default::default(),
                    value: value.clone(),
                })
                .collect();

            Ok(LocalizedNode::Value(LocalizedOption {
                schema: schema.clone(),
                text: LocalizedText::new(&text.name, &text.description),
                choices,
            }))
        })
        .collect()
}

fn overlay_command(
    scope: &Scope<'_>,
    locales: &[&str],
    command: &mut LocalizedCommand,
    text: &CommandText,
) -> Result<(), ConfigError> {
    let path = scope.command;
    command
        .text
        .localize(locales.iter().copied(), &text.name, &text.description);

    let nodes = &mut command.nodes;
    let nested = nodes.iter().any(|node| node.tag() != NodeTag::Option);

    if !nested {
        scope.count(path, "subcommands", 0, text.subcommands.len())?;
        scope.count(path, "subcommand groups", 0, text.subcommand_groups.len())?;
        return overlay_options(scope, locales, path, nodes, &text.options);
    }

    scope.count(path, "options", 0, text.options.len())?;

    let subcommand_texts = scope.match_texts(
        path,
        "subcommands",
        &keys_of(nodes.iter().filter(|node| node.tag() == NodeTag::Subcommand)),
        &text.subcommands,
    )?;
    let group_texts = scope.match_texts(
        path,
        "subcommand groups",
        &keys_of(nodes.iter().filter(|node| node.tag() == NodeTag::Group)),
        &text.subcommand_groups,
    )?;

    let mut subcommand_texts = subcommand_texts.into_iter();
    let mut group_texts = group_texts.into_iter();

    for node in nodes.iter_mut() {
        match node.tag() {
            NodeTag::Subcommand => {
                if let Some(text) = subcommand_texts.next() {
                    overlay_subcommand(scope, locales, path, node, text)?;
                }
            }
            NodeTag::Group => {
                if let Some(text) = group_texts.next() {
                    overlay_group(scope, locales, path, node, text)?;
                }
            }
            NodeTag::Option => {}
        }
    }

    Ok(())
}

fn overlay_group(
    scope: &Scope<'_>,
    locales: &[&str],
    parent: &str,
    node: &mut LocalizedNode,
    text: &GroupText,
) -> Result<(), ConfigError> {
    let LocalizedNode::Group {
        key,
        text: localized,
        children,
    } = node
    else {
        return Ok(());
    };

    let path = child_path(parent, key);
    localized.localize(locales.iter().copied(), &text.name, &text.description);

    let texts = scope.match_texts(&path, "subcommands", &keys_of(children.iter()), &text.subcommands)?;
    for (child, text) in children.iter_mut().zip(texts) {
        overlay_subcommand(scope, locales, &path, child, text)?;
    }

    Ok(())
}

fn overlay_subcommand(
    scope: &Scope<'_>,
    locales: &[&str],
    parent: &str,
    node: &mut LocalizedNode,
    text: &SubcommandText,
) -> Result<(), ConfigError> {
    let LocalizedNode::Subcommand {
        key,
        text: localized,
        options,
    } = node
    else {
        return Ok(());
    };

    let path = child_path(parent, key);
    localized.localize(locales.iter().copied(), &text.name, &text.description);
    overlay_options(scope, locales, &path, options, &text.options)
}

fn overlay_options(
    scope: &Scope<'_>,
    locales: &[&str],
    path: &str,
    nodes: &mut [LocalizedNode],
    texts: &[OptionText],
) -> Result<(), ConfigError> {
    let texts = scope.match_texts(path, "options", &keys_of(nodes.iter()), texts)?;

    for (node, text) in nodes.iter_mut().zip(texts) {
        let LocalizedNode::Value(option) = node else {
            continue;
        };

        let option_path = child_path(path, &option.schema.key);
        scope.count(&option_path, "choices", option.choices.len(), text.choices.len())?;

        option
            .text
            .localize(locales.iter().copied(), &text.name, &text.description);
        for (choice, label) in option.choices.iter_mut().zip(&text.choices) {
            for locale in locales {
                choice.name_localizations.insert((*locale).to_owned(), label.clone());
            }
        }
    }

    Ok(())
}
