use std::collections::{BTreeMap, HashSet};

use crate::error::ConfigError;
use crate::localized::{LocalizedCommand, LocalizedNode};
use crate::schema::tree::{self, Partition, TreeNode, child_path};
use crate::schema::OptionKind;

/// One positional slot. `name` is the published base name, `key` the
/// identifier handlers ask for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub key: String,
    pub name: String,
    pub kind: OptionKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubcommandOptions {
    pub key: String,
    pub options: Vec<OptionDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupOptions {
    pub key: String,
    pub subcommands: BTreeMap<String, SubcommandOptions>,
}

/// Positional lookup derived from a compiled command.
///
/// Exactly one shape is populated. Maps are keyed by base names, which is
/// what both invocation surfaces carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionMap {
    Options(Vec<OptionDescriptor>),
    Subcommands(BTreeMap<String, SubcommandOptions>),
    Groups {
        groups: BTreeMap<String, GroupOptions>,
        subcommands: BTreeMap<String, SubcommandOptions>,
    },
}

/// The option list an invocation addresses, with the number of leading
/// tokens consumed by subcommand and group names.
#[derive(Clone, Copy, Debug)]
pub struct Container<'a> {
    pub group: Option<&'a GroupOptions>,
    pub subcommand: Option<&'a SubcommandOptions>,
    pub options: &'a [OptionDescriptor],
    pub offset: usize,
}

impl Container<'_> {
    pub fn position(&self, key: &str) -> Option<usize> {
        self.options.iter().position(|option| option.key == key)
    }
}

impl OptionMap {
    pub fn build(command: &LocalizedCommand) -> Result<Self, ConfigError> {
        let name = command.key.as_str();

        match tree::partition(name, &command.nodes)? {
            Partition::Options(options) => Ok(Self::Options(describe_options(name, name, options)?)),
            Partition::Nested {
                groups,
                subcommands,
            } => {
                let mut subcommand_map = BTreeMap::new();
                for subcommand in subcommands {
                    let entry = build_subcommand(name, name, subcommand)?;
                    insert_unique(name, name, &mut subcommand_map, subcommand_name(subcommand), entry)?;
                }

                if groups.is_empty() {
                    return Ok(Self::Subcommands(subcommand_map));
                }

                let mut group_map = BTreeMap::new();
                for group in groups {
                    let group_path = child_path(name, group.key());
                    let mut nested = BTreeMap::new();
                    for subcommand in tree::group_subcommands(name, &group_path, group)? {
                        let entry = build_subcommand(name, &group_path, subcommand)?;
                        insert_unique(name, &group_path, &mut nested, subcommand_name(subcommand), entry)?;
                    }

                    let group_name = subcommand_name(group);
                    if subcommand_map.contains_key(&group_name) {
                        return Err(duplicate(name, name, &group_name));
                    }
                    insert_unique(
                        name,
                        name,
                        &mut group_map,
                        group_name,
                        GroupOptions {
                            key: group.key().to_owned(),
                            subcommands: nested,
                        },
                    )?;
                }

                Ok(Self::Groups {
                    groups: group_map,
                    subcommands: subcommand_map,
                })
            }
        }
    }

    /// Resolve the addressed option list from free-text tokens (the tokens
    /// after the command name). `None` when no subcommand token matches.
    pub fn container_for_tokens<'a>(&'a self, tokens: &[String]) -> Option<Container<'a>> {
        let first = tokens.first().map(String::as_str);
        let second = tokens.get(1).map(String::as_str);

        match self {
            Self::Options(options) => Some(Container {
                group: None,
                subcommand: None,
                options,
                offset: 0,
            }),
            Self::Subcommands(subcommands) => {
                let subcommand = subcommands.get(first?)?;
                Some(subcommand_container(None, subcommand, 1))
            }
            Self::Groups {
                groups,
                subcommands,
            } => {
                let first = first?;
                if let Some(subcommand) = subcommands.get(first) {
                    return Some(subcommand_container(None, subcommand, 1));
                }

                let group = groups.get(first)?;
                let subcommand = group.subcommands.get(second?)?;
                Some(subcommand_container(Some(group), subcommand, 2))
            }
        }
    }

    /// Resolve the addressed option list from the names a structured
    /// interaction carries.
    pub fn container_for_names<'a>(&'a self, group: Option<&str>, subcommand: Option<&str>) -> Option<Container<'a>> {
        match (self, group, subcommand) {
            (Self::Options(options), None, None) => Some(Container {
                group: None,
                subcommand: None,
                options,
                offset: 0,
            }),
            (Self::Subcommands(subcommands), None, Some(name))
            | (Self::Groups { subcommands, .. }, None, Some(name)) => {
                subcommands.get(name).map(|entry| subcommand_container(None, entry, 1))
            }
            (Self::Groups { groups, .. }, Some(group_name), Some(name)) => {
                let group = groups.get(group_name)?;
                let entry = group.subcommands.get(name)?;
                Some(subcommand_container(Some(group), entry, 2))
            }
            _ => None,
        }
    }
}

fn subcommand_container<'a>(
    group: Option<&'a GroupOptions>,
    subcommand: &'a SubcommandOptions,
    offset: usize,
) -> Container<'a> {
    Container {
        group,
        subcommand: Some(subcommand),
        options: &subcommand.options,
        offset,
    }
}

fn build_subcommand(command: &str, parent: &str, subcommand: &LocalizedNode) -> Result<SubcommandOptions, ConfigError> {
    let path = child_path(parent, subcommand.key());
    let options = tree::subcommand_options(command, &path, subcommand)?;

    Ok(SubcommandOptions {
        key: subcommand.key().to_owned(),
        options: describe_options(command, &path, options)?,
    })
}

/// Option names must be unique within one list, both surfaces look them up
/// by name.
fn describe_options(
    command: &str,
    path: &str,
    options: Vec<&LocalizedNode>,
) -> Result<Vec<OptionDescriptor>, ConfigError> {
    let descriptors: Vec<OptionDescriptor> = options
        .into_iter()
        .filter_map(|node| match node {
            LocalizedNode::Value(option) => Some(OptionDescriptor {
                key: option.schema.key.clone(),
                name: option.text.name.clone(),
                kind: option.schema.kind,
            }),
            LocalizedNode::Subcommand { .. } | LocalizedNode::Group { .. } => None,
        })
        .collect();

    let mut names = HashSet::new();
    for descriptor in &descriptors {
        if !names.insert(descriptor.name.as_str()) {
            return Err(duplicate(command, path, &descriptor.name));
        }
    }

    Ok(descriptors)
}

fn subcommand_name(node: &LocalizedNode) -> String {
    node.text().name.clone()
}

fn insert_unique<V>(
    command: &str,
    path: &str,
    map: &mut BTreeMap<String, V>,
    name: String,
    value: V,
) -> Result<(), ConfigError> {
    if map.contains_key(&name) {
        return Err(duplicate(command, path, &name));
    }
    map.insert(name, value);
    Ok(())
}

fn duplicate(command: &str, path: &str, name: &str) -> ConfigError {
    ConfigError::DuplicateKey {
        command: command.to_owned(),
        path: path.to_owned(),
        key: name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::OptionMap;
    use crate::error::ConfigError;
    use crate::localized::{LocalizedCommand, LocalizedNode, LocalizedOption, LocalizedText};
    use crate::schema::{OptionKind, OptionSchema};

    fn option(key: &str, kind: OptionKind) -> LocalizedNode {
        LocalizedNode::Value(LocalizedOption {
            schema: OptionSchema::new(kind, key),
            text: LocalizedText::new(key, key),
            choices: Vec::new(),
        })
    }

    fn subcommand(key: &str, options: Vec<LocalizedNode>) -> LocalizedNode {
        LocalizedNode::Subcommand {
            key: key.to_owned(),
            text: LocalizedText::new(key, key),
            options,
        }
    }

    fn group(key: &str, children: Vec<LocalizedNode>) -> LocalizedNode {
        LocalizedNode::Group {
            key: key.to_owned(),
            text: LocalizedText::new(key, key),
            children,
        }
    }

    fn command(nodes: Vec<LocalizedNode>) -> LocalizedCommand {
        LocalizedCommand {
            key: "test".to_owned(),
            text: LocalizedText::new("test", "test"),
            nodes,
        }
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|token| (*token).to_owned()).collect()
    }

    #[test]
    fn flat_options_keep_declaration_order() {
        let map = OptionMap::build(&command(vec![
            option("a", OptionKind::String),
            option("b", OptionKind::Integer),
            option("c", OptionKind::Boolean),
        ]))
        .unwrap();

        let OptionMap::Options(options) = &map else {
            panic!("expected a flat option list, got {map:?}");
        };
        let keys: Vec<&str> = options.iter().map(|option| option.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(options[1].kind, OptionKind::Integer);
    }

    #[test]
    fn subcommands_without_groups_build_a_subcommand_map() {
        let map = OptionMap::build(&command(vec![
            subcommand("list", vec![]),
            subcommand("enable", vec![option("reminders", OptionKind::String)]),
        ]))
        .unwrap();

        let OptionMap::Subcommands(subcommands) = &map else {
            panic!("expected a subcommand map, got {map:?}");
        };
        assert_eq!(subcommands.len(), 2);
        assert_eq!(subcommands["enable"].options[0].key, "reminders");
        assert!(subcommands["list"].options.is_empty());
    }

    #[test]
    fn groups_build_a_two_level_map() {
        let map = OptionMap::build(&command(vec![
            group("config", vec![subcommand("set", vec![option("value", OptionKind::String)])]),
            subcommand("show", vec![]),
        ]))
        .unwrap();

        let OptionMap::Groups { groups, subcommands } = &map else {
            panic!("expected a group map, got {map:?}");
        };
        assert_eq!(groups["config"].subcommands["set"].options[0].key, "value");
        assert!(subcommands.contains_key("show"));
    }

    #[test]
    fn malformed_group_fails_at_build_time() {
        let err = OptionMap::build(&command(vec![group(
            "config",
            vec![option("value", OptionKind::String)],
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MisplacedNode { .. }));
    }

    #[test]
    fn duplicate_option_names_fail_at_build_time() {
        let renamed = |key: &str| {
            LocalizedNode::Value(LocalizedOption {
                schema: OptionSchema::new(OptionKind::String, key),
                text: LocalizedText::new("target", "target"),
                choices: Vec::new(),
            })
        };

        let err = OptionMap::build(&command(vec![renamed("user"), renamed("role")])).unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::DuplicateKey { path, key, .. } if path == "test" && key == "target"
        ));

        let err = OptionMap::build(&command(vec![subcommand("grant", vec![renamed("user"), renamed("role")])]))
            .unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::DuplicateKey { path, key, .. } if path == "test grant" && key == "target"
        ));
    }

    #[test]
    fn tokens_select_group_then_subcommand() {
        let map = OptionMap::build(&command(vec![
            group("config", vec![subcommand("set", vec![option("value", OptionKind::String)])]),
            subcommand("show", vec![]),
        ]))
        .unwrap();

        let container = map.container_for_tokens(&tokens(&["config", "set", "x"])).unwrap();
        assert_eq!(container.offset, 2);
        assert_eq!(container.group.map(|group| group.key.as_str()), Some("config"));
        assert_eq!(container.subcommand.map(|sub| sub.key.as_str()), Some("set"));

        let container = map.container_for_tokens(&tokens(&["show"])).unwrap();
        assert_eq!(container.offset, 1);
        assert!(container.group.is_none());

        assert!(map.container_for_tokens(&tokens(&["config"])).is_none());
        assert!(map.container_for_tokens(&tokens(&["unknown"])).is_none());
        assert!(map.container_for_tokens(&[]).is_none());
    }

    #[test]
    fn names_select_containers_for_structured_interactions() {
        let map = OptionMap::build(&command(vec![
            subcommand("list", vec![]),
            subcommand("enable", vec![option("reminders", OptionKind::String)]),
        ]))
        .unwrap();

        let container = map.container_for_names(None, Some("enable")).unwrap();
        assert_eq!(container.position("reminders"), Some(0));
        assert!(map.container_for_names(None, None).is_none());
        assert!(map.container_for_names(Some("enable"), Some("list")).is_none());
    }
}
