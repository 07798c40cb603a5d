use std::collections::HashSet;

use crate::error::ConfigError;

use super::option::OptionNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeTag {
    Option,
    Subcommand,
    Group,
}

impl NodeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Option => "option",
            Self::Subcommand => "subcommand",
            Self::Group => "subcommand group",
        }
    }
}

/// Common view over declared and compiled option trees.
pub trait TreeNode: Sized {
    fn key(&self) -> &str;
    fn tag(&self) -> NodeTag;
    fn children(&self) -> &[Self];
}

impl TreeNode for OptionNode {
    fn key(&self) -> &str {
        OptionNode::key(self)
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

/// Top-level shape of a command's option tree.
#[derive(Debug)]
pub enum Partition<'a, N> {
    Options(Vec<&'a N>),
    Nested {
        groups: Vec<&'a N>,
        subcommands: Vec<&'a N>,
    },
}

/// Split top-level nodes into plain options, groups and subcommands.
///
/// Plain options exclude subcommands and groups. A tree with no nodes at all
/// is an empty option list.
pub fn partition<'a, N: TreeNode>(command: &str, nodes: &'a [N]) -> Result<Partition<'a, N>, ConfigError> {
    ensure_unique_keys(command, command, nodes)?;

    let mut options = Vec::new();
    let mut groups = Vec::new();
    let mut subcommands = Vec::new();

    for node in nodes {
        match node.tag() {
            NodeTag::Option => options.push(node),
            NodeTag::Group => groups.push(node),
            NodeTag::Subcommand => subcommands.push(node),
        }
    }

    if options.is_empty() {
        if groups.is_empty() && subcommands.is_empty() {
            return Ok(Partition::Options(Vec::new()));
        }
        return Ok(Partition::Nested { groups, subcommands });
    }

    if !groups.is_empty() || !subcommands.is_empty() {
        return Err(ConfigError::MixedOptionTree {
            command: command.to_owned(),
            path: command.to_owned(),
        });
    }

    Ok(Partition::Options(options))
}

/// Children of a group; each must be a subcommand.
pub fn group_subcommands<'a, N: TreeNode>(command: &str, path: &str, group: &'a N) -> Result<Vec<&'a N>, ConfigError> {
    children_of(command, path, group, NodeTag::Subcommand)
}

/// Children of a subcommand; each must be a plain option.
pub fn subcommand_options<'a, N: TreeNode>(
    command: &str,
    path: &str,
    subcommand: &'a N,
) -> Result<Vec<&'a N>, ConfigError> {
    children_of(command, path, subcommand, NodeTag::Option)
}

pub fn child_path(parent: &str, key: &str) -> String {
    format!("{parent} {key}")
}

fn children_of<'a, N: TreeNode>(
    command: &str,
    path: &str,
    parent: &'a N,
    expected: NodeTag,
) -> Result<Vec<&'a N>, ConfigError> {
    let children = parent.children();
    ensure_unique_keys(command, path, children)?;

    children
        .iter()
        .map(|child| {
            if child.tag() == expected {
                Ok(child)
            } else {
                Err(ConfigError::MisplacedNode {
                    command: command.to_owned(),
                    path: path.to_owned(),
                    key: child.key().to_owned(),
                    found: child.tag().as_str(),
                })
            }
        })
        .collect()
}

fn ensure_unique_keys<N: TreeNode>(command: &str, path: &str, nodes: &[N]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.key()) {
            return Err(ConfigError::DuplicateKey {
                command: command.to_owned(),
                path: path.to_owned(),
                key: node.key().to_owned(),
            });
        }
    }
    Ok(())
}
