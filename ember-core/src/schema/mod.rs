mod command;
mod option;
pub mod tree;

pub use command::{AccessRules, CommandKind, CommandSchema};
pub use option::{ChoiceValue, OptionKind, OptionNode, OptionSchema};
pub use tree::{NodeTag, Partition, TreeNode};
