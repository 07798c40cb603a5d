pub mod access;
pub mod command;
pub mod dispatch;
pub mod event;
pub mod helper;
pub mod invocation;
pub mod parse;
pub mod register;
pub mod registry;
pub mod reply;
pub mod runners;

pub use access::{Access, AccessContext, Denial};
pub use command::{BoxFuture, Command, CommandContext, Handler};
pub use dispatch::{Dispatch, Framework};
pub use event::{Event, EventCategory, EventContext, EventHandler};
pub use helper::CommandHelper;
pub use invocation::{Arguments, Invocation, SlashArguments, SlashValue, Surface};
pub use registry::{CompiledCommand, Registry, RegistryState};
pub use reply::{Replied, Reply, Transport};
pub use runners::{CommandRunners, Runner};
