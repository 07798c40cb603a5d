use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serenity::all::{Context, FullEvent};

use ember_core::Error;

use crate::command::BoxFuture;
use crate::dispatch::Framework;

/// Gateway event categories event handlers can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventCategory {
    Ready,
    InteractionCreate,
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    GuildCreate,
    GuildMemberAdd,
    GuildMemberRemove,
}

impl EventCategory {
    pub fn of(event: &FullEvent) -> Option<Self> {
        let category = match event {
            FullEvent::Ready { .. } => Self::Ready,
            FullEvent::InteractionCreate { .. } => Self::InteractionCreate,
            FullEvent::Message { .. } => Self::MessageCreate,
            FullEvent::MessageUpdate { .. } => Self::MessageUpdate,
            FullEvent::MessageDelete { .. } => Self::MessageDelete,
            FullEvent::GuildCreate { .. } => Self::GuildCreate,
            FullEvent::GuildMemberAddition { .. } => Self::GuildMemberAdd,
            FullEvent::GuildMemberRemoval { .. } => Self::GuildMemberRemove,
            _ => return None,
        };
        Some(category)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::InteractionCreate => "interactionCreate",
            Self::MessageCreate => "messageCreate",
            Self::MessageUpdate => "messageUpdate",
            Self::MessageDelete => "messageDelete",
            Self::GuildCreate => "guildCreate",
            Self::GuildMemberAdd => "guildMemberAdd",
            Self::GuildMemberRemove => "guildMemberRemove",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type EventHandler = for<'a> fn(EventContext<'a>) -> BoxFuture<'a, Result<(), Error>>;

#[derive(Clone, Copy)]
pub struct EventContext<'a> {
    pub framework: &'a Framework,
    pub serenity: &'a Context,
    pub event: &'a FullEvent,
}

/// A subscription to one event category.
///
/// A `once` event disables itself the first time it is claimed.
#[derive(Debug)]
pub struct Event {
    pub category: EventCategory,
    pub once: bool,
    enabled: AtomicBool,
    pub handler: EventHandler,
}

impl Event {
    pub fn new(category: EventCategory, handler: EventHandler) -> Self {
        Self {
            category,
            once: false,
            enabled: AtomicBool::new(true),
            handler,
        }
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn disabled(self) -> Self {
        self.set_enabled(false);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Whether this occurrence should run the handler. Concurrent claims of
    /// a `once` event succeed for exactly one caller.
    pub fn claim(&self) -> bool {
        if self.once {
            return self
                .enabled
                .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
                .is_ok();
        }
        self.is_enabled()
    }
}
