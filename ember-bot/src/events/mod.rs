mod message_commands;
mod ready;
mod slash_commands;

use std::sync::Arc;

use ember_framework::{Event, EventCategory};

pub fn events() -> Vec<Arc<Event>> {
    vec![
        Arc::new(Event::new(EventCategory::Ready, ready::run).once()),
        Arc::new(Event::new(EventCategory::InteractionCreate, slash_commands::run)),
        Arc::new(Event::new(EventCategory::MessageCreate, message_commands::run)),
    ]
}

#[cfg(test)]
mod tests {
    use super::events;
    use ember_framework::EventCategory;

    #[test]
    fn only_ready_runs_once() {
        let events = events();
        let categories: Vec<_> = events.iter().map(|event| (event.category, event.once)).collect();
        assert_eq!(
            categories,
            [
                (EventCategory::Ready, true),
                (EventCategory::InteractionCreate, false),
                (EventCategory::MessageCreate, false),
            ]
        );
        assert!(events.iter().all(|event| event.is_enabled()));
    }
}
