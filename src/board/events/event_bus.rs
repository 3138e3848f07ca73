//! # Event Bus
//!
//! Carries board events (clicks and submits) from the controls to the
//! controller's queue, and view events (redraws and notices) from the feed
//! out to whatever presents it. Handlers run synchronously in subscription
//! order.

use super::board_events::BoardEvent;
use super::view_events::ViewEvent;

/// Receives like, thread and submit requests
pub type BoardEventHandler = Box<dyn Fn(&BoardEvent) + Send + Sync>;

/// Receives redraw requests and notices
pub type ViewEventHandler = Box<dyn Fn(&ViewEvent) + Send + Sync>;

/// Two-way channel between board controls and the presentation layer
pub trait EventBus: Send + Sync {
    /// Hand a user action to every board subscriber
    fn publish_board_event(&mut self, event: BoardEvent);

    /// Tell every presenter what changed
    fn publish_view_event(&mut self, event: ViewEvent);

    fn subscribe_to_board_events(&mut self, handler: BoardEventHandler);

    fn subscribe_to_view_events(&mut self, handler: ViewEventHandler);
}

/// Bus that calls its handlers inline on the publishing thread
pub struct SimpleEventBus {
    board_handlers: Vec<BoardEventHandler>,
    view_handlers: Vec<ViewEventHandler>,
}

impl SimpleEventBus {
    pub fn new() -> Self {
        Self {
            board_handlers: Vec::new(),
            view_handlers: Vec::new(),
        }
    }
}

impl Default for SimpleEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for SimpleEventBus {
    fn publish_board_event(&mut self, event: BoardEvent) {
        for handler in &self.board_handlers {
            handler(&event);
        }
    }

    fn publish_view_event(&mut self, event: ViewEvent) {
        for handler in &self.view_handlers {
            handler(&event);
        }
    }

    fn subscribe_to_board_events(&mut self, handler: BoardEventHandler) {
        self.board_handlers.push(handler);
    }

    fn subscribe_to_view_events(&mut self, handler: ViewEventHandler) {
        self.view_handlers.push(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::events::Notice;
    use crate::board::models::PostId;
    use std::sync::{Arc, Mutex};

    #[test]
    fn event_bus_should_deliver_board_events() {
        let mut bus = SimpleEventBus::new();
        let received_events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = received_events.clone();

        bus.subscribe_to_board_events(Box::new(move |event| {
            events_clone.lock().unwrap().push(event.clone());
        }));

        let event = BoardEvent::LikeClicked {
            post_id: PostId::new("-N1"),
        };
        bus.publish_board_event(event.clone());

        let received = received_events.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0], event);
    }

    #[test]
    fn event_bus_should_deliver_view_events() {
        let mut bus = SimpleEventBus::new();
        let received_events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = received_events.clone();

        bus.subscribe_to_view_events(Box::new(move |event| {
            events_clone.lock().unwrap().push(event.clone());
        }));

        let event = ViewEvent::NoticeRaised(Notice::transient("saved"));
        bus.publish_view_event(event.clone());

        let received = received_events.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0], event);
    }

    #[test]
    fn event_bus_should_handle_multiple_subscribers() {
        let mut bus = SimpleEventBus::new();
        let received_events_1 = Arc::new(Mutex::new(Vec::new()));
        let received_events_2 = Arc::new(Mutex::new(Vec::new()));
        let events_clone_1 = received_events_1.clone();
        let events_clone_2 = received_events_2.clone();

        bus.subscribe_to_view_events(Box::new(move |event| {
            events_clone_1.lock().unwrap().push(event.clone());
        }));

        bus.subscribe_to_view_events(Box::new(move |event| {
            events_clone_2.lock().unwrap().push(event.clone());
        }));

        bus.publish_view_event(ViewEvent::FeedRedrawRequired);

        assert_eq!(received_events_1.lock().unwrap().len(), 1);
        assert_eq!(received_events_2.lock().unwrap().len(), 1);
    }
}
