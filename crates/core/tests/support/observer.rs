//! Observer recording every store event

use parking_lot::Mutex;
use timetrail_core::StoreObserver;
use timetrail_domain::StoreEvent;

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<StoreEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&StoreEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|event| matches(event)).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl StoreObserver for RecordingObserver {
    fn on_event(&self, event: &StoreEvent) {
        self.events.lock().push(event.clone());
    }
}
