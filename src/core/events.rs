use crate::core::clock::SimTime;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// Step of a customer's visit to a checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Arrived,
    Scanning,
    Paying,
    Finished,
    LeftQueueTime,
    LeftQueueDepth,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Arrived => "ARRIVED",
            Phase::Scanning => "SCANNING",
            Phase::Paying => "PAYING",
            Phase::Finished => "FINISHED",
            Phase::LeftQueueTime => "LEFT_QUEUE_TIME",
            Phase::LeftQueueDepth => "LEFT_QUEUE_DEPTH",
        }
    }

    /// Whether this phase ends the customer's visit
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Finished | Phase::LeftQueueTime | Phase::LeftQueueDepth)
    }
}

/// Progress record emitted by lane workers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub id: Uuid,
    pub time: SimTime,
    pub store_id: u32,
    pub customer_id: u32,
    pub checkout_id: u32,
    pub items: usize,
    /// Product being scanned, for `Scanning` events
    pub product_id: Option<u32>,
    pub phase: Phase,
}

impl ProgressEvent {
    pub fn new(
        time: SimTime,
        store_id: u32,
        customer_id: u32,
        checkout_id: u32,
        items: usize,
        phase: Phase,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            time,
            store_id,
            customer_id,
            checkout_id,
            items,
            product_id: None,
            phase,
        }
    }

    pub fn with_product(mut self, product_id: u32) -> Self {
        self.product_id = Some(product_id);
        self
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:[store{}] Checkout {:2}: {:<16} -> Customer: {:4}, Items: {:3}",
            self.time,
            self.store_id,
            self.checkout_id,
            self.phase.label(),
            self.customer_id,
            self.items
        )?;
        if let Some(product_id) = self.product_id {
            write!(f, ", Product: {:4}", product_id)?;
        }
        Ok(())
    }
}

/// Receiver of progress events.
///
/// Called from every lane worker thread, so implementations must be thread-safe.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Writes each event as one `info!` line
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: ProgressEvent) {
        info!("{}", event);
    }
}

/// Discards every event
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Events for one customer of one store, in emission order
    pub fn events_for(&self, store_id: u32, customer_id: u32) -> Vec<ProgressEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.store_id == store_id && e.customer_id == customer_id)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(phase: Phase) -> ProgressEvent {
        ProgressEvent::new(SimTime::from_epoch(9 * 3600 + 61), 1, 12, 3, 7, phase)
    }

    #[test]
    fn test_display() {
        let line = event(Phase::Scanning).with_product(5).to_string();
        assert!(line.starts_with("09:01:01:[store1] Checkout  3: SCANNING"));
        assert!(line.contains("Customer:   12"));
        assert!(line.ends_with("Product:    5"));
    }

    #[test]
    fn test_terminal_phases() {
        assert!(Phase::Finished.is_terminal());
        assert!(Phase::LeftQueueTime.is_terminal());
        assert!(Phase::LeftQueueDepth.is_terminal());
        assert!(!Phase::Arrived.is_terminal());
        assert!(!Phase::Paying.is_terminal());
    }

    #[test]
    fn test_recording_sink_filters_by_customer() {
        let sink = RecordingSink::new();
        sink.emit(event(Phase::Arrived));
        sink.emit(ProgressEvent::new(SimTime::from_epoch(0), 1, 99, 1, 1, Phase::Arrived));
        sink.emit(event(Phase::Finished));

        assert_eq!(sink.events().len(), 3);
        let phases: Vec<Phase> = sink.events_for(1, 12).iter().map(|e| e.phase).collect();
        assert_eq!(phases, vec![Phase::Arrived, Phase::Finished]);
    }

    #[test]
    fn test_event_ids_are_unique() {
        assert_ne!(event(Phase::Arrived).id, event(Phase::Arrived).id);
    }
}
