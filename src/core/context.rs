use crate::core::clock::SimClock;
use crate::core::config::TimingConfig;
use crate::core::events::EventSink;
use std::sync::Arc;

/// Run-wide state handed to every worker and spawner at launch.
///
/// Built once by the coordinator and read-only afterwards.
pub struct SimulationContext {
    pub clock: SimClock,
    pub timing: TimingConfig,
    pub sink: Arc<dyn EventSink>,
}

impl SimulationContext {
    pub fn new(clock: SimClock, timing: TimingConfig, sink: Arc<dyn EventSink>) -> Self {
        Self { clock, timing, sink }
    }
}

impl std::fmt::Debug for SimulationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationContext")
            .field("clock", &self.clock)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}
