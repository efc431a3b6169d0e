use prometheus::{IntCounter, Registry};

/// Request counters exported on `/metrics`. Cloning shares the underlying counters.
#[derive(Clone)]
pub struct Metrics {
    pub uplinks_received: IntCounter,
    pub uplinks_rejected: IntCounter,
    pub points_written: IntCounter,
    pub write_failures: IntCounter,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            uplinks_received: IntCounter::new("uplinks_received_total", "Total uplink callbacks received")?,
            uplinks_rejected: IntCounter::new("uplinks_rejected_total", "Uplink callbacks rejected before writing")?,
            points_written: IntCounter::new("points_written_total", "Data points written to the store")?,
            write_failures: IntCounter::new("point_write_failures_total", "Data point writes the store refused or never received")?,
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.uplinks_received.clone()))?;
        registry.register(Box::new(self.uplinks_rejected.clone()))?;
        registry.register(Box::new(self.points_written.clone()))?;
        registry.register(Box::new(self.write_failures.clone()))?;
        Ok(())
    }
}
