use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct TrafficEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> TrafficEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚲 Starting station traffic pipeline");

        // Extract
        let data = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Extracted {} stations, {} trips, {} route layers",
            data.stations.as_ref().map_or(0, Vec::len),
            data.trips.as_ref().map_or(0, Vec::len),
            data.layers.len()
        );
        self.monitor.log_stats("extract");

        // Transform
        let result = self.pipeline.transform(data).await?;
        tracing::info!(
            "🔄 Produced {} traffic snapshots ({} selections failed)",
            result.snapshots.len(),
            result.failed_selections
        );
        self.monitor.log_stats("transform");

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
