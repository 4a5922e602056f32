pub mod traffic_pipeline;
