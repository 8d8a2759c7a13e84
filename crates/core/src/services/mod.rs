pub mod aggregation_service;
pub mod collector_service;
