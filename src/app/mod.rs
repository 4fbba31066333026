pub mod logger;
pub mod models;
pub mod quiz;
pub mod report;
pub mod workflow;
