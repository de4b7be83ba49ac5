pub mod analytics;
pub mod app;
pub mod config;
pub mod generator;
pub mod logger;
pub mod vcf;
pub mod worker;
