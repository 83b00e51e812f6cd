// fruit-freshness - Fruit freshness analysis service
// Author: kelexine (https://github.com/kelexine)

pub mod analysis;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod languages;
pub mod metrics;
pub mod models;
pub mod report;
pub mod server;
pub mod translation;
pub mod utils;
pub mod vision;
