pub mod config;
pub mod error;
pub mod logging;

pub mod checksum;
pub mod dispatch;
pub mod manifest;
pub mod report;
pub mod runner;
pub mod settings;
