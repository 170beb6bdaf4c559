/// Database configuration and connection management
pub mod database;

/// School settings, seed classes and seed fee schedule from config.toml
pub mod school;
