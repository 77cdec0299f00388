pub mod common;
pub mod config;
pub mod observability;
pub mod parser;
pub mod pipeline;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

// Domain data shapes shared across layers
pub mod domain;
