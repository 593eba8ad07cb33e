pub mod batch;
pub mod canonical;
pub mod handlers;
pub mod ingest;
pub mod maintenance;
pub mod metadata;
pub mod models;
pub mod search;
