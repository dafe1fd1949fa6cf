pub mod charts;
pub mod document;
pub mod estimate;
pub mod export;
pub mod layer;
pub mod metrics;
pub mod network;
pub mod scene;
pub mod weights;

pub mod database;
pub mod server;
pub mod services;
