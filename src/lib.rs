pub mod aggregator;
pub mod app;
pub mod config;
pub mod currency;
pub mod model;
pub mod normalizer;
pub mod selector;
pub mod source;
pub mod storage;
pub mod utils;
