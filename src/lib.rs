pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod coop;
pub mod error;
pub mod fetcher;
pub mod igdb;
pub mod listing;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod report;
pub mod sources;
pub mod throttle;
