pub mod config;
pub mod display;
pub mod ensemble;
pub mod models;
pub mod patterns;
pub mod service;
