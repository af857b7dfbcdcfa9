pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod screens;
pub mod services;
pub mod store;

#[cfg(test)]
mod testing;
