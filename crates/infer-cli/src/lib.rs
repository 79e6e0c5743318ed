pub mod cli;
pub mod logging;

mod app_config;
mod commands;
mod context;
