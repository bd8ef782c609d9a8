pub mod api;
pub mod app;
pub mod browser;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod detail;
pub mod fetch;
pub mod logger;
pub mod output;
pub mod page;
pub mod record;
pub mod router;
pub mod runner;
pub mod shell;

#[cfg(test)]
mod tests;
