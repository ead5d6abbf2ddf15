pub mod cli;
pub mod config;
pub mod db;
pub mod lookup;
pub mod models;
pub mod report;
pub mod store;
pub mod validate;
pub mod view;

pub use db::Database;
