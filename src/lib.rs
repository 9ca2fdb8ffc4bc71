pub mod assignment;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod month;
pub mod token;
pub mod ui;
