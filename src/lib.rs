pub mod assets;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod model;
pub mod view;
