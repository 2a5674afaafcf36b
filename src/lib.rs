pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod remote;
pub mod state;
pub mod store;
pub mod view;
