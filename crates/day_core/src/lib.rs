pub mod autosave;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod poller;
pub mod seed;
pub mod store;
