pub mod cli;
pub mod config;
pub mod controller;
pub mod dump;
pub mod keys;
pub mod logging;
pub mod markup;
pub mod models;
pub mod protocol;
pub mod remote;
pub mod settings;
pub mod ui;
pub mod window;
pub mod worker;
pub mod zoom;
