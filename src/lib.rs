pub mod cli;
pub mod config;
pub mod fixture;
pub mod history;
pub mod runner;
pub mod verify;
pub mod workdir;
