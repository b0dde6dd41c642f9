pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod mail;
pub mod session;
pub mod terminal;
