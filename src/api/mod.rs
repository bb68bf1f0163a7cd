pub mod handlers;
pub mod models;
pub mod parsers;
pub mod routes;
pub mod source;
pub mod spond_client;

pub use source::{RosterFile, RosterSource};
pub use spond_client::SpondClient;
