pub mod fines;
pub mod matches;
pub mod models;

pub use fines::*;
pub use matches::*;
pub use models::*;
