//! Database models and queries

pub mod devotees;
pub mod init;
pub mod models;

pub use devotees::*;
pub use init::*;
pub use models::*;
