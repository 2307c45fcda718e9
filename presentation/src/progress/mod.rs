//! Progress display for consensus rounds

pub mod reporter;
