//! External service integrations.

pub mod roistat_client {
    pub use crate::roistat_client::*;
}
