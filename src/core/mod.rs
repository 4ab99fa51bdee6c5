// Domain-layer modules and shared errors/models
pub mod relay {
    pub use crate::relay::*;
}

pub mod lead_models {
    pub use crate::lead_models::*;
}

pub mod relay_models {
    pub use crate::relay_models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
