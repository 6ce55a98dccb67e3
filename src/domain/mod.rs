// Domain layer: fallback policy model and the users service port.

pub mod model;
pub mod ports;
