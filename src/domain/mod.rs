// Domain layer: core models and the request port. No dependencies on the
// parser or adapters.

pub mod model;
pub mod ports;
