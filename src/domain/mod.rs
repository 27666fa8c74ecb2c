// Domain layer: models, request payloads and ports (interfaces).

pub mod model;
pub mod ports;
pub mod requests;
