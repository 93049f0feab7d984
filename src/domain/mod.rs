// Domain layer: models, country codes and ports. Storage details live in adapters.

pub mod countries;
pub mod model;
pub mod ports;
