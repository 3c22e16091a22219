// Domain layer: the record type and the ports the core talks through.

pub mod model;
pub mod ports;
