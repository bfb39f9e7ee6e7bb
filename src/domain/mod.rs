// Domain layer: wire types, models and ports. Nothing here performs I/O.

pub mod enums;
pub mod models;
pub mod ports;
pub mod types;
