// Domain layer: record model and ports. Stages and adapters depend on this, never the reverse.

pub mod model;
pub mod ports;
