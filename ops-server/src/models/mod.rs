mod activity;
mod ground_station;
mod mission;
mod satellite;
mod snapshot;
mod telemetry;

pub use activity::*;
pub use ground_station::*;
pub use mission::*;
pub use satellite::*;
pub use snapshot::*;
pub use telemetry::*;
