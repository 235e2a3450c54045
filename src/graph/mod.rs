//! Waypoint graph construction and the stages that reshape it
//!
//! Stages run in order, each over the output of the previous one:
//! placement, push-out, chain simplification, cross-water linking.

mod chain;
mod placement;
mod pushout;
mod store;
mod validation;
mod visibility;

pub use chain::{ChainStats, simplify_chains};
pub use placement::seed_rings;
pub use pushout::{Corner, PushStats, bisector_direction, corner_kind, push_out, radial_direction};
pub use store::WaypointGraph;
pub use validation::{GraphValidation, validate_graph};
pub use visibility::link_cross_water;
