pub mod mask;
pub mod polygon;
pub mod region;
pub mod waypoint;

pub use mask::WaterMask;
pub use polygon::{Point, Polygon, SHORE_WINDING, Winding};
pub use region::{RawRegion, Region};
pub use waypoint::{Waypoint, WaypointId};
