pub mod bounds;
pub mod raster;
pub mod sampling;
pub mod simplify;
pub mod vector;

pub use bounds::Bounds;
pub use raster::rasterize_land;
pub use sampling::{segment_on_water, segment_prefix_on_water};
pub use simplify::{convex_hull, epsilon_for, simplify_ring};
