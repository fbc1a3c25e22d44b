//! Geospatial primitives.
//!
//! Pure functions: the bucket index (fixed-precision rounding) and
//! great-circle distance. No state, no failure modes.

pub mod bucket;
pub mod distance;

pub use bucket::{bucket_for, GeoBucket};
pub use distance::{haversine_meters, EARTH_RADIUS_M};
