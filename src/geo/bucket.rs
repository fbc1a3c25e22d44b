//! Geographic bucket index.
//!
//! Maps a coordinate to a coarse grid cell by fixed-precision rounding.
//! Deterministic and total: any pair of finite coordinates yields a
//! bucket, and coordinates differing only below the rounding precision
//! land in the same one.

/// A resolved grid cell: its id and representative center coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBucket {
    pub id: String,
    pub center_lat: f64,
    pub center_lng: f64,
}

/// Resolve the bucket for a coordinate at the given decimal precision.
pub fn bucket_for(lat: f64, lng: f64, precision: u32) -> GeoBucket {
    let center_lat = round_to(lat, precision);
    let center_lng = round_to(lng, precision);
    GeoBucket {
        id: format!(
            "{:.prec$}_{:.prec$}",
            center_lat,
            center_lng,
            prec = precision as usize
        ),
        center_lat,
        center_lng,
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    // Collapse -0.0 so coordinates straddling zero share a bucket id.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
