use geo::{line_string, Haversine, Length, LineString, Point};
use uom::si::f64::Length as Distance;
use uom::si::length::meter;

/// great-circle distance between two points using the haversine formula.
///
/// points are stored in (x, y) = (longitude, latitude) order, matching the
/// `[lon, lat]` pairs returned by the route service.
///
/// # Arguments
///
/// * `src` - origin point
/// * `dst` - destination point
///
/// # Returns
///
/// * the distance between the points as a length
pub fn haversine_distance(src: &Point<f64>, dst: &Point<f64>) -> Distance {
    let line: LineString<f64> = line_string![src.0, dst.0];
    Distance::new::<meter>(Haversine.length(&line))
}

/// the smallest haversine distance from `position` to any vertex of `path`.
///
/// this is a vertex distance, not a distance to the nearest point on a line
/// segment: dense route geometries keep the difference small.
///
/// # Returns
///
/// * the minimum distance, or None if the path has no vertices
pub fn min_distance_to_path(position: &Point<f64>, path: &[Point<f64>]) -> Option<Distance> {
    path.iter()
        .map(|p| haversine_distance(position, p))
        .reduce(|a, b| if b < a { b } else { a })
}

/// builds a point from a latitude, longitude pair.
pub fn point_from_lat_lon(lat: f64, lon: f64) -> Point<f64> {
    Point::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a point `d` meters north of `origin`, using the mean earth radius.
    fn north_of(origin: &Point<f64>, d: f64) -> Point<f64> {
        let dlat = (d / 6_371_008.8_f64).to_degrees();
        Point::new(origin.x(), origin.y() + dlat)
    }

    #[test]
    fn test_zero_distance() {
        let p = point_from_lat_lon(40.3362, 18.1111);
        assert_eq!(haversine_distance(&p, &p).get::<meter>(), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // one degree of latitude is roughly 111.2 km
        let a = point_from_lat_lon(0.0, 0.0);
        let b = point_from_lat_lon(1.0, 0.0);
        let d = haversine_distance(&a, &b).get::<meter>();
        assert!((d - 111_195.0).abs() < 100.0, "unexpected distance {d}");
    }

    #[test]
    fn test_min_distance_picks_nearest_vertex() {
        let origin = point_from_lat_lon(40.0, 18.0);
        let path = vec![
            north_of(&origin, 300.0),
            north_of(&origin, 75.0),
            north_of(&origin, 120.0),
        ];
        let d = min_distance_to_path(&origin, &path)
            .expect("test invariant failed: path is not empty")
            .get::<meter>();
        assert!((d - 75.0).abs() < 0.5, "unexpected distance {d}");
    }

    #[test]
    fn test_min_distance_empty_path() {
        let origin = point_from_lat_lon(40.0, 18.0);
        assert!(min_distance_to_path(&origin, &[]).is_none());
    }
}
