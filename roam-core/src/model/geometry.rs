//! Great-circle primitives shared by the graph and the spatial index

use geo::Point;

/// Earth radius in miles; fixed so stored and freshly computed distances
/// stay comparable bit for bit
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Great-circle distance between two points in miles (haversine)
pub fn haversine_miles(a: Point<f64>, b: Point<f64>) -> f64 {
    let phi1 = a.y().to_radians();
    let phi2 = b.y().to_radians();
    let dphi = (b.y() - a.y()).to_radians();
    let dlambda = (b.x() - a.x()).to_radians();

    let h = (dphi / 2.0).sin() * (dphi / 2.0).sin()
        + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin() * (dlambda / 2.0).sin();
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Initial bearing of the great-circle arc from `a` to `b`, in degrees
/// within (-180, 180]
pub fn initial_bearing_degrees(a: Point<f64>, b: Point<f64>) -> f64 {
    let phi1 = a.y().to_radians();
    let phi2 = b.y().to_radians();
    let lambda1 = a.x().to_radians();
    let lambda2 = b.x().to_radians();

    let y = (lambda2 - lambda1).sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * (lambda2 - lambda1).cos();
    y.atan2(x).to_degrees()
}
