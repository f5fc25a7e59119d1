//! Route overlay between two fixed endpoints.
//!
//! Route geometry is an external pure function: two points in, a polyline
//! out. [`DirectRoute`] is the bundled provider and simply connects the
//! endpoints; a sea-routing provider plugs in behind the same trait.

use crate::types::Coordinates;

/// Ordered list of vertices to draw as a line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub points: Vec<Coordinates>,
}

impl Polyline {
    pub fn segments(&self) -> impl Iterator<Item = (Coordinates, Coordinates)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

pub trait RouteProvider {
    fn route(&self, origin: Coordinates, destination: Coordinates) -> Polyline;
}

/// Straight segment between origin and destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRoute;

impl RouteProvider for DirectRoute {
    fn route(&self, origin: Coordinates, destination: Coordinates) -> Polyline {
        Polyline {
            points: vec![origin, destination],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_route_connects_endpoints() {
        let a = Coordinates::new(-123.07, 49.29);
        let b = Coordinates::new(-0.31, 39.44);
        let line = DirectRoute.route(a, b);
        assert_eq!(line.points, vec![a, b]);
        assert_eq!(line.segments().count(), 1);
    }
}
