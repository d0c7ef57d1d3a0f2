// Route construction for a set of stores visited from a single origin

use crate::algorithms::RoutePlanner;
use crate::models::{Location, PlannedRoute};

/// Greedy nearest-neighbor route: always drive to the closest unvisited store,
/// then return to the origin.
///
/// Ties go to the store listed first. The result is not an optimal tour; for
/// four or more stops a shorter round trip can exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborRouter;

impl RoutePlanner for NearestNeighborRouter {
    fn plan(&self, origin: Location, stops: &[Location]) -> PlannedRoute {
        let mut visited = vec![false; stops.len()];
        let mut order = Vec::with_capacity(stops.len());
        let mut current = origin;
        let mut miles = 0.0;

        while order.len() < stops.len() {
            let mut best_next = None;
            let mut best_dist = f64::INFINITY;

            for (i, stop) in stops.iter().enumerate() {
                if visited[i] {
                    continue;
                }
                let d = current.distance_to(stop);
                if best_next.is_none() || d < best_dist {
                    best_dist = d;
                    best_next = Some(i);
                }
            }

            let Some(next) = best_next else {
                break;
            };
            visited[next] = true;
            order.push(next);
            miles += best_dist;
            current = stops[next];
        }

        miles += current.distance_to(&origin);

        PlannedRoute { order, miles }
    }
}
