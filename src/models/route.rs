// Route models for representing the shopper's trip

use crate::models::Miles;
use serde::{Deserialize, Serialize};

/// Kind of a stop on the shopper's route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Start,
    Store,
    End,
}

/// One numbered stop of a rendered route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// One-based position of the stop
    pub step_index: usize,
    pub kind: StopKind,
    pub address: String,
}

/// Visiting order produced by a route planner
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    /// Indices into the planner's stop list, in visiting order
    pub order: Vec<usize>,

    /// Total distance from the origin through every stop and back
    pub miles: Miles,
}

impl PlannedRoute {
    /// Renders the route as start, one stop per visited store, end
    pub fn stops(&self, origin_label: &str, store_labels: &[String]) -> Vec<RouteStop> {
        let mut stops = Vec::with_capacity(self.order.len() + 2);
        stops.push(RouteStop {
            step_index: 1,
            kind: StopKind::Start,
            address: origin_label.to_string(),
        });
        for &index in &self.order {
            stops.push(RouteStop {
                step_index: stops.len() + 1,
                kind: StopKind::Store,
                address: store_labels[index].clone(),
            });
        }
        stops.push(RouteStop {
            step_index: stops.len() + 1,
            kind: StopKind::End,
            address: origin_label.to_string(),
        });
        stops
    }
}
