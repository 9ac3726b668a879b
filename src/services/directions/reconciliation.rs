use crate::models::{DistanceMeters, PlainDirections, Stop};
use serde::{Deserialize, Serialize};

/// One walking step and the stop (if any) it arrives at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepArrival {
    pub leg_index: usize,
    pub step_index: usize,
    pub instructions: String,
    /// Index into the tour's stop list
    pub arrives_at: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_to_stop: Option<DistanceMeters>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub steps: Vec<StepArrival>,
    /// Stops no step ended close enough to
    pub unattributed_stops: Vec<usize>,
}

impl Reconciliation {
    pub fn arrival_for(&self, leg_index: usize, step_index: usize) -> Option<usize> {
        self.steps
            .iter()
            .find(|s| s.leg_index == leg_index && s.step_index == step_index)
            .and_then(|s| s.arrives_at)
    }
}

/// Match every step end of the first route against the stops. A step is
/// attributed to its nearest stop when that stop is strictly closer than
/// `threshold`; ties go to the earlier stop.
pub fn reconcile(
    directions: &PlainDirections,
    stops: &[Stop],
    threshold: DistanceMeters,
) -> Reconciliation {
    let mut steps = Vec::new();
    let mut reached = vec![false; stops.len()];

    if let Some(route) = directions.routes.first() {
        for (leg_index, leg) in route.legs.iter().enumerate() {
            for (step_index, step) in leg.steps.iter().enumerate() {
                let mut nearest: Option<(usize, f64)> = None;
                for (i, stop) in stops.iter().enumerate() {
                    let d = step.end_location.distance_meters_to(&stop.coordinates);
                    if nearest.map_or(true, |(_, best)| d < best) {
                        nearest = Some((i, d));
                    }
                }

                let hit = nearest.filter(|(_, d)| *d < threshold.as_meters());
                if let Some((i, _)) = hit {
                    reached[i] = true;
                }

                steps.push(StepArrival {
                    leg_index,
                    step_index,
                    instructions: step.instructions.clone(),
                    arrives_at: hit.map(|(i, _)| i),
                    distance_to_stop: hit.map(|(_, d)| DistanceMeters(d)),
                });
            }
        }
    }

    let unattributed_stops: Vec<usize> = reached
        .iter()
        .enumerate()
        .filter(|(_, r)| !**r)
        .map(|(i, _)| i)
        .collect();

    tracing::debug!(
        steps = steps.len(),
        stops = stops.len(),
        unattributed = unattributed_stops.len(),
        "Reconciled directions against tour stops"
    );

    Reconciliation {
        steps,
        unattributed_stops,
    }
}
