//! The three stop orderings offered for every tour.
//!
//! Each generator takes the whole candidate pool and the stop budget and
//! returns at most `max_stops` stops. When the pool already fits the budget it
//! is returned untouched.

use crate::models::{Stop, TourVariation, VariationKind};
use rand::{seq::SliceRandom, Rng};
use std::collections::VecDeque;

impl VariationKind {
    pub fn generate<R: Rng + ?Sized>(
        &self,
        candidates: &[Stop],
        max_stops: usize,
        rng: &mut R,
    ) -> Vec<Stop> {
        match self {
            VariationKind::Compact => compact(candidates, max_stops),
            VariationKind::Diverse => diverse(candidates, max_stops),
            VariationKind::Popular => popular(candidates, max_stops, rng),
        }
    }
}

/// One variation per kind, in [`VariationKind::ALL`] order
pub fn generate_all<R: Rng + ?Sized>(
    candidates: &[Stop],
    max_stops: usize,
    rng: &mut R,
) -> Vec<TourVariation> {
    VariationKind::ALL
        .iter()
        .map(|kind| TourVariation::new(*kind, kind.generate(candidates, max_stops, &mut *rng)))
        .collect()
}

fn untrimmed(candidates: &[Stop], max_stops: usize) -> Option<Vec<Stop>> {
    if max_stops == 0 {
        Some(Vec::new())
    } else if candidates.len() <= max_stops {
        Some(candidates.to_vec())
    } else {
        None
    }
}

/// Greedy nearest-neighbour walk starting at the first candidate.
/// Ties go to the candidate that comes first.
pub fn compact(candidates: &[Stop], max_stops: usize) -> Vec<Stop> {
    if let Some(stops) = untrimmed(candidates, max_stops) {
        return stops;
    }

    let mut visited = vec![false; candidates.len()];
    let mut order = Vec::with_capacity(max_stops);
    let mut current = 0;
    visited[0] = true;
    order.push(0);

    while order.len() < max_stops {
        let here = &candidates[current].coordinates;
        let mut nearest: Option<(usize, f64)> = None;
        for (i, stop) in candidates.iter().enumerate() {
            if visited[i] {
                continue;
            }
            let d = here.distance_to(&stop.coordinates);
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((i, d));
            }
        }
        match nearest {
            Some((i, _)) => {
                visited[i] = true;
                order.push(i);
                current = i;
            }
            None => break,
        }
    }

    order.into_iter().map(|i| candidates[i].clone()).collect()
}

/// Round-robin across artists, in order of each artist's first appearance.
pub fn diverse(candidates: &[Stop], max_stops: usize) -> Vec<Stop> {
    if let Some(stops) = untrimmed(candidates, max_stops) {
        return stops;
    }

    let mut groups: Vec<(&str, VecDeque<&Stop>)> = Vec::new();
    for stop in candidates {
        match groups.iter_mut().find(|(artist, _)| *artist == stop.artist_name) {
            Some((_, queue)) => queue.push_back(stop),
            None => groups.push((stop.artist_name.as_str(), VecDeque::from([stop]))),
        }
    }

    let mut result = Vec::with_capacity(max_stops);
    'rounds: loop {
        let mut progressed = false;
        for (_, queue) in groups.iter_mut() {
            if let Some(stop) = queue.pop_front() {
                result.push(stop.clone());
                progressed = true;
                if result.len() == max_stops {
                    break 'rounds;
                }
            }
        }
        if !progressed {
            break;
        }
    }

    result
}

/// Random order. Stands in for a ranking until artworks carry a popularity signal.
pub fn popular<R: Rng + ?Sized>(candidates: &[Stop], max_stops: usize, rng: &mut R) -> Vec<Stop> {
    if let Some(stops) = untrimmed(candidates, max_stops) {
        return stops;
    }

    let mut shuffled = candidates.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(max_stops);
    shuffled
}
