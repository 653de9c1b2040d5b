// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Shortest and longest paths through a chain of search point sets.
//!
//! A task is modelled as a layered graph: layer `i` holds the candidate
//! points of task point `i`, and every point of layer `i` is connected to
//! every point of layer `i + 1`. A path visits exactly one point per layer.
//! Edge weights are flat distances in meters.

use common::flat::FlatBoundingBox;
use common::search_point::SearchPoint;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::debug;

/// Result of a path search.
#[derive(Debug, Clone, PartialEq)]
pub struct DijkstraSolution {
    /// The selected point of every layer, in layer order.
    pub points: Vec<SearchPoint>,
    /// Index of the selected point within its layer.
    pub indices: Vec<usize>,
    /// Flat path length in meters, including the leg from the origin.
    pub distance: u64,
}

/// Finds the path of minimum total distance.
#[derive(Debug, Default)]
pub struct TaskDijkstraMin;

/// Finds the path of maximum total distance.
#[derive(Debug, Default)]
pub struct TaskDijkstraMax;

impl TaskDijkstraMin {
    pub fn new() -> Self {
        TaskDijkstraMin
    }

    /// Searches the shortest path through `layers`.
    ///
    /// # Parameters
    /// - `layers`: Candidate points per task point, none of them may be empty.
    /// - `origin`: Optional fixed point the path starts from (the aircraft).
    ///
    /// # Returns
    /// `None` if there is nothing to search or a layer is empty.
    pub fn solve(&self, layers: &[&[SearchPoint]], origin: Option<&SearchPoint>) -> Option<DijkstraSolution> {
        let indices = search(layers, origin, |a, b| flat_distance(a, b))?;
        Some(solution(layers, origin, indices))
    }
}

impl TaskDijkstraMax {
    pub fn new() -> Self {
        TaskDijkstraMax
    }

    /// Searches the longest path through `layers`.
    ///
    /// Every path has the same number of edges, so maximizing the distance
    /// is the same as minimizing `K - d` per edge with `K` larger than any
    /// edge. This keeps all weights positive.
    pub fn solve(&self, layers: &[&[SearchPoint]], origin: Option<&SearchPoint>) -> Option<DijkstraSolution> {
        let all = layers.iter().flat_map(|l| l.iter()).chain(origin);
        let bb = FlatBoundingBox::from_points(all.map(|p| p.flat()))?;
        let k = bb.lower.distance_to(&bb.upper).ceil() as u64 + 1;

        let indices = search(layers, origin, |a, b| k.saturating_sub(flat_distance(a, b)))?;
        Some(solution(layers, origin, indices))
    }
}

fn flat_distance(a: &SearchPoint, b: &SearchPoint) -> u64 {
    a.flat_distance_to(b).round() as u64
}

fn solution(layers: &[&[SearchPoint]], origin: Option<&SearchPoint>, indices: Vec<usize>) -> DijkstraSolution {
    let points: Vec<SearchPoint> = indices
        .iter()
        .zip(layers.iter())
        .map(|(i, layer)| layer[*i])
        .collect();
    let mut distance = points
        .windows(2)
        .map(|w| flat_distance(&w[0], &w[1]))
        .sum();
    if let (Some(origin), Some(first)) = (origin, points.first()) {
        distance += flat_distance(origin, first);
    }
    DijkstraSolution {
        points,
        indices,
        distance,
    }
}

/// Dijkstra over the layered graph. Returns the selected index per layer.
fn search<W>(layers: &[&[SearchPoint]], origin: Option<&SearchPoint>, weight: W) -> Option<Vec<usize>>
where
    W: Fn(&SearchPoint, &SearchPoint) -> u64,
{
    if layers.is_empty() {
        return None;
    }
    if layers.iter().any(|l| l.is_empty()) {
        debug!("Path search with an empty layer");
        return None;
    }

    let mut cost: Vec<Vec<u64>> = layers.iter().map(|l| vec![u64::MAX; l.len()]).collect();
    let mut predecessor: Vec<Vec<Option<usize>>> = layers.iter().map(|l| vec![None; l.len()]).collect();
    let mut heap = BinaryHeap::new();

    for (i, p) in layers[0].iter().enumerate() {
        let c = origin.map_or(0, |o| weight(o, p));
        cost[0][i] = c;
        heap.push(Reverse((c, 0_usize, i)));
    }

    let last = layers.len() - 1;
    let mut reached = None;
    while let Some(Reverse((c, layer, i))) = heap.pop() {
        if c > cost[layer][i] {
            continue;
        }
        if layer == last {
            reached = Some(i);
            break;
        }
        let from = &layers[layer][i];
        for (j, to) in layers[layer + 1].iter().enumerate() {
            let next = c.saturating_add(weight(from, to));
            if next < cost[layer + 1][j] {
                cost[layer + 1][j] = next;
                predecessor[layer + 1][j] = Some(i);
                heap.push(Reverse((next, layer + 1, j)));
            }
        }
    }

    let mut index = reached?;
    let mut indices = vec![0; layers.len()];
    for layer in (0..=last).rev() {
        indices[layer] = index;
        if layer > 0 {
            index = predecessor[layer][index]?;
        }
    }
    Some(indices)
}
