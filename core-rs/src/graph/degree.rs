/**
 * degree.rs
 * Effective subtree weight of hierarchy nodes, used for symbol sizing
 *
 * weight(n) = children(n) + sum(weight(c) for c in children(n))
 *
 * Raw subclass data may contain cycles. A node reached again while it is
 * still being computed contributes its partial weight so far; the cycle is
 * counted and logged, never followed.
 */

use std::collections::HashMap;
use tracing::warn;

use crate::config::RenderingConfig;

/// Memoized, cycle-safe weight computation over one hierarchy
pub struct DegreeRefiner<'a> {
    degrees: &'a HashMap<String, usize>,
    inheritance: &'a HashMap<String, Vec<String>>,
    refreshed: HashMap<String, usize>,
    in_progress: HashMap<String, usize>,
    cycles: usize,
}

impl<'a> DegreeRefiner<'a> {
    /// `degrees` holds the direct in-degree of each label, `inheritance` maps
    /// a label to its direct children
    pub fn new(degrees: &'a HashMap<String, usize>, inheritance: &'a HashMap<String, Vec<String>>) -> Self {
        Self {
            degrees,
            inheritance,
            refreshed: HashMap::new(),
            in_progress: HashMap::new(),
            cycles: 0,
        }
    }

    /// Refreshed weight of `label`; unknown labels weigh 0
    pub fn refresh(&mut self, label: &str) -> usize {
        if let Some(&weight) = self.refreshed.get(label) {
            return weight;
        }
        if let Some(&partial) = self.in_progress.get(label) {
            self.cycles += 1;
            warn!(node = %label, partial, "cycle in hierarchy, using partial weight");
            return partial;
        }

        let own = self.degrees.get(label).copied().unwrap_or(0);
        self.in_progress.insert(label.to_string(), own);

        let children = self.inheritance.get(label).map(Vec::as_slice).unwrap_or(&[]);
        let mut weight = own;
        for child in children {
            let child_weight = self.refresh(child);
            weight = weight.saturating_add(child_weight);
            self.in_progress.insert(label.to_string(), weight);
        }

        self.in_progress.remove(label);
        self.refreshed.insert(label.to_string(), weight);
        weight
    }

    /// Refresh every label that has a recorded degree
    pub fn refresh_all(&mut self) {
        let mut labels: Vec<&String> = self.degrees.keys().collect();
        labels.sort();
        for label in labels {
            self.refresh(label);
        }
    }

    /// Number of back-edges met so far
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn into_refreshed(self) -> HashMap<String, usize> {
        self.refreshed
    }
}

/// One-shot form of [`DegreeRefiner::refresh`] sharing a caller-owned memo
///
/// Entries already present in `refreshed_cache` are trusted as-is.
pub fn refresh_degree(
    degrees: &HashMap<String, usize>,
    inheritance_map: &HashMap<String, Vec<String>>,
    label: &str,
    refreshed_cache: &mut HashMap<String, usize>,
) -> usize {
    let mut refiner = DegreeRefiner::new(degrees, inheritance_map);
    refiner.refreshed = std::mem::take(refreshed_cache);
    let weight = refiner.refresh(label);
    *refreshed_cache = refiner.into_refreshed();
    weight
}

/// `base + ln(degree) * scale` for a positive degree, else `base`
pub fn symbol_size(refreshed_degree: Option<usize>, rendering: &RenderingConfig) -> f64 {
    match refreshed_degree {
        Some(degree) if degree > 0 => {
            rendering.base_symbol_size + (degree as f64).ln() * rendering.symbol_scale
        }
        _ => rendering.base_symbol_size,
    }
}
