//! Per-phase wall-clock accounting and combinatorial counters.

use std::fmt;
use std::time::{Duration, Instant};

/// Accumulating stopwatch; `start`/`stop` pairs may repeat.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stopwatch {
    started: Option<Instant>,
    total: Duration,
}

impl Stopwatch {
    pub fn start(&mut self) {
        debug_assert!(self.started.is_none(), "stopwatch already running");
        self.started = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.total += started.elapsed();
        }
    }

    pub fn seconds(&self) -> f64 {
        self.total.as_secs_f64()
    }
}

/// Summary of a dual-description run: timings of the main phases plus
/// counters for rays, edges and the adjacency tests.
#[derive(Clone, Debug, Default)]
pub struct DdSummary {
    pub(crate) total: Stopwatch,
    pub(crate) computing_basis: Stopwatch,
    pub(crate) selecting_pivot: Stopwatch,
    pub(crate) classifying_rays: Stopwatch,
    pub(crate) potential_adjacency_testing: Stopwatch,
    pub(crate) adjacency_testing: Stopwatch,
    pub(crate) partitioning: Stopwatch,

    total_rays_created: u64,
    total_edges_created: u64,
    total_adjacency_tests: u64,
    total_potential_adjacency_tests: u64,
    total_dot_products: u64,

    num_extreme_rays: usize,
    num_edges: usize,
    num_facets: usize,
    num_iterations: u64,
}

impl DdSummary {
    pub(crate) fn add_rays(&mut self, n: usize) {
        self.total_rays_created += n as u64;
    }

    pub(crate) fn add_edges(&mut self, n: usize) {
        self.total_edges_created += n as u64;
    }

    pub(crate) fn add_adjacency_tests(&mut self, n: usize) {
        self.total_adjacency_tests += n as u64;
    }

    pub(crate) fn add_potential_adjacency_tests(&mut self, n: usize) {
        self.total_potential_adjacency_tests += n as u64;
    }

    pub(crate) fn add_dot_product(&mut self) {
        self.total_dot_products += 1;
    }

    pub(crate) fn set_num_extreme_rays(&mut self, n: usize) {
        self.num_extreme_rays = n;
    }

    pub(crate) fn set_num_edges(&mut self, n: usize) {
        self.num_edges = n;
    }

    pub(crate) fn set_num_facets(&mut self, n: usize) {
        self.num_facets = n;
    }

    pub(crate) fn set_num_iterations(&mut self, n: u64) {
        self.num_iterations = n;
    }

    pub fn rays_created(&self) -> u64 {
        self.total_rays_created
    }

    pub fn edges_created(&self) -> u64 {
        self.total_edges_created
    }

    pub fn adjacency_tests(&self) -> u64 {
        self.total_adjacency_tests
    }

    pub fn potential_adjacency_tests(&self) -> u64 {
        self.total_potential_adjacency_tests
    }

    pub fn dot_products(&self) -> u64 {
        self.total_dot_products
    }

    pub fn num_extreme_rays(&self) -> usize {
        self.num_extreme_rays
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn num_facets(&self) -> usize {
        self.num_facets
    }

    pub fn num_iterations(&self) -> u64 {
        self.num_iterations
    }
}

impl fmt::Display for DdSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total.seconds();
        writeln!(f, "Total computational time: {total:.6} sec:")?;
        let phases = [
            (self.computing_basis, "computing basis"),
            (self.selecting_pivot, "selecting pivot"),
            (self.classifying_rays, "classifying rays"),
            (
                self.potential_adjacency_testing,
                "potential adjacency testing",
            ),
            (self.adjacency_testing, "adjacency testing"),
            (self.partitioning, "partitioning"),
        ];
        let mut other = total;
        for (watch, name) in phases {
            let seconds = watch.seconds();
            writeln!(f, "    {name}: {seconds:.6} sec ({:.1}%)", percent(seconds, total))?;
            other -= seconds;
        }
        writeln!(f, "    other: {other:.6} sec ({:.1}%)", percent(other, total))?;

        writeln!(f, "Total rays created: {}", self.total_rays_created)?;
        writeln!(
            f,
            "Potential adjacency tests performed: {}",
            self.total_potential_adjacency_tests
        )?;
        writeln!(f, "Adjacency tests performed: {}", self.total_adjacency_tests)?;
        writeln!(f, "Total edges created: {}", self.total_edges_created)?;
        writeln!(f, "Dot products computed: {}", self.total_dot_products)?;

        writeln!(f, "Number of extreme rays: {}", self.num_extreme_rays)?;
        writeln!(f, "Number of edges: {}", self.num_edges)?;
        writeln!(f, "Number of facets: {}", self.num_facets)?;
        writeln!(f, "Number of iterations: {}", self.num_iterations)
    }
}

fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 { 100.0 * part / total } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::DdSummary;

    #[test]
    fn counters_accumulate() {
        let mut summary = DdSummary::default();
        summary.add_rays(3);
        summary.add_rays(2);
        summary.add_edges(4);
        summary.add_dot_product();
        assert_eq!(summary.rays_created(), 5);
        assert_eq!(summary.edges_created(), 4);
        assert_eq!(summary.dot_products(), 1);
    }

    #[test]
    fn display_lists_every_phase() {
        let mut summary = DdSummary::default();
        summary.set_num_facets(4);
        let text = summary.to_string();
        assert!(text.contains("selecting pivot"));
        assert!(text.contains("partitioning"));
        assert!(text.contains("Number of facets: 4"));
    }
}
