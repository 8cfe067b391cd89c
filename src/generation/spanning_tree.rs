//! Kruskal spanning tree over Delaunay lines

use crate::geometry::LineSegment;

use super::edge::Edge;
use super::site::Site;

/// Which spanning tree to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanningTreeKind {
    #[default]
    Minimum,
    Maximum,
}

/// Groups of sites already joined by tree lines
///
/// Each group is a tree of site indices; joining hangs the smaller group
/// under the larger one, and lookups halve the path they walk.
#[derive(Debug)]
struct Components {
    parent: Vec<usize>,
    size: Vec<usize>,
    count: usize,
}

impl Components {
    fn new(sites: usize) -> Self {
        Self {
            parent: (0..sites).collect(),
            size: vec![1; sites],
            count: sites,
        }
    }

    fn root(&mut self, mut site: usize) -> usize {
        while self.parent[site] != site {
            self.parent[site] = self.parent[self.parent[site]];
            site = self.parent[site];
        }
        site
    }

    /// Merge the groups of `a` and `b`; `false` if they were already one
    fn join(&mut self, a: usize, b: usize) -> bool {
        let (mut big, mut small) = (self.root(a), self.root(b));
        if big == small {
            return false;
        }
        if self.size[big] < self.size[small] {
            std::mem::swap(&mut big, &mut small);
        }
        self.parent[small] = big;
        self.size[big] += self.size[small];
        self.count -= 1;
        true
    }
}

/// Spanning tree (forest, for disconnected input) of the Delaunay lines of
/// `edges`, weighted by site distance
///
/// Ties keep edge creation order, so the result is deterministic.
pub(crate) fn kruskal(edges: &[Edge], sites: &[Site], kind: SpanningTreeKind) -> Vec<LineSegment> {
    let mut order: Vec<(usize, f64)> = edges
        .iter()
        .enumerate()
        .map(|(i, e)| (i, e.sites_distance(sites)))
        .collect();
    match kind {
        SpanningTreeKind::Minimum => order.sort_by(|a, b| a.1.total_cmp(&b.1)),
        SpanningTreeKind::Maximum => order.sort_by(|a, b| b.1.total_cmp(&a.1)),
    }

    let mut groups = Components::new(sites.len());
    let mut tree = Vec::with_capacity(sites.len().saturating_sub(1));
    for (i, _) in order {
        if groups.count <= 1 {
            break;
        }
        let edge = &edges[i];
        if groups.join(edge.left_site, edge.right_site) {
            tree.push(edge.delaunay_line(sites));
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn sites(points: &[(f64, f64)]) -> Vec<Site> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Site::new(DVec2::new(x, y), i))
            .collect()
    }

    #[test]
    fn test_components_join() {
        let mut groups = Components::new(5);
        assert!(groups.join(0, 1));
        assert!(groups.join(2, 3));
        assert!(!groups.join(1, 0));
        assert_eq!(groups.count, 3);

        // the pair {0, 1} absorbs the singleton 4
        assert!(groups.join(4, 1));
        assert_eq!(groups.root(4), groups.root(0));
        let root0 = groups.root(0);
        assert_eq!(groups.size[root0], 3);

        assert!(groups.join(3, 4));
        assert_eq!(groups.count, 1);
        assert!((0..5).all(|s| groups.root(s) == groups.root(2)));
        assert!(!groups.join(2, 0));
    }

    #[test]
    fn test_minimum_and_maximum_trees() {
        // right triangle with legs 3 and 4
        let sites = sites(&[(0.0, 0.0), (3.0, 0.0), (0.0, 4.0)]);
        let edges = vec![
            Edge::bisector(&sites[0], &sites[1]),
            Edge::bisector(&sites[0], &sites[2]),
            Edge::bisector(&sites[1], &sites[2]),
        ];

        let min = kruskal(&edges, &sites, SpanningTreeKind::Minimum);
        let total: f64 = min.iter().map(LineSegment::length).sum();
        assert_eq!(min.len(), 2);
        assert!((total - 7.0).abs() < 1e-12);

        let max = kruskal(&edges, &sites, SpanningTreeKind::Maximum);
        let total: f64 = max.iter().map(LineSegment::length).sum();
        assert_eq!(max.len(), 2);
        assert!((total - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_disconnected_sites_give_a_forest() {
        let sites = sites(&[(0.0, 0.0), (1.0, 0.0), (10.0, 10.0), (10.0, 12.0)]);
        let edges = vec![
            Edge::bisector(&sites[2], &sites[3]),
            Edge::bisector(&sites[0], &sites[1]),
        ];

        let forest = kruskal(&edges, &sites, SpanningTreeKind::Minimum);
        assert_eq!(forest.len(), 2);
        assert!((forest[0].length() - 1.0).abs() < 1e-12);
        assert!((forest[1].length() - 2.0).abs() < 1e-12);
    }
}
