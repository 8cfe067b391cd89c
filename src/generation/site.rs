//! Input sites and the sorted site list that feeds the sweep

use std::cmp::Ordering;

use glam::DVec2;

use crate::error::{Result, VoronoiError};
use crate::geometry::Rect;

/// Sweep order: y first, then x
pub fn compare_by_y_then_x(a: DVec2, b: DVec2) -> Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

/// An input point around which a Voronoi region grows
#[derive(Debug, Clone)]
pub struct Site {
    /// Site location
    pub coord: DVec2,
    /// Position of this site in its list (sorted position once sorted)
    pub index: usize,
    /// Position in the caller's input sequence
    pub input_index: usize,
    /// Edges bisecting this site and one of its neighbors, in creation order
    pub(crate) edges: Vec<usize>,
}

impl Site {
    pub fn new(coord: DVec2, input_index: usize) -> Self {
        Self {
            coord,
            index: input_index,
            input_index,
            edges: Vec::new(),
        }
    }

    /// Edge IDs bisecting this site
    #[inline]
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    #[inline]
    pub fn dist(&self, p: DVec2) -> f64 {
        self.coord.distance(p)
    }
}

/// Sites in sweep order with a restartable cursor
#[derive(Debug, Clone, Default)]
pub struct SiteList {
    sites: Vec<Site>,
    current: usize,
    sorted: bool,
}

impl SiteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a site; the list becomes unsorted
    pub fn push(&mut self, site: Site) {
        self.sites.push(site);
        self.sorted = false;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Stable sort by (y, x); every site's `index` is reassigned to its new position
    /// and the cursor restarts at the first site.
    pub fn sort(&mut self) {
        self.sites
            .sort_by(|a, b| compare_by_y_then_x(a.coord, b.coord));
        for (position, site) in self.sites.iter_mut().enumerate() {
            site.index = position;
        }
        self.current = 0;
        self.sorted = true;
    }

    /// Rewind the cursor to the first site
    pub fn restart(&mut self) -> Result<()> {
        if !self.sorted {
            return Err(VoronoiError::NotSorted);
        }
        self.current = 0;
        Ok(())
    }

    /// Pop the next site in sweep order, returning its index
    ///
    /// # Errors
    ///
    /// Returns `NotSorted` if [`SiteList::sort`] has not run since the last push.
    pub fn next(&mut self) -> Result<Option<usize>> {
        if !self.sorted {
            return Err(VoronoiError::NotSorted);
        }
        if self.current < self.sites.len() {
            self.current += 1;
            Ok(Some(self.current - 1))
        } else {
            Ok(None)
        }
    }

    /// Bounds of all sites: x range over every site, y range from the first and
    /// last sorted site. An empty list yields a zero rectangle.
    ///
    /// # Errors
    ///
    /// Returns `NotSorted` if the list is not sorted.
    pub fn bounding_box(&self) -> Result<Rect> {
        if !self.sorted {
            return Err(VoronoiError::NotSorted);
        }
        let (first, last) = match (self.sites.first(), self.sites.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Ok(Rect::new(DVec2::ZERO, DVec2::ZERO)),
        };
        let (xmin, xmax) = self
            .sites
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.coord.x), hi.max(s.coord.x))
            });
        Ok(Rect::new(
            DVec2::new(xmin, first.coord.y),
            DVec2::new(xmax, last.coord.y),
        ))
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    pub fn as_slice(&self) -> &[Site] {
        &self.sites
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Site] {
        &mut self.sites
    }

    pub fn into_sites(self) -> Vec<Site> {
        self.sites
    }
}
