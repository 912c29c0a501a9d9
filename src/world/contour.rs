//! Derives the per-sector boundary loops (`Level::contours`) from the
//! unordered linedef / sidedef soup.
//!
//! After a successful build every sector owns a contiguous slice
//! `[contour0, contour0 + contourn)` that splits into one or more closed
//! loops.  Each loop starts with an `IS_FIRST` entry and ends with an
//! `IS_LAST` entry, and every entry's end vertex is the start vertex of
//! the entry after it.  The sector interior lies to the right of each
//! entry's walk direction, so outer boundaries run clockwise and holes
//! counter-clockwise (Y up).

use log::debug;

use crate::defs::ContourFlags;
use crate::world::geometry::{
    Contour, ContourId, Level, LevelError, LinedefId, SectorId, SidedefId, VertexId,
};

/// Contour entry decorated with what the sort and the loop linker need.
#[derive(Clone, Copy)]
struct Edge {
    sector: SectorId,
    start: VertexId,
    end: VertexId,
    contour: Contour,
}

impl Level {
    /// Rebuild `contours` and every sector's `contour0` / `contourn`.
    ///
    /// Must run after any topology edit and before any query, trace or
    /// clipping call.  On error the contour array is left empty.
    pub fn build_contours(&mut self) -> Result<(), LevelError> {
        self.clear_contours();

        match self.derive_contours() {
            Ok(contours) => {
                self.contours = contours;
                debug!(
                    "built {} contour entries for {} sectors ({} loops)",
                    self.contours.len(),
                    self.sectors.len(),
                    self.contours.iter().filter(|c| c.is_first()).count()
                );
                Ok(())
            }
            Err(err) => {
                self.clear_contours();
                Err(err)
            }
        }
    }

    /// Loops of `sector`, each one a slice ending with its `IS_LAST` entry.
    pub fn contour_loops(&self, sector: SectorId) -> impl Iterator<Item = &[Contour]> {
        self.sector_contours(sector)
            .split_inclusive(|c| c.is_last())
    }

    fn derive_contours(&mut self) -> Result<Vec<Contour>, LevelError> {
        let mut edges = self.collect_edges()?;

        // decorate-sort-undecorate: group by facing sector
        edges.sort_by_key(|e| e.sector);
        self.assign_slices(&edges);

        for sector in 0..self.sector_count() {
            let range = self.sector(sector).contours();
            let base = range.start;
            link_loops(&mut edges[range], sector, base)?;
        }

        Ok(edges.into_iter().map(|e| e.contour).collect())
    }

    fn clear_contours(&mut self) {
        self.contours.clear();
        for sector in self.sectors.iter_mut() {
            sector.contour0 = None;
            sector.contourn = 0;
        }
    }

    /// One edge per present sidedef.
    fn collect_edges(&self) -> Result<Vec<Edge>, LevelError> {
        let mut edges = Vec::with_capacity(self.sidedefs.len());

        for (i, ld) in self.linedefs.iter().enumerate() {
            let id = i as LinedefId;
            if ld.sidedef == [None, None] {
                return Err(LevelError::NoSidedefs(id));
            }
            let [Some(v0), Some(v1)] = ld.vertex else {
                return Err(LevelError::MissingVertex(id));
            };
            if v0 >= self.vertex_count() || v1 >= self.vertex_count() {
                return Err(LevelError::MissingVertex(id));
            }
            let ends = [(v0, v1), (v1, v0)];

            for side in 0..2 {
                let Some(sd) = ld.sidedef[side] else {
                    continue;
                };
                let sector = self.resolve_sector(id, sd)?;
                let (start, end) = ends[side];
                edges.push(Edge {
                    sector,
                    start,
                    end,
                    contour: Contour::new(id, side),
                });
            }
        }

        debug_assert!(edges.len() >= self.linedefs.len());
        Ok(edges)
    }

    fn resolve_sector(&self, linedef: LinedefId, sd: SidedefId) -> Result<SectorId, LevelError> {
        let sidedef = self
            .sidedefs
            .get(sd as usize)
            .ok_or(LevelError::BadSidedef {
                linedef,
                sidedef: sd,
            })?;
        match sidedef.sector {
            Some(s) if s < self.sector_count() => Ok(s),
            _ => Err(LevelError::UnresolvedSector(sd)),
        }
    }

    /// `edges` is sorted by sector: hand every sector its slice.
    fn assign_slices(&mut self, edges: &[Edge]) {
        for (i, e) in edges.iter().enumerate() {
            let sector = &mut self.sectors[e.sector as usize];
            if sector.contour0.is_none() {
                sector.contour0 = Some(i as ContourId);
            }
            sector.contourn += 1;
        }
    }
}

/// Reorder one sector's edges into closed loops, in place.
///
/// O(n²) in the sector's edge count.  `base` is the slice's offset in the
/// full contour array, used for error reporting only.
fn link_loops(edges: &mut [Edge], sector: SectorId, base: usize) -> Result<(), LevelError> {
    let mut first = 0;
    while first < edges.len() {
        edges[first].contour.flags.insert(ContourFlags::IS_FIRST);
        let loop_start = edges[first].start;

        let mut cur = first;
        while edges[cur].end != loop_start {
            let want = edges[cur].end;
            let next = cur + 1;
            let Some(found) = (next..edges.len()).find(|&j| edges[j].start == want) else {
                return Err(LevelError::OpenLoop {
                    sector,
                    contour: (base + cur) as ContourId,
                });
            };
            edges.swap(next, found);
            cur = next;
        }

        edges[cur].contour.flags.insert(ContourFlags::IS_LAST);
        first = cur + 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixtures;

    /// Every loop is closed and flagged exactly once at each end.
    fn assert_closed_loops(level: &Level) {
        for s in 0..level.sector_count() {
            let range = level.sector(s).contours();
            let mut seen = 0;
            for lp in level.contour_loops(s) {
                assert!(lp[0].is_first(), "sector {s}: loop must start with IS_FIRST");
                assert!(lp[lp.len() - 1].is_last());
                assert_eq!(lp.iter().filter(|c| c.is_first()).count(), 1);
                assert_eq!(lp.iter().filter(|c| c.is_last()).count(), 1);
                for w in lp.windows(2) {
                    assert_eq!(w[0].end_vertex(level), w[1].start_vertex(level));
                }
                assert_eq!(
                    lp[lp.len() - 1].end_vertex(level),
                    lp[0].start_vertex(level),
                    "sector {s}: loop not closed"
                );
                for c in lp {
                    let sd = c.sidedef(level).unwrap();
                    assert_eq!(level.sidedef(sd).sector, Some(s));
                }
                seen += lp.len();
            }
            assert_eq!(seen, range.len());
        }
    }

    #[test]
    fn single_box_forms_one_loop() {
        let level = fixtures::one_box(256.0, 0.0, 64.0);
        assert_eq!(level.contour_count(), 4);
        assert_eq!(level.sector(0).contour0, Some(0));
        assert_eq!(level.sector(0).contourn, 4);
        assert_eq!(level.contour_loops(0).count(), 1);
        assert_closed_loops(&level);
    }

    #[test]
    fn portal_contributes_to_both_sectors() {
        let level = fixtures::two_boxes();
        assert_eq!(level.contour_count(), 8);
        assert_eq!(level.sector(0).contourn, 4);
        assert_eq!(level.sector(1).contourn, 4);
        assert_eq!(level.sector(1).contour0, Some(4));

        let portal = fixtures::PORTAL;
        let sides: Vec<usize> = level
            .contours()
            .iter()
            .filter(|c| c.linedef == portal)
            .map(Contour::side)
            .collect();
        assert_eq!(sides, vec![0, 1]);
        assert_closed_loops(&level);
    }

    #[test]
    fn hole_becomes_second_loop() {
        let level = fixtures::box_with_pillar();
        assert_eq!(level.sector(0).contourn, 8);
        let loops: Vec<usize> = level.contour_loops(0).map(<[Contour]>::len).collect();
        assert_eq!(loops, vec![4, 4]);
        assert_closed_loops(&level);
    }

    #[test]
    fn shuffled_linedefs_still_link() {
        let mut level = fixtures::two_boxes();
        level.linedefs.reverse();
        level.build_contours().unwrap();
        assert_closed_loops(&level);
    }

    #[test]
    fn rebuild_is_repeatable() {
        let mut level = fixtures::two_boxes();
        let before = level.contours().to_vec();
        level.build_contours().unwrap();
        assert_eq!(level.contours(), &before[..]);
    }

    #[test]
    fn linedef_without_sides_is_rejected() {
        let mut level = fixtures::one_box(256.0, 0.0, 64.0);
        let l = level.new_linedef();
        level.linedef_mut(l).vertex = [Some(0), Some(2)];
        assert_eq!(level.build_contours(), Err(LevelError::NoSidedefs(l)));
        assert_eq!(level.contour_count(), 0);
        assert_eq!(level.sector(0).contour0, None);
    }

    #[test]
    fn dangling_edge_is_an_open_loop() {
        let mut level = fixtures::one_box(256.0, 0.0, 64.0);
        // drop one wall of the box
        level.linedefs.pop();
        assert!(matches!(
            level.build_contours(),
            Err(LevelError::OpenLoop { sector: 0, .. })
        ));
    }

    #[test]
    fn sidedef_without_sector_is_rejected() {
        let mut level = fixtures::one_box(256.0, 0.0, 64.0);
        level.sidedef_mut(2).sector = None;
        assert_eq!(level.build_contours(), Err(LevelError::UnresolvedSector(2)));
    }
}
