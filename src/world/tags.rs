//! Editor highlight / selection state driven by trace results.
//!
//! Highlights are transient (rewritten on every hover), selections toggle
//! on click.  `ZPLUS` bits mark the ceiling-facing or upper part of a
//! surface, `ZMINUS` bits the floor-facing or lower part.

use crate::defs::{FLAT_NUDGE_STEP, TagFlags};
use crate::world::geometry::{CEILING, FLOOR, Level};
use crate::world::trace::TraceResult;

impl Level {
    /// AND `keep` into the tags of every sector and every sidedef that
    /// bounds one.
    fn tag_apply_mask(&mut self, keep: TagFlags) {
        for s in self.sectors.iter_mut() {
            s.tags &= keep;
        }
        for i in 0..self.contours.len() {
            if let Some(sd) = self.contours[i].sidedef(self) {
                self.sidedefs[sd as usize].tags &= keep;
            }
        }
    }

    pub fn tag_clear_highlights(&mut self) {
        self.tag_apply_mask(!TagFlags::HIGHLIGHTED);
    }

    pub fn tag_clear_all(&mut self) {
        self.tag_apply_mask(!(TagFlags::HIGHLIGHTED | TagFlags::SELECTED));
    }

    /// Highlight the floor or ceiling under the cursor; toggle its
    /// selection when `clicked`.  Wall hits only clear highlights.
    pub fn tag_flats(&mut self, hit: Option<&TraceResult>, clicked: bool) {
        for s in self.sectors.iter_mut() {
            s.tags.remove(TagFlags::HIGHLIGHTED);
        }
        let Some(hit) = hit.filter(|h| h.hit_flat()) else {
            return;
        };
        let tags = &mut self.sector_mut(hit.sector).tags;
        if hit.z > 0 {
            mark(tags, TagFlags::HIGHLIGHTED_ZPLUS, TagFlags::SELECTED_ZPLUS, clicked);
        }
        if hit.z < 0 {
            mark(tags, TagFlags::HIGHLIGHTED_ZMINUS, TagFlags::SELECTED_ZMINUS, clicked);
        }
    }

    /// Highlight the whole sector the trace ended in, walls included;
    /// toggle its selection when `clicked`.
    pub fn tag_sectors(&mut self, hit: Option<&TraceResult>, clicked: bool) {
        let target = hit.map(|h| h.sector);

        for s in 0..self.sector_count() {
            let on = target == Some(s);
            let sidedefs: Vec<_> = self
                .sector_contours(s)
                .iter()
                .filter_map(|c| c.sidedef(self))
                .collect();

            if on {
                mark(&mut self.sector_mut(s).tags, TagFlags::HIGHLIGHTED, TagFlags::SELECTED, clicked);
            } else {
                self.sector_mut(s).tags.remove(TagFlags::HIGHLIGHTED);
            }
            for sd in sidedefs {
                let tags = &mut self.sidedef_mut(sd).tags;
                if on {
                    mark(tags, TagFlags::HIGHLIGHTED, TagFlags::SELECTED, clicked);
                } else {
                    tags.remove(TagFlags::HIGHLIGHTED);
                }
            }
        }
    }

    /// Highlight the wall under the cursor.  A blocked portal (`z = ±1`)
    /// marks only the upper or lower part, a plain wall hit both.
    pub fn tag_sidedefs(&mut self, hit: Option<&TraceResult>, clicked: bool) {
        for i in 0..self.contours.len() {
            if let Some(sd) = self.contours[i].sidedef(self) {
                self.sidedefs[sd as usize].tags.remove(TagFlags::HIGHLIGHTED);
            }
        }
        let Some((sd, z)) = hit.and_then(|h| h.sidedef.map(|sd| (sd, h.z))) else {
            return;
        };
        let tags = &mut self.sidedef_mut(sd).tags;
        if z >= 0 {
            mark(tags, TagFlags::HIGHLIGHTED_ZPLUS, TagFlags::SELECTED_ZPLUS, clicked);
        }
        if z <= 0 {
            mark(tags, TagFlags::HIGHLIGHTED_ZMINUS, TagFlags::SELECTED_ZMINUS, clicked);
        }
    }

    /// Move every selected floor (`SELECTED_ZMINUS`) and ceiling
    /// (`SELECTED_ZPLUS`) up by `steps · FLAT_NUDGE_STEP`.
    pub fn nudge_selected_flats(&mut self, steps: i32) {
        let dz = steps as f32 * FLAT_NUDGE_STEP;
        for s in self.sectors.iter_mut() {
            if s.tags.contains(TagFlags::SELECTED_ZMINUS) {
                s.flat[FLOOR].plane.raise(dz);
            }
            if s.tags.contains(TagFlags::SELECTED_ZPLUS) {
                s.flat[CEILING].plane.raise(dz);
            }
        }
    }
}

#[inline]
fn mark(tags: &mut TagFlags, highlight: TagFlags, select: TagFlags, clicked: bool) {
    tags.insert(highlight);
    if clicked {
        tags.toggle(select);
    }
}
