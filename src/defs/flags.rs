use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Editor highlight / selection bits carried by sectors and sidedefs.
    ///
    /// `ZPLUS` is the ceiling-facing sense, `ZMINUS` the floor-facing one.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TagFlags: u32 {
        const HIGHLIGHTED_ZPLUS  = 1 << 0;
        const SELECTED_ZPLUS     = 1 << 1;
        const HIGHLIGHTED_ZMINUS = 1 << 2;
        const SELECTED_ZMINUS    = 1 << 3;

        const HIGHLIGHTED = Self::HIGHLIGHTED_ZPLUS.bits() | Self::HIGHLIGHTED_ZMINUS.bits();
        const SELECTED    = Self::SELECTED_ZPLUS.bits() | Self::SELECTED_ZMINUS.bits();
    }
}

bitflags! {
    /// Per-entry bits of the derived contour array.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ContourFlags: u32 {
        // Which linedef side this entry walks (0 = vertex 0 → 1).
        const SIDE     = 1 << 0;
        const IS_FIRST = 1 << 1;
        const IS_LAST  = 1 << 2;
    }
}
