//! Assignment of strip triangles to the physical sides of a folded flexagon.
//!
//! Which side each triangle ends up on is a consequence of how the paper is folded, which has no
//! closed form.  So the assignment is a pair of literal lookup tables, one per supported order.

use std::fmt;

use serde::Serialize;
use three_d::Srgba;

use crate::{
    error::{FlexError, FlexResult},
    strip::{FaceIdx, FaceVec},
};

/// The largest number of sides which can be colored
pub const MAX_SIDES: usize = PALETTE.len();

/// Side slot for each triangle of a trihexaflexagon strip, in emission order.
#[rustfmt::skip]
const TRIHEXA_ORDER: [u8; 18] = [
    2, 3, 3, 1, 1, 2,
    2, 3, 3, 1, 1, 2,
    2, 3, 3, 1, 1, 2,
];

/// Side slot for each triangle of a hexahexaflexagon strip, in emission order.
///
/// Each column emits the two faces of one paper triangle, so entries `2p` and `2p + 1` belong
/// to paper triangle `p`.  One face of paper triangle `p` shows side `p % 3 + 1`, so sides 1, 2
/// and 3 cycle along the strip one triangle at a time.  The other face shows the repeating
/// pattern `4, 5, 5, 6, 6, 4`, so neighbouring paper triangles share a hidden side and fold
/// together onto it.  Unlike the trihexaflexagon table, slots don't come in matching pairs of
/// adjacent entries.
#[rustfmt::skip]
const HEXAHEXA_ORDER: [u8; 36] = [
    1, 4, 5, 2, 3, 5, 6, 1, 2, 6, 4, 3,
    1, 4, 5, 2, 3, 5, 6, 1, 2, 6, 4, 3,
    1, 4, 5, 2, 3, 5, 6, 1, 2, 6, 4, 3,
];

/// Colors for each side slot, in slot order.  The alpha channel is unused.
const PALETTE: [(&str, Srgba); 6] = [
    ("Red", rgb(255, 0, 0)),
    ("Green", rgb(0, 255, 0)),
    ("Blue", rgb(0, 0, 255)),
    ("Yellow", rgb(255, 255, 0)),
    ("Cyan", rgb(0, 255, 255)),
    ("Magenta", rgb(255, 0, 255)),
];

const fn rgb(r: u8, g: u8, b: u8) -> Srgba {
    Srgba { r, g, b, a: 0 }
}

/// One physical side of a folded flexagon, numbered from `1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SideSlot(usize);

impl SideSlot {
    /// Create the `n`th slot.  Returns `None` for `0` or any slot without a palette color.
    pub fn new(n: usize) -> Option<Self> {
        (1..=MAX_SIDES).contains(&n).then_some(Self(n))
    }

    /// The 1-based slot number
    pub fn number(self) -> usize {
        self.0
    }

    /// The 0-based index of this slot's material
    pub fn material_index(self) -> usize {
        self.0 - 1
    }

    pub fn color(self) -> Srgba {
        PALETTE[self.material_index()].1
    }
}

impl fmt::Display for SideSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "side {}", self.0)
    }
}

/// The material generated for a side slot
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub slot: SideSlot,
    pub name: String,
    pub color: Srgba,
}

/// Which side every triangle of a strip belongs to, along with one [`Material`] per side.
#[derive(Debug, Clone, PartialEq)]
pub struct SideAssignment {
    slots: FaceVec<SideSlot>,
    materials: Vec<Material>,
}

impl SideAssignment {
    pub fn slot(&self, face: FaceIdx) -> SideSlot {
        self.slots[face]
    }

    pub fn slots(&self) -> &[SideSlot] {
        self.slots.as_raw_slice()
    }

    /// The 0-based material index of every triangle, which is what most hosts expect
    pub fn material_indices(&self) -> Vec<usize> {
        self.slots.iter().map(|s| s.material_index()).collect()
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, face: FaceIdx) -> &Material {
        &self.materials[self.slot(face).material_index()]
    }

    /// The indices of every triangle on the given side, in emission order
    pub fn faces_on(&self, slot: SideSlot) -> impl Iterator<Item = FaceIdx> + '_ {
        self.slots
            .iter_enumerated()
            .filter(move |(_idx, s)| **s == slot)
            .map(|(idx, _s)| idx)
    }
}

/// Look up the fold-order table for a flexagon with `sides` sides.
pub fn face_order_table(sides: usize) -> FlexResult<&'static [u8]> {
    match sides {
        3 => Ok(&TRIHEXA_ORDER),
        6 => Ok(&HEXAHEXA_ORDER),
        _ if sides > MAX_SIDES => Err(FlexError::PaletteExhausted {
            requested: sides,
            available: MAX_SIDES,
        }),
        _ => Err(FlexError::unsupported_sides(sides)),
    }
}

/// Create the materials for `count` side slots, in slot order.
pub fn create_materials(count: usize) -> FlexResult<Vec<Material>> {
    if count > MAX_SIDES {
        return Err(FlexError::PaletteExhausted {
            requested: count,
            available: MAX_SIDES,
        });
    }
    let materials = PALETTE[..count]
        .iter()
        .enumerate()
        .map(|(i, &(color_name, color))| Material {
            slot: SideSlot(i + 1),
            name: format!("Side {} ({color_name})", i + 1),
            color,
        })
        .collect();
    Ok(materials)
}

/// Assign each of the `triangle_count` triangles of a strip to a side of a flexagon with
/// `sides` sides, creating one material per side.
pub fn assign_sides(triangle_count: usize, sides: usize) -> FlexResult<SideAssignment> {
    let order = face_order_table(sides)?;
    if order.len() != triangle_count {
        return Err(FlexError::InvalidParameter {
            name: "triangle_count",
            reason: format!(
                "a {sides}-sided flexagon has {} triangles, got {triangle_count}",
                order.len()
            ),
        });
    }
    let materials = create_materials(sides)?;
    let slots = order.iter().map(|&n| SideSlot(n as usize)).collect();
    Ok(SideAssignment { slots, materials })
}
