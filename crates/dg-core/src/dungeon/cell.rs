//! Grid cell states

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// What occupies a grid cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    /// Undiscovered solid space
    #[default]
    None = 0,
    Room = 1,
    Hallway = 2,
}

impl CellType {
    /// Room and hallway cells carry a floor; everything else is solid
    pub const fn is_floor(&self) -> bool {
        matches!(self, CellType::Room | CellType::Hallway)
    }

    /// Display character for ASCII dumps
    pub const fn symbol(&self) -> char {
        match self {
            CellType::None => ' ',
            CellType::Room => '.',
            CellType::Hallway => '#',
        }
    }
}
