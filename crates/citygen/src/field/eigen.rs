//! Direction classes: which of the two principal directions a streamline follows.
use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the two perpendicular eigenvector families of a tensor field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Eigenfield {
    Minor,
    Major,
}

impl Eigenfield {
    pub const COUNT: usize = 2;
    pub const ALL: [Eigenfield; Eigenfield::COUNT] = [Eigenfield::Minor, Eigenfield::Major];

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Eigenfield::Major => Eigenfield::Minor,
            Eigenfield::Minor => Eigenfield::Major,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn mask(self) -> EigenfieldMask {
        EigenfieldMask(1 << self.index())
    }
}

/// Bit set over [`Eigenfield`]s, used by the spatial index for pruning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EigenfieldMask(u8);

impl EigenfieldMask {
    pub const NONE: EigenfieldMask = EigenfieldMask(0);
    pub const ALL: EigenfieldMask = EigenfieldMask(0b11);

    #[inline]
    pub fn intersects(self, other: EigenfieldMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn contains(self, ef: Eigenfield) -> bool {
        self.intersects(ef.mask())
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl From<Eigenfield> for EigenfieldMask {
    fn from(ef: Eigenfield) -> Self {
        ef.mask()
    }
}

impl BitOr for EigenfieldMask {
    type Output = EigenfieldMask;

    fn bitor(self, rhs: EigenfieldMask) -> EigenfieldMask {
        EigenfieldMask(self.0 | rhs.0)
    }
}

impl BitOr for Eigenfield {
    type Output = EigenfieldMask;

    fn bitor(self, rhs: Eigenfield) -> EigenfieldMask {
        self.mask() | rhs.mask()
    }
}

impl BitOrAssign for EigenfieldMask {
    fn bitor_assign(&mut self, rhs: EigenfieldMask) {
        self.0 |= rhs.0;
    }
}
