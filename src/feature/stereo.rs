use std::fmt;

/// Directional mark on a single bond, written `/` (up) or `\` (down)
/// relative to the bond's source atom.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Stereo {
    Up,
    Down,
}

impl Stereo {
    /// The mark as seen from the opposite end of the bond.
    pub const fn flipped(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    pub const fn token(&self) -> char {
        match self {
            Self::Up => '/',
            Self::Down => '\\',
        }
    }
}

impl fmt::Display for Stereo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
