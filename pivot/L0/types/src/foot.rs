//! Feet and dancers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// The foot a step starts on.
///
/// Step clips are named by the foot that moves first and the foot that
/// carries the weight afterwards, e.g. `step forward L to R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Foot {
    /// Left foot (`L`).
    #[default]
    #[serde(rename = "L")]
    Left,
    /// Right foot (`R`).
    #[serde(rename = "R")]
    Right,
}

impl Foot {
    /// The other foot.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Single-letter name used in step clip names.
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }

    /// Word used in pose clip names (`stand on left foot`).
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Foot a step or pose description ends on, if the text says.
    ///
    /// Recognizes `L to R`, `R to L`, `on right` and `on left` anywhere in
    /// the text, in that order of precedence.
    ///
    /// ```
    /// use pivot_types::Foot;
    ///
    /// assert_eq!(Foot::ending_in("step forward L to R"), Some(Foot::Right));
    /// assert_eq!(Foot::ending_in("stand on left foot"), Some(Foot::Left));
    /// assert_eq!(Foot::ending_in("embrace man"), None);
    /// ```
    #[must_use]
    pub fn ending_in(text: &str) -> Option<Self> {
        if text.contains("L to R") {
            Some(Self::Right)
        } else if text.contains("R to L") {
            Some(Self::Left)
        } else if text.contains("on right") {
            Some(Self::Right)
        } else if text.contains("on left") {
            Some(Self::Left)
        } else {
            None
        }
    }
}

impl fmt::Display for Foot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for Foot {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" | "left" | "Left" => Ok(Self::Left),
            "R" | "r" | "right" | "Right" => Ok(Self::Right),
            other => Err(TypesError::UnknownFoot(other.to_string())),
        }
    }
}

/// One of the two partnered figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dancer {
    /// The leading figure.
    Man,
    /// The following figure.
    Woman,
}

impl Dancer {
    /// Both dancers, leader first.
    pub const ALL: [Self; 2] = [Self::Man, Self::Woman];

    /// Nickname used in step files and logs.
    #[must_use]
    pub const fn nickname(self) -> &'static str {
        match self {
            Self::Man => "man",
            Self::Woman => "woman",
        }
    }

    /// The other dancer of the couple.
    #[must_use]
    pub const fn partner(self) -> Self {
        match self {
            Self::Man => Self::Woman,
            Self::Woman => Self::Man,
        }
    }
}

impl fmt::Display for Dancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nickname())
    }
}

impl FromStr for Dancer {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "man" => Ok(Self::Man),
            "woman" => Ok(Self::Woman),
            other => Err(TypesError::UnknownDancer(other.to_string())),
        }
    }
}

/// Which figures a step-file row applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DancerSelector {
    /// Only the man.
    Man,
    /// Only the woman.
    Woman,
    /// Man first, then woman, with the same row.
    Both,
}

impl DancerSelector {
    /// Dancers addressed by this selector, in dispatch order.
    #[must_use]
    pub const fn dancers(self) -> &'static [Dancer] {
        match self {
            Self::Man => &[Dancer::Man],
            Self::Woman => &[Dancer::Woman],
            Self::Both => &Dancer::ALL,
        }
    }
}

impl FromStr for DancerSelector {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "man" => Ok(Self::Man),
            "woman" => Ok(Self::Woman),
            "both" => Ok(Self::Both),
            other => Err(TypesError::UnknownSelector(other.to_string())),
        }
    }
}

impl From<Dancer> for DancerSelector {
    fn from(dancer: Dancer) -> Self {
        match dancer {
            Dancer::Man => Self::Man,
            Dancer::Woman => Self::Woman,
        }
    }
}
