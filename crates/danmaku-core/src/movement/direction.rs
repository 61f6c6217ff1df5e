//! L4 Atomic Layer: Traversal direction and its sign conventions
//!
//! Start/resume and pause use different sign rules. Each is tied to the
//! coordinate origin of the inset the item is anchored to, so they are kept
//! as two separate functions.

use serde::{Deserialize, Serialize};

use crate::render::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
    /// Not anchored to an inset; the timeline is only a visibility timer
    None,
}

impl Direction {
    /// Inset property anchoring the item, if any
    #[inline]
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
            Self::None => None,
        }
    }

    /// Sign applied to the exit distance when a transition is requested
    /// (`start` and `resume`)
    #[inline]
    pub fn travel_sign(&self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right | Self::None => -1.0,
        }
    }

    /// Sign applied to the traveled distance when freezing on `pause`
    #[inline]
    pub fn pause_sign(&self) -> f64 {
        match self {
            Self::Right => -1.0,
            Self::Left | Self::None => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::None => "none",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "none" => Ok(Self::None),
            other => Err(crate::Error::Config(format!("unknown direction '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides() {
        assert_eq!(Direction::Left.side(), Some(Side::Left));
        assert_eq!(Direction::Right.side(), Some(Side::Right));
        assert_eq!(Direction::None.side(), None);
    }

    #[test]
    fn test_signs() {
        assert_eq!(Direction::Left.travel_sign(), 1.0);
        assert_eq!(Direction::Right.travel_sign(), -1.0);
        assert_eq!(Direction::Right.pause_sign(), -1.0);
        assert_eq!(Direction::Left.pause_sign(), 1.0);
        assert_eq!(Direction::None.travel_sign(), -1.0);
        assert_eq!(Direction::None.pause_sign(), 1.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("left".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("none".parse::<Direction>().unwrap(), Direction::None);
        assert!("up".parse::<Direction>().is_err());
        assert_eq!(Direction::default(), Direction::Right);
    }
}
