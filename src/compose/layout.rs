use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Columns-by-rows arrangement used to tile photos into one composite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridLayout {
    #[serde(rename = "1x1")]
    OneByOne,
    #[serde(rename = "1x2")]
    OneByTwo,
    #[serde(rename = "1x3")]
    OneByThree,
    #[serde(rename = "2x1")]
    TwoByOne,
    #[serde(rename = "2x2")]
    TwoByTwo,
    #[serde(rename = "2x3")]
    TwoByThree,
    #[serde(rename = "3x1")]
    ThreeByOne,
    #[serde(rename = "3x2")]
    ThreeByTwo,
    #[serde(rename = "3x3")]
    ThreeByThree,
}

impl GridLayout {
    /// All selectable layouts, in enumeration order
    pub const ALL: [GridLayout; 9] = [
        GridLayout::OneByOne,
        GridLayout::OneByTwo,
        GridLayout::OneByThree,
        GridLayout::TwoByOne,
        GridLayout::TwoByTwo,
        GridLayout::TwoByThree,
        GridLayout::ThreeByOne,
        GridLayout::ThreeByTwo,
        GridLayout::ThreeByThree,
    ];

    pub fn columns(&self) -> u32 {
        match self {
            GridLayout::OneByOne | GridLayout::OneByTwo | GridLayout::OneByThree => 1,
            GridLayout::TwoByOne | GridLayout::TwoByTwo | GridLayout::TwoByThree => 2,
            GridLayout::ThreeByOne | GridLayout::ThreeByTwo | GridLayout::ThreeByThree => 3,
        }
    }

    pub fn rows(&self) -> u32 {
        match self {
            GridLayout::OneByOne | GridLayout::TwoByOne | GridLayout::ThreeByOne => 1,
            GridLayout::OneByTwo | GridLayout::TwoByTwo | GridLayout::ThreeByTwo => 2,
            GridLayout::OneByThree | GridLayout::TwoByThree | GridLayout::ThreeByThree => 3,
        }
    }

    /// Maximum number of photos this layout can hold
    pub fn capacity(&self) -> u32 {
        self.columns() * self.rows()
    }

    /// All layouts whose capacity covers the requested photo count
    pub fn suitable_layouts(photo_count: u32) -> Vec<GridLayout> {
        Self::ALL
            .iter()
            .copied()
            .filter(|layout| layout.capacity() >= photo_count)
            .collect()
    }

    /// Smallest layout on the default ladder that fits the photo count
    ///
    /// The ladder prefers single-column strips for up to three photos, then
    /// widens: 1x1, 1x2, 1x3, 2x2, 2x3, 3x3.
    pub fn best_layout(photo_count: u32) -> GridLayout {
        match photo_count {
            0 | 1 => GridLayout::OneByOne,
            2 => GridLayout::OneByTwo,
            3 => GridLayout::OneByThree,
            4 => GridLayout::TwoByTwo,
            5 | 6 => GridLayout::TwoByThree,
            _ => GridLayout::ThreeByThree,
        }
    }
}

impl fmt::Display for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns(), self.rows())
    }
}

impl FromStr for GridLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|layout| layout.to_string() == s.trim())
            .ok_or_else(|| ConfigError::UnknownLayout {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity() {
        assert_eq!(GridLayout::OneByOne.capacity(), 1);
        assert_eq!(GridLayout::TwoByThree.capacity(), 6);
        assert_eq!(GridLayout::ThreeByThree.capacity(), 9);
    }

    #[test]
    fn test_suitable_layouts_respect_capacity() {
        let suitable = GridLayout::suitable_layouts(7);
        assert!(!suitable.contains(&GridLayout::TwoByThree));
        assert!(suitable.contains(&GridLayout::ThreeByThree));
        for layout in suitable {
            assert!(layout.capacity() >= 7);
        }

        // everything fits a single photo
        assert_eq!(GridLayout::suitable_layouts(1).len(), 9);
    }

    #[test]
    fn test_best_layout_ladder() {
        assert_eq!(GridLayout::best_layout(1), GridLayout::OneByOne);
        assert_eq!(GridLayout::best_layout(2), GridLayout::OneByTwo);
        assert_eq!(GridLayout::best_layout(3), GridLayout::OneByThree);
        assert_eq!(GridLayout::best_layout(4), GridLayout::TwoByTwo);
        assert_eq!(GridLayout::best_layout(5), GridLayout::TwoByThree);
        assert_eq!(GridLayout::best_layout(6), GridLayout::TwoByThree);
        assert_eq!(GridLayout::best_layout(9), GridLayout::ThreeByThree);
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        for layout in GridLayout::ALL {
            assert_eq!(layout.to_string().parse::<GridLayout>().unwrap(), layout);
        }
        assert!("4x4".parse::<GridLayout>().is_err());
    }
}
