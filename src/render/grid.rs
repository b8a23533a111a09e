//! Column counts for the multi-image grid

use serde::Serialize;

/// Number of columns in an image grid.
///
/// Closed set so every variant maps to a class name known ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum GridColumns {
    One,
    Two,
    Three,
    #[default]
    Four,
}

impl GridColumns {
    pub const ALL: [GridColumns; 4] = [
        GridColumns::One,
        GridColumns::Two,
        GridColumns::Three,
        GridColumns::Four,
    ];

    /// Resolve a requested count, falling back to four columns
    pub fn from_count(count: i64) -> Self {
        match count {
            1 => GridColumns::One,
            2 => GridColumns::Two,
            3 => GridColumns::Three,
            _ => GridColumns::Four,
        }
    }

    /// Resolve a raw attribute value such as `2`, `"3"` or `{4}`
    pub fn from_attr(value: Option<&str>) -> Self {
        value
            .map(|v| v.trim().trim_matches(|c| c == '{' || c == '}' || c == '"'))
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(Self::from_count)
            .unwrap_or_default()
    }

    pub fn count(self) -> usize {
        match self {
            GridColumns::One => 1,
            GridColumns::Two => 2,
            GridColumns::Three => 3,
            GridColumns::Four => 4,
        }
    }

    /// Static presentation class for this column count
    pub fn class(self) -> &'static str {
        match self {
            GridColumns::One => "grid-cols-1",
            GridColumns::Two => "grid-cols-2",
            GridColumns::Three => "grid-cols-3",
            GridColumns::Four => "grid-cols-4",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_counts() {
        for n in 1..=4 {
            assert_eq!(GridColumns::from_count(n).count(), n as usize);
        }
    }

    #[test]
    fn test_invalid_counts_fall_back() {
        for n in [0, 5, -1, 12] {
            assert_eq!(GridColumns::from_count(n), GridColumns::Four);
        }
    }

    #[test]
    fn test_from_attr() {
        assert_eq!(GridColumns::from_attr(Some("2")), GridColumns::Two);
        assert_eq!(GridColumns::from_attr(Some("{3}")), GridColumns::Three);
        assert_eq!(GridColumns::from_attr(Some(" 1 ")), GridColumns::One);
        assert_eq!(GridColumns::from_attr(Some("abc")), GridColumns::Four);
        assert_eq!(GridColumns::from_attr(Some("0")), GridColumns::Four);
        assert_eq!(GridColumns::from_attr(Some("5")), GridColumns::Four);
        assert_eq!(GridColumns::from_attr(None), GridColumns::Four);
    }

    #[test]
    fn test_classes_are_distinct() {
        let classes: Vec<_> = GridColumns::ALL.iter().map(|c| c.class()).collect();
        assert_eq!(
            classes,
            vec!["grid-cols-1", "grid-cols-2", "grid-cols-3", "grid-cols-4"]
        );
    }
}
