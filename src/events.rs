use std::fmt;
use std::str::FromStr;

/// Which way a navigation control moves the slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    pub const ALL: [Self; 2] = [Self::Prev, Self::Next];

    /// Signed offset applied to the slide index (-1 / +1).
    pub const fn delta(self) -> isize {
        match self {
            Self::Prev => -1,
            Self::Next => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prev => "prev",
            Self::Next => "next",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "prev" | "-1" => Ok(Self::Prev),
            "next" | "+1" | "1" => Ok(Self::Next),
            other => Err(format!("unknown direction '{other}' (expected prev or next)")),
        }
    }
}

/// One activation of a navigation control, already resolved to its gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavClick {
    pub gallery: usize,
    pub direction: Direction,
}

impl NavClick {
    pub const fn new(gallery: usize, direction: Direction) -> Self {
        Self { gallery, direction }
    }
}

/// Parses the `ID:DIR` form used by the CLI, e.g. `0:next`.
impl FromStr for NavClick {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (id, dir) = raw
            .split_once(':')
            .ok_or_else(|| format!("expected ID:DIR, got '{raw}'"))?;
        let gallery = id
            .trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid slideshow id '{id}': {err}"))?;
        Ok(Self::new(gallery, dir.parse()?))
    }
}

/// Emitted after a navigation swapped the visible slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChanged {
    pub gallery: usize,
    pub from: usize,
    pub to: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_click_spec() {
        let click: NavClick = "1:prev".parse().unwrap();
        assert_eq!(click, NavClick::new(1, Direction::Prev));
        let click: NavClick = " 0 : NEXT".parse().unwrap();
        assert_eq!(click, NavClick::new(0, Direction::Next));
    }

    #[test]
    fn rejects_malformed_click_spec() {
        assert!("next".parse::<NavClick>().is_err());
        assert!("x:next".parse::<NavClick>().is_err());
        assert!("0:up".parse::<NavClick>().is_err());
    }
}
