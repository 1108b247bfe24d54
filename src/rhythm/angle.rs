use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Angle value that marks a mid-spin tile in level data.
pub const MIDSPIN_ANGLE: f64 = 999.0;

/// One tile of the path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Tile {
    /// Direction of the tile in degrees, counter-clockwise from east.
    Angle(f64),
    /// Mid-spin tile; its floor angle is taken from the tile before it.
    MidSpin,
}

impl Tile {
    pub fn from_degrees(degrees: f64) -> Self {
        if degrees == MIDSPIN_ANGLE {
            Tile::MidSpin
        } else {
            Tile::Angle(degrees)
        }
    }

    pub fn is_midspin(&self) -> bool {
        matches!(self, Tile::MidSpin)
    }
}

/// Angle of a single path symbol.
pub fn symbol_to_tile(symbol: char) -> Option<Tile> {
    let degrees = match symbol {
        'R' => 0.0,
        'p' => 15.0,
        'J' => 30.0,
        'E' => 45.0,
        'T' => 60.0,
        'U' => 90.0,
        'G' => 120.0,
        'Q' => 135.0,
        'H' => 150.0,
        'W' => 165.0,
        'L' => 180.0,
        'V' => -165.0,
        'N' => -150.0,
        'Z' => -135.0,
        'F' => -120.0,
        'D' => -90.0,
        'B' => -60.0,
        'C' => -45.0,
        'M' => -30.0,
        'A' => -15.0,
        '!' => return Some(Tile::MidSpin),
        _ => return None,
    };
    Some(Tile::Angle(degrees))
}

/// Translate a symbolic path into tiles. Any unknown symbol fails the whole
/// path; skipping it would shift every later tile.
pub fn path_to_angles(path: &str) -> Result<Vec<Tile>, ParseError> {
    path.chars()
        .enumerate()
        .map(|(index, symbol)| {
            symbol_to_tile(symbol).ok_or(ParseError::UnknownSymbol { symbol, index })
        })
        .collect()
}

/// Wrap a turn into `(0, 360]`. Whole turns map to 360, never 0, so every
/// transition takes time.
pub fn normalize_degree(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped == 0.0 { 360.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SYMBOLS: &str = "RpJETUGQHWLVNZFDBCMA";

    #[test]
    fn test_path_to_angles() {
        let tiles = path_to_angles("RULD").unwrap();
        assert_eq!(
            tiles,
            vec![
                Tile::Angle(0.0),
                Tile::Angle(90.0),
                Tile::Angle(180.0),
                Tile::Angle(-90.0)
            ]
        );
    }

    #[test]
    fn test_midspin_symbol() {
        assert_eq!(path_to_angles("R!U").unwrap()[1], Tile::MidSpin);
    }

    #[test]
    fn test_unknown_symbol_fails() {
        assert_eq!(
            path_to_angles("RRxR"),
            Err(ParseError::UnknownSymbol {
                symbol: 'x',
                index: 2
            })
        );
    }

    #[test]
    fn test_every_symbol_is_multiple_of_15() {
        let tiles = path_to_angles(SYMBOLS).unwrap();
        let mut seen = Vec::new();
        for tile in tiles {
            let Tile::Angle(deg) = tile else {
                panic!("directional symbol resolved to mid-spin");
            };
            assert_eq!(deg % 15.0, 0.0);
            assert!((-165.0..=180.0).contains(&deg));
            assert!(!seen.contains(&deg), "duplicate angle {deg}");
            seen.push(deg);
        }
    }

    #[test]
    fn test_from_degrees_sentinel() {
        assert_eq!(Tile::from_degrees(999.0), Tile::MidSpin);
        assert_eq!(Tile::from_degrees(45.0), Tile::Angle(45.0));
    }

    #[test]
    fn test_normalize_degree_edges() {
        assert_eq!(normalize_degree(360.0), 360.0);
        assert_eq!(normalize_degree(0.0), 360.0);
        assert_eq!(normalize_degree(-15.0), 345.0);
        assert_eq!(normalize_degree(-360.0), 360.0);
        assert_eq!(normalize_degree(450.0), 90.0);
    }

    proptest! {
        #[test]
        fn normalize_degree_in_range(d in -100_000i64..100_000) {
            let n = normalize_degree(d as f64);
            prop_assert!(n > 0.0 && n <= 360.0);
        }

        #[test]
        fn unmapped_symbols_always_fail(c in any::<char>()) {
            prop_assume!(!SYMBOLS.contains(c) && c != '!');
            let is_unknown_symbol = matches!(
                path_to_angles(&c.to_string()),
                Err(ParseError::UnknownSymbol { .. })
            );
            prop_assert!(is_unknown_symbol);
        }
    }
}
