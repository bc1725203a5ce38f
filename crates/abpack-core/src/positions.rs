//! Chain/position labels for numbered antibody structures.
//!
//! Positions follow the antibody numbering convention used by the input
//! structures: a chain letter (`L` or `H`), a residue number and an optional
//! insertion letter carried verbatim (`H100A` is a position of its own,
//! distinct from `H100`).

use crate::encoding::FEATURE_LETTERS;
use crate::error::{PackError, Result};
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// The two Fv chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
pub enum Chain {
    L,
    H,
}

/// A numbered position on one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub chain: Chain,
    pub number: u16,
    pub insertion: Option<char>,
}

impl Position {
    pub fn new(chain: Chain, number: u16) -> Self {
        Self {
            chain,
            number,
            insertion: None,
        }
    }

    /// Builds a position from a chain and the residue-number field of a
    /// structural record, e.g. `"100A"`.
    pub fn from_chain_and_resnum(chain: Chain, resnum: &str) -> Result<Self> {
        let digits: String = resnum.chars().take_while(|c| c.is_ascii_digit()).collect();
        let rest = &resnum[digits.len()..];
        if digits.is_empty() {
            return Err(PackError::parse(format!(
                "residue number '{resnum}' has no numeric part"
            )));
        }
        let number: u16 = digits
            .parse()
            .map_err(|_| PackError::parse(format!("residue number '{resnum}' out of range")))?;
        let mut suffix = rest.chars();
        let insertion = match (suffix.next(), suffix.next()) {
            (None, _) => None,
            (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
            _ => {
                return Err(PackError::parse(format!(
                    "residue number '{resnum}' has an invalid insertion suffix"
                )))
            }
        };
        Ok(Self {
            chain,
            number,
            insertion,
        })
    }
}

impl FromStr for Position {
    type Err = PackError;

    /// Parses a full position token such as `L38` or `H100A`.
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let chain = match chars.next() {
            Some(c) => Chain::from_str(&c.to_ascii_uppercase().to_string())
                .map_err(|_| PackError::parse(format!("position '{s}' must start with L or H")))?,
            None => return Err(PackError::parse("empty position token")),
        };
        Position::from_chain_and_resnum(chain, chars.as_str())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chain, self.number)?;
        if let Some(ins) = self.insertion {
            write!(f, "{ins}")?;
        }
        Ok(())
    }
}

/// The ordered set of positions whose residues are encoded as features.
///
/// Order is significant: it fixes the column order of every table built from
/// the set. Duplicates are rejected at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSet {
    positions: Vec<Position>,
    index: HashMap<Position, usize>,
}

/// The interface positions used by the published packing-angle predictor.
#[rustfmt::skip]
const CLASSIC_POSITIONS: [(Chain, u16); 13] = [
    (Chain::L, 38), (Chain::L, 40), (Chain::L, 41),
    (Chain::L, 44), (Chain::L, 46), (Chain::L, 87),
    (Chain::H, 33), (Chain::H, 42), (Chain::H, 45),
    (Chain::H, 60), (Chain::H, 62), (Chain::H, 91),
    (Chain::H, 105),
];

impl PositionSet {
    pub fn new(positions: Vec<Position>) -> Result<Self> {
        let mut index = HashMap::with_capacity(positions.len());
        for (i, &p) in positions.iter().enumerate() {
            if index.insert(p, i).is_some() {
                return Err(PackError::parse(format!("duplicate position {p}")));
            }
        }
        Ok(Self { positions, index })
    }

    /// Parses a newline-delimited list of position tokens. Blank lines are
    /// ignored; order is preserved.
    pub fn from_lines(text: &str) -> Result<Self> {
        let positions = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Position::from_str)
            .collect::<Result<Vec<_>>>()?;
        if positions.is_empty() {
            return Err(PackError::parse("position list is empty"));
        }
        Self::new(positions)
    }

    /// The default interface set.
    pub fn classic() -> Self {
        let positions: Vec<Position> = CLASSIC_POSITIONS
            .iter()
            .map(|&(chain, number)| Position::new(chain, number))
            .collect();
        let index = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, i))
            .collect();
        Self { positions, index }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.index.contains_key(position)
    }

    /// The rank of a position within the set, which fixes its column block.
    pub fn index_of(&self, position: &Position) -> Option<usize> {
        self.index.get(position).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Position> {
        self.positions.get(index)
    }

    /// Column names for the encoded values, four per position, e.g.
    /// `L38a, L38b, L38c, L38d, L40a, ..`.
    pub fn position_columns(&self) -> Vec<String> {
        self.positions
            .iter()
            .flat_map(|p| FEATURE_LETTERS.iter().map(move |letter| format!("{p}{letter}")))
            .collect()
    }
}

/// The CDR loops whose observed lengths are carried as extra predictors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum CdrLoop {
    L1,
    H2,
    H3,
}

impl CdrLoop {
    pub const ALL: [CdrLoop; 3] = [CdrLoop::L1, CdrLoop::H2, CdrLoop::H3];

    pub const fn chain(self) -> Chain {
        match self {
            CdrLoop::L1 => Chain::L,
            CdrLoop::H2 | CdrLoop::H3 => Chain::H,
        }
    }

    pub const fn range(self) -> RangeInclusive<u16> {
        match self {
            CdrLoop::L1 => 24..=34,
            CdrLoop::H2 => 50..=58,
            CdrLoop::H3 => 95..=102,
        }
    }

    /// Whether a position falls inside the loop. Insertion-lettered
    /// positions count: `H100A` is inside H3 just as `H100` is.
    pub fn contains(self, position: &Position) -> bool {
        position.chain == self.chain() && self.range().contains(&position.number)
    }

    /// Name of the loop-length column, e.g. `L1_length`.
    pub fn column(self) -> String {
        format!("{self}_length")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_tokens_round_trip() {
        for token in ["L38", "H105", "H100A", "L30F"] {
            let p: Position = token.parse().unwrap();
            assert_eq!(p.to_string(), token);
        }
    }

    #[test]
    fn position_parsing_details() {
        let p: Position = "H100A".parse().unwrap();
        assert_eq!(p.chain, Chain::H);
        assert_eq!(p.number, 100);
        assert_eq!(p.insertion, Some('A'));

        let q: Position = "l38".parse().unwrap();
        assert_eq!(q, Position::new(Chain::L, 38));
    }

    #[test]
    fn bad_position_tokens_are_rejected() {
        for token in ["", "38", "Q38", "L", "LA", "H100AB", "H100!"] {
            assert!(token.parse::<Position>().is_err(), "{token:?} parsed");
        }
    }

    #[test]
    fn set_preserves_order_and_rejects_duplicates() {
        let set = PositionSet::from_lines("L38\nH33\n\nL40\n").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(0), Some(&"L38".parse().unwrap()));
        assert_eq!(set.index_of(&"H33".parse().unwrap()), Some(1));
        assert!(set.contains(&"L40".parse().unwrap()));
        assert!(!set.contains(&"L41".parse().unwrap()));

        assert!(PositionSet::from_lines("L38\nL38\n").is_err());
        assert!(PositionSet::from_lines("\n\n").is_err());
    }

    #[test]
    fn classic_set_has_thirteen_positions() {
        let set = PositionSet::classic();
        assert_eq!(set.len(), 13);
        assert!(set.contains(&"L87".parse().unwrap()));
        assert!(set.contains(&"H105".parse().unwrap()));
    }

    #[test]
    fn position_columns_follow_set_order() {
        let set = PositionSet::from_lines("L38\nH33").unwrap();
        assert_eq!(
            set.position_columns(),
            vec!["L38a", "L38b", "L38c", "L38d", "H33a", "H33b", "H33c", "H33d"]
        );
    }

    #[test]
    fn loop_membership() {
        assert!(CdrLoop::L1.contains(&"L24".parse().unwrap()));
        assert!(CdrLoop::L1.contains(&"L34".parse().unwrap()));
        assert!(CdrLoop::L1.contains(&"L30A".parse().unwrap()));
        assert!(!CdrLoop::L1.contains(&"L35".parse().unwrap()));
        assert!(!CdrLoop::L1.contains(&"H24".parse().unwrap()));

        assert!(CdrLoop::H3.contains(&"H100A".parse().unwrap()));
        assert!(CdrLoop::H3.contains(&"H95".parse().unwrap()));
        assert!(!CdrLoop::H3.contains(&"H94".parse().unwrap()));
        assert!(!CdrLoop::H3.contains(&"H103".parse().unwrap()));

        assert_eq!(CdrLoop::H2.column(), "H2_length");
    }
}
