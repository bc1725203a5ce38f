//! Residue identities and their 4-D physicochemical encoding.
//!
//! Every residue maps to four numbers: side-chain atom count, side-chain
//! compactness, Eisenberg hydrophobicity and formal charge. The values are
//! fixed lookup tables; `X` is the placeholder identity for non-standard
//! residues and carries its own row in each table.

use crate::error::{PackError, Result};
use strum::{Display, EnumIter, EnumString};

/// Suffix letters for the four encoded values, in the order produced by
/// [`AminoAcid::encode`]: `a` = side-chain atoms, `b` = compactness,
/// `c` = hydrophobicity, `d` = charge.
pub const FEATURE_LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];

/// The twenty standard amino acids plus the `X` placeholder.
///
/// `FromStr` accepts the three-letter codes (`ALA`, .., `VAL`, and
/// `XAA`/`UNK` for the placeholder); [`AminoAcid::from_code3`] is the
/// case-insensitive front door for structural records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum AminoAcid {
    #[strum(serialize = "ALA")]
    Ala,
    #[strum(serialize = "ARG")]
    Arg,
    #[strum(serialize = "ASN")]
    Asn,
    #[strum(serialize = "ASP")]
    Asp,
    #[strum(serialize = "CYS")]
    Cys,
    #[strum(serialize = "GLN")]
    Gln,
    #[strum(serialize = "GLU")]
    Glu,
    #[strum(serialize = "GLY")]
    Gly,
    #[strum(serialize = "HIS")]
    His,
    #[strum(serialize = "ILE")]
    Ile,
    #[strum(serialize = "LEU")]
    Leu,
    #[strum(serialize = "LYS")]
    Lys,
    #[strum(serialize = "MET")]
    Met,
    #[strum(serialize = "PHE")]
    Phe,
    #[strum(serialize = "PRO")]
    Pro,
    #[strum(serialize = "SER")]
    Ser,
    #[strum(serialize = "THR")]
    Thr,
    #[strum(serialize = "TRP")]
    Trp,
    #[strum(serialize = "TYR")]
    Tyr,
    #[strum(serialize = "VAL")]
    Val,
    #[strum(to_string = "UNK", serialize = "XAA")]
    Unk,
}

impl AminoAcid {
    /// Parses a three-letter residue code, case-insensitively.
    pub fn from_code3(code: &str) -> Result<Self> {
        code.to_ascii_uppercase()
            .parse()
            .map_err(|_| PackError::UnknownResidueCode(code.to_string()))
    }

    /// Parses a one-letter identity (`A`..`Y`, `X`).
    #[rustfmt::skip]
    pub fn from_code1(code: char) -> Result<Self> {
        match code {
            'A' => Ok(Self::Ala), 'R' => Ok(Self::Arg), 'N' => Ok(Self::Asn),
            'D' => Ok(Self::Asp), 'C' => Ok(Self::Cys), 'Q' => Ok(Self::Gln),
            'E' => Ok(Self::Glu), 'G' => Ok(Self::Gly), 'H' => Ok(Self::His),
            'I' => Ok(Self::Ile), 'L' => Ok(Self::Leu), 'K' => Ok(Self::Lys),
            'M' => Ok(Self::Met), 'F' => Ok(Self::Phe), 'P' => Ok(Self::Pro),
            'S' => Ok(Self::Ser), 'T' => Ok(Self::Thr), 'W' => Ok(Self::Trp),
            'Y' => Ok(Self::Tyr), 'V' => Ok(Self::Val), 'X' => Ok(Self::Unk),
            other => Err(PackError::UnknownResidueCode(other.to_string())),
        }
    }

    #[rustfmt::skip]
    pub const fn code1(self) -> char {
        match self {
            Self::Ala => 'A', Self::Arg => 'R', Self::Asn => 'N',
            Self::Asp => 'D', Self::Cys => 'C', Self::Gln => 'Q',
            Self::Glu => 'E', Self::Gly => 'G', Self::His => 'H',
            Self::Ile => 'I', Self::Leu => 'L', Self::Lys => 'K',
            Self::Met => 'M', Self::Phe => 'F', Self::Pro => 'P',
            Self::Ser => 'S', Self::Thr => 'T', Self::Trp => 'W',
            Self::Tyr => 'Y', Self::Val => 'V', Self::Unk => 'X',
        }
    }

    /// Number of heavy atoms in the side chain (`a` column).
    #[rustfmt::skip]
    pub const fn sidechain_atoms(self) -> f64 {
        match self {
            Self::Ala => 1.0,  Self::Arg => 7.0,  Self::Asn => 4.0,
            Self::Asp => 4.0,  Self::Cys => 2.0,  Self::Gln => 5.0,
            Self::Glu => 5.0,  Self::Gly => 0.0,  Self::His => 6.0,
            Self::Ile => 4.0,  Self::Leu => 4.0,  Self::Lys => 15.0,
            Self::Met => 4.0,  Self::Phe => 7.0,  Self::Pro => 4.0,
            Self::Ser => 2.0,  Self::Thr => 3.0,  Self::Trp => 10.0,
            Self::Tyr => 8.0,  Self::Val => 3.0,  Self::Unk => 10.375,
        }
    }

    /// Side-chain branching/compactness score (`b` column).
    #[rustfmt::skip]
    pub const fn compactness(self) -> f64 {
        match self {
            Self::Ala => 1.0,  Self::Arg => 6.0,  Self::Asn => 3.0,
            Self::Asp => 3.0,  Self::Cys => 2.0,  Self::Gln => 4.0,
            Self::Glu => 4.0,  Self::Gly => 0.0,  Self::His => 4.0,
            Self::Ile => 3.0,  Self::Leu => 3.0,  Self::Lys => 6.0,
            Self::Met => 4.0,  Self::Phe => 5.0,  Self::Pro => 2.0,
            Self::Ser => 2.0,  Self::Thr => 2.0,  Self::Trp => 6.0,
            Self::Tyr => 6.0,  Self::Val => 2.0,  Self::Unk => 4.45,
        }
    }

    /// Eisenberg consensus hydrophobicity (`c` column).
    #[rustfmt::skip]
    pub const fn hydrophobicity(self) -> f64 {
        match self {
            Self::Ala => 0.25,  Self::Arg => -1.8,  Self::Asn => -0.64,
            Self::Asp => -0.72, Self::Cys => 0.04,  Self::Gln => -0.69,
            Self::Glu => -0.62, Self::Gly => 0.16,  Self::His => -0.4,
            Self::Ile => 0.73,  Self::Leu => 0.53,  Self::Lys => -1.1,
            Self::Met => 0.26,  Self::Phe => 0.61,  Self::Pro => -0.07,
            Self::Ser => -0.26, Self::Thr => -0.18, Self::Trp => 0.37,
            Self::Tyr => 0.02,  Self::Val => 0.54,  Self::Unk => -0.5,
        }
    }

    /// Formal side-chain charge at physiological pH (`d` column);
    /// half a charge for histidine.
    #[rustfmt::skip]
    pub const fn charge(self) -> f64 {
        match self {
            Self::Asp => -1.0, Self::Glu => -1.0,
            Self::Lys => 1.0,  Self::Arg => 1.0,
            Self::His => 0.5,
            _ => 0.0,
        }
    }

    /// The full 4-D feature vector, ordered as [`FEATURE_LETTERS`].
    pub const fn encode(self) -> [f64; 4] {
        [
            self.sidechain_atoms(),
            self.compactness(),
            self.hydrophobicity(),
            self.charge(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_identity_encodes_to_finite_values() {
        for aa in AminoAcid::iter() {
            let enc = aa.encode();
            assert_eq!(enc.len(), 4);
            assert!(enc.iter().all(|v| v.is_finite()), "{aa} produced non-finite values");
        }
    }

    #[test]
    fn one_letter_codes_round_trip() {
        for aa in AminoAcid::iter() {
            assert_eq!(AminoAcid::from_code1(aa.code1()).unwrap(), aa);
        }
    }

    #[test]
    fn three_letter_codes_parse() {
        assert_eq!(AminoAcid::from_code3("ALA").unwrap(), AminoAcid::Ala);
        assert_eq!(AminoAcid::from_code3("gln").unwrap(), AminoAcid::Gln);
        assert_eq!(AminoAcid::from_code3("UNK").unwrap(), AminoAcid::Unk);
        assert_eq!(AminoAcid::from_code3("XAA").unwrap(), AminoAcid::Unk);
    }

    #[test]
    fn nonstandard_codes_are_rejected() {
        let err = AminoAcid::from_code3("PCA").unwrap_err();
        assert_eq!(err, PackError::UnknownResidueCode("PCA".to_string()));
        assert!(AminoAcid::from_code1('Z').is_err());
        assert!(AminoAcid::from_code1('a').is_err());
    }

    #[test]
    fn known_encodings() {
        assert_eq!(AminoAcid::Gln.encode(), [5.0, 4.0, -0.69, 0.0]);
        assert_eq!(AminoAcid::Tyr.encode(), [8.0, 6.0, 0.02, 0.0]);
        assert_eq!(AminoAcid::Gly.encode(), [0.0, 0.0, 0.16, 0.0]);
        assert_eq!(AminoAcid::Unk.encode(), [10.375, 4.45, -0.5, 0.0]);
    }

    #[test]
    fn charges() {
        assert_eq!(AminoAcid::Asp.charge(), -1.0);
        assert_eq!(AminoAcid::Glu.charge(), -1.0);
        assert_eq!(AminoAcid::Lys.charge(), 1.0);
        assert_eq!(AminoAcid::Arg.charge(), 1.0);
        assert_eq!(AminoAcid::His.charge(), 0.5);
        assert_eq!(AminoAcid::Ser.charge(), 0.0);
    }

    #[test]
    fn encodings_are_distinct_across_the_alphabet() {
        let all: Vec<[f64; 4]> = AminoAcid::iter().map(|aa| aa.encode()).collect();
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
