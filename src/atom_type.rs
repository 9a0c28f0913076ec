//! XScore-style heavy-atom classification (`xs_type`) and the PDBQT atom-type-code
//! table used to assign it during parsing.

use std::collections::HashMap;

use crate::constants::XS_N;

/// One of the `XS_N` XScore-style atom classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum XsType {
    CHydrophobic = 0,
    CPolar = 1,
    NPolar = 2,
    NDonor = 3,
    NAcceptor = 4,
    NDonorAcceptor = 5,
    OPolar = 6,
    ODonor = 7,
    OAcceptor = 8,
    ODonorAcceptor = 9,
    SPolar = 10,
    PPolar = 11,
    FHydrophobic = 12,
    ClHydrophobic = 13,
    BrIHydrophobic = 14,
}

pub const ALL_XS_TYPES: [XsType; XS_N] = [
    XsType::CHydrophobic,
    XsType::CPolar,
    XsType::NPolar,
    XsType::NDonor,
    XsType::NAcceptor,
    XsType::NDonorAcceptor,
    XsType::OPolar,
    XsType::ODonor,
    XsType::OAcceptor,
    XsType::ODonorAcceptor,
    XsType::SPolar,
    XsType::PPolar,
    XsType::FHydrophobic,
    XsType::ClHydrophobic,
    XsType::BrIHydrophobic,
];

impl XsType {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> XsType {
        ALL_XS_TYPES[i]
    }

    /// Van der Waals radius, in Angstrom, from the fixed per-type table.
    pub fn vdw_radius(self) -> f64 {
        VDW_RADII[self.index()]
    }

    pub fn is_hydrophobic(self) -> bool {
        HYDROPHOBIC[self.index()]
    }

    pub fn is_donor(self) -> bool {
        DONOR[self.index()]
    }

    pub fn is_acceptor(self) -> bool {
        ACCEPTOR[self.index()]
    }

    /// Coarse element, used by the RF-Score contact descriptor, which groups
    /// by element rather than by the finer XS class.
    pub fn element(self) -> Element {
        match self {
            XsType::CHydrophobic | XsType::CPolar => Element::Carbon,
            XsType::NPolar | XsType::NDonor | XsType::NAcceptor | XsType::NDonorAcceptor => {
                Element::Nitrogen
            }
            XsType::OPolar | XsType::ODonor | XsType::OAcceptor | XsType::ODonorAcceptor => {
                Element::Oxygen
            }
            XsType::SPolar => Element::Sulfur,
            XsType::PPolar => Element::Phosphorus,
            XsType::FHydrophobic => Element::Halogen,
            XsType::ClHydrophobic => Element::Halogen,
            XsType::BrIHydrophobic => Element::Halogen,
        }
    }
}

/// Coarse element grouping used only for the RF-Score descriptor (6 ligand classes
/// x 6 receptor classes = 36 features).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Carbon,
    Nitrogen,
    Oxygen,
    Sulfur,
    Phosphorus,
    Halogen,
}

pub const ALL_ELEMENTS: [Element; 6] = [
    Element::Carbon,
    Element::Nitrogen,
    Element::Oxygen,
    Element::Sulfur,
    Element::Phosphorus,
    Element::Halogen,
];

impl Element {
    pub fn index(self) -> usize {
        match self {
            Element::Carbon => 0,
            Element::Nitrogen => 1,
            Element::Oxygen => 2,
            Element::Sulfur => 3,
            Element::Phosphorus => 4,
            Element::Halogen => 5,
        }
    }
}

const VDW_RADII: [f64; XS_N] = [
    1.9, // C_H
    1.9, // C_P
    1.8, // N_P
    1.8, // N_D
    1.8, // N_A
    1.8, // N_DA
    1.7, // O_P
    1.7, // O_D
    1.7, // O_A
    1.7, // O_DA
    2.0, // S_P
    2.1, // P_P
    1.5, // F_H
    1.8, // Cl_H
    2.0, // Br/I_H
];

const HYDROPHOBIC: [bool; XS_N] = [
    true, false, false, false, false, false, false, false, false, false, false, false, true,
    true, true,
];

const DONOR: [bool; XS_N] = [
    false, false, false, true, false, true, false, true, false, true, false, false, false, false,
    false,
];

const ACCEPTOR: [bool; XS_N] = [
    false, false, false, false, true, true, false, false, true, true, false, false, false, false,
    false,
];

/// True if `t0`/`t1` form a donor/acceptor hydrogen-bonding pair (one donates,
/// the other accepts).
pub fn is_hbond_pair(t0: XsType, t1: XsType) -> bool {
    (t0.is_donor() && t1.is_acceptor()) || (t1.is_donor() && t0.is_acceptor())
}

lazy_static! {
    /// Maps a PDBQT trailing atom-type code (e.g. "C", "NA", "OA", "HD") to the
    /// XS class assigned to the *heavy* atom. Hydrogen codes ("HD", "H") are
    /// handled separately by the parser (they never become standalone atoms).
    static ref CODE_TO_XS: HashMap<&'static str, XsType> = {
        let mut m = HashMap::new();
        m.insert("C", XsType::CHydrophobic);
        m.insert("A", XsType::CHydrophobic); // aromatic carbon
        m.insert("N", XsType::NPolar);
        m.insert("NA", XsType::NAcceptor);
        m.insert("NS", XsType::NPolar);
        m.insert("O", XsType::OPolar);
        m.insert("OA", XsType::OAcceptor);
        m.insert("OS", XsType::OPolar);
        m.insert("S", XsType::SPolar);
        m.insert("SA", XsType::SPolar);
        m.insert("P", XsType::PPolar);
        m.insert("F", XsType::FHydrophobic);
        m.insert("Cl", XsType::ClHydrophobic);
        m.insert("CL", XsType::ClHydrophobic);
        m.insert("Br", XsType::BrIHydrophobic);
        m.insert("BR", XsType::BrIHydrophobic);
        m.insert("I", XsType::BrIHydrophobic);
        m
    };
}

/// Looks up the XS class for a heavy-atom PDBQT type code. Returns `None` for
/// hydrogen codes ("H", "HD") and unrecognized codes; the caller distinguishes
/// the two (hydrogens are merged, unknown codes are a parse error).
pub fn xs_type_from_code(code: &str) -> Option<XsType> {
    CODE_TO_XS.get(code).copied()
}

/// True if `code` denotes a polar hydrogen that should be merged into the
/// preceding heavy atom, transferring donor capability.
pub fn is_donor_hydrogen_code(code: &str) -> bool {
    code == "HD"
}

/// True if `code` denotes any hydrogen (donor or plain), which never becomes
/// its own atom record.
pub fn is_hydrogen_code(code: &str) -> bool {
    code == "H" || code == "HD" || code == "HS"
}

/// Promotes a heavy atom's XS class after a donor hydrogen attaches to it.
pub fn promote_to_donor(xs: XsType) -> XsType {
    match xs {
        XsType::NPolar => XsType::NDonor,
        XsType::NAcceptor => XsType::NDonorAcceptor,
        XsType::OPolar => XsType::ODonor,
        XsType::OAcceptor => XsType::ODonorAcceptor,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vdw_radii_are_positive_and_reasonable() {
        for t in ALL_XS_TYPES.iter() {
            let r = t.vdw_radius();
            assert!(r > 1.0 && r < 3.0);
        }
    }

    #[test]
    fn hbond_pair_requires_donor_and_acceptor() {
        assert!(is_hbond_pair(XsType::NDonor, XsType::OAcceptor));
        assert!(is_hbond_pair(XsType::OAcceptor, XsType::NDonor));
        assert!(!is_hbond_pair(XsType::CHydrophobic, XsType::OAcceptor));
        assert!(!is_hbond_pair(XsType::NDonor, XsType::NDonor));
    }

    #[test]
    fn code_lookup() {
        assert_eq!(xs_type_from_code("C"), Some(XsType::CHydrophobic));
        assert_eq!(xs_type_from_code("OA"), Some(XsType::OAcceptor));
        assert_eq!(xs_type_from_code("HD"), None);
        assert_eq!(xs_type_from_code("Xx"), None);
    }

    #[test]
    fn donor_promotion() {
        assert_eq!(promote_to_donor(XsType::NPolar), XsType::NDonor);
        assert_eq!(promote_to_donor(XsType::OAcceptor), XsType::ODonorAcceptor);
        assert_eq!(promote_to_donor(XsType::CHydrophobic), XsType::CHydrophobic);
    }

    #[test]
    fn element_grouping_covers_all_types() {
        for t in ALL_XS_TYPES.iter() {
            let _ = t.element().index();
        }
    }
}
