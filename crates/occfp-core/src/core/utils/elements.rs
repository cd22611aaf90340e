use phf::{Map, phf_map};

/// Van der Waals radii in Angstroms, keyed by upper-case element symbol.
///
/// Values follow Bondi (1964) with the usual extensions for ions found in
/// biomolecular simulations.
#[rustfmt::skip]
static VDW_RADII: Map<&'static str, f64> = phf_map! {
    "H"  => 1.20, "D"  => 1.20, "HE" => 1.40,
    "LI" => 1.82, "BE" => 1.53, "B"  => 1.92, "C"  => 1.70, "N"  => 1.55, "O"  => 1.52, "F"  => 1.47, "NE" => 1.54,
    "NA" => 2.27, "MG" => 1.73, "AL" => 1.84, "SI" => 2.10, "P"  => 1.80, "S"  => 1.80, "CL" => 1.75, "AR" => 1.88,
    "K"  => 2.75, "CA" => 2.31, "NI" => 1.63, "CU" => 1.40, "ZN" => 1.39, "GA" => 1.87, "GE" => 2.11,
    "AS" => 1.85, "SE" => 1.90, "BR" => 1.85, "KR" => 2.02,
    "RB" => 3.03, "SR" => 2.49, "PD" => 1.63, "AG" => 1.72, "CD" => 1.58, "IN" => 1.93, "SN" => 2.17,
    "SB" => 2.06, "TE" => 2.06, "I"  => 1.98, "XE" => 2.16,
    "CS" => 3.43, "BA" => 2.68, "PT" => 1.75, "AU" => 1.66, "HG" => 1.55, "TL" => 1.96, "PB" => 2.02,
    "BI" => 2.07, "U"  => 1.86,
};

/// Looks up the van der Waals radius of an element symbol (case-insensitive).
pub fn vdw_radius(element: &str) -> Option<f64> {
    let symbol = element.trim().to_ascii_uppercase();
    VDW_RADII.get(symbol.as_str()).copied()
}

/// Guesses an element symbol from a PDB-style atom name.
///
/// Leading digits are skipped (`1HB` is hydrogen). A two-letter name that is a
/// known element symbol and does not start with an organic element letter
/// (`ZN`, `MG`, `BR`) is taken as that element; otherwise the first letter is
/// used, so `CA` and `NA` resolve to carbon and nitrogen. Readers should prefer
/// an explicit element column when the file has one.
pub fn infer_element(atom_name: &str) -> Option<String> {
    let letters: String = atom_name
        .trim()
        .chars()
        .skip_while(|c| c.is_ascii_digit())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();

    let first = letters.chars().next()?;
    if letters.len() == 2 && VDW_RADII.contains_key(letters.as_str()) && !is_organic(first) {
        return Some(letters);
    }
    Some(first.to_string())
}

fn is_organic(c: char) -> bool {
    matches!(c, 'C' | 'H' | 'N' | 'O' | 'S' | 'P')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vdw_radius_returns_bondi_values() {
        assert_eq!(vdw_radius("C"), Some(1.70));
        assert_eq!(vdw_radius("N"), Some(1.55));
        assert_eq!(vdw_radius("O"), Some(1.52));
        assert_eq!(vdw_radius("H"), Some(1.20));
        assert_eq!(vdw_radius("S"), Some(1.80));
    }

    #[test]
    fn vdw_radius_is_case_insensitive_and_trims() {
        assert_eq!(vdw_radius(" zn "), Some(1.39));
        assert_eq!(vdw_radius("Cl"), Some(1.75));
    }

    #[test]
    fn vdw_radius_returns_none_for_unknown_symbol() {
        assert_eq!(vdw_radius("Xx"), None);
        assert_eq!(vdw_radius(""), None);
    }

    #[test]
    fn infer_element_uses_first_letter_for_protein_names() {
        assert_eq!(infer_element("CA").as_deref(), Some("C"));
        assert_eq!(infer_element("CB").as_deref(), Some("C"));
        assert_eq!(infer_element("NZ").as_deref(), Some("N"));
        assert_eq!(infer_element("OG1").as_deref(), Some("O"));
        assert_eq!(infer_element("HB2").as_deref(), Some("H"));
    }

    #[test]
    fn infer_element_skips_leading_digits() {
        assert_eq!(infer_element("1HB").as_deref(), Some("H"));
        assert_eq!(infer_element("2HG1").as_deref(), Some("H"));
    }

    #[test]
    fn infer_element_recognizes_ions() {
        assert_eq!(infer_element("ZN").as_deref(), Some("ZN"));
        assert_eq!(infer_element("MG").as_deref(), Some("MG"));
        assert_eq!(infer_element("BR").as_deref(), Some("BR"));
    }

    #[test]
    fn infer_element_returns_none_without_letters() {
        assert_eq!(infer_element(""), None);
        assert_eq!(infer_element("123"), None);
    }
}
