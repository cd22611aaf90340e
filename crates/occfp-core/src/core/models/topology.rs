use crate::core::utils::elements::{infer_element, vdw_radius};
use std::collections::BTreeSet;
use tracing::warn;

/// Per-atom bookkeeping carried by a trajectory's topology.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopologyAtom {
    pub serial: usize,
    pub name: String,
    pub residue_name: String,
    pub residue_number: isize,
    pub chain_id: char,
    /// Element symbol, either read from the file or inferred from the atom name.
    pub element: Option<String>,
}

impl TopologyAtom {
    pub fn new(serial: usize, name: &str, residue_name: &str, residue_number: isize) -> Self {
        Self {
            serial,
            name: name.to_string(),
            residue_name: residue_name.to_string(),
            residue_number,
            chain_id: 'A',
            element: infer_element(name),
        }
    }

    pub fn with_element(mut self, element: &str) -> Self {
        self.element = Some(element.trim().to_ascii_uppercase());
        self
    }
}

/// Ordered atom table shared by every frame of a trajectory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topology {
    atoms: Vec<TopologyAtom>,
}

impl Topology {
    /// Radius used for atoms whose element has no tabulated van der Waals radius.
    pub const DEFAULT_RADIUS: f64 = 1.5;

    pub fn new(atoms: Vec<TopologyAtom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[TopologyAtom] {
        &self.atoms
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Van der Waals radius of every atom, in topology order.
    ///
    /// Atoms with an unknown or missing element get [`Topology::DEFAULT_RADIUS`].
    pub fn atom_radii(&self) -> Vec<f64> {
        self.atom_radii_with_default(Self::DEFAULT_RADIUS)
    }

    /// Like [`Topology::atom_radii`] with a caller-chosen fallback radius.
    pub fn atom_radii_with_default(&self, default_radius: f64) -> Vec<f64> {
        let mut unknown = BTreeSet::new();
        let radii = self
            .atoms
            .iter()
            .map(|atom| {
                atom.element
                    .as_deref()
                    .and_then(vdw_radius)
                    .unwrap_or_else(|| {
                        unknown.insert(atom.element.clone().unwrap_or_else(|| atom.name.clone()));
                        default_radius
                    })
            })
            .collect();

        if !unknown.is_empty() {
            warn!(
                fallback_radius = default_radius,
                "No van der Waals radius for element(s) {:?}; using the fallback radius.",
                unknown
            );
        }
        radii
    }
}
