//! Sets of networks measured over the same band
//!
//! A [`NetworkSet`] holds repeated measurements of one device and provides
//! element-wise statistics across them.

use std::path::Path;

use ndarray::{Array3, Axis};
use num_complex::Complex64;

use crate::io::load_all_touchstones;
use crate::math_functions::magnitude_2_db;
use crate::namespace::{ExportList, LoadError, ModuleDecl};
use crate::network::{Network, NetworkError};

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("network_set", exports);

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("network_set", module_path!()).ty::<NetworkSet>("NetworkSet"))
}

/// A non-empty collection of networks sharing port count and frequency points
#[derive(Debug, Clone)]
pub struct NetworkSet {
    networks: Vec<Network>,
}

impl NetworkSet {
    pub fn new(networks: Vec<Network>) -> Result<Self, NetworkError> {
        let first = networks.first().ok_or(NetworkError::Empty)?;
        for ntwk in &networks[1..] {
            if ntwk.s.shape() != first.s.shape() {
                return Err(NetworkError::Incompatible(format!(
                    "'{}' has shape {:?}, expected {:?}",
                    ntwk.name(),
                    ntwk.s.shape(),
                    first.s.shape()
                )));
            }
            first.check_frequency(ntwk)?;
        }
        Ok(Self { networks })
    }

    /// Every Touchstone file in `dir`, ordered by file name
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, NetworkError> {
        let loaded = load_all_touchstones(dir, None)?;
        Self::new(loaded.into_values().collect())
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Network> {
        self.networks.iter()
    }

    /// Look up a member by name
    pub fn get(&self, name: &str) -> Option<&Network> {
        self.networks.iter().find(|n| n.name.as_deref() == Some(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.networks.iter().map(|n| n.name()).collect()
    }

    /// Stack of every member's S-parameters, `[member, nfreq, nports, nports]`
    fn stacked(&self) -> ndarray::Array4<Complex64> {
        let views: Vec<_> = self.networks.iter().map(|n| n.s.view()).collect();
        // shapes are checked in `new`
        ndarray::stack(Axis(0), &views).unwrap_or_else(|_| ndarray::Array4::zeros((0, 0, 0, 0)))
    }

    /// Complex mean of the S-parameters as a network
    pub fn mean_s(&self) -> Result<Network, NetworkError> {
        let first = &self.networks[0];
        let mean = self
            .stacked()
            .mean_axis(Axis(0))
            .ok_or(NetworkError::Empty)?;
        Ok(Network::new(first.frequency.clone(), mean, first.z0.clone())?.with_name("mean"))
    }

    /// Standard deviation of the complex S-parameters, `sqrt(mean(|s - mean|^2))`
    pub fn std_s(&self) -> Array3<f64> {
        let stacked = self.stacked();
        let Some(mean) = stacked.mean_axis(Axis(0)) else {
            return Array3::zeros((0, 0, 0));
        };
        let var = stacked
            .axis_iter(Axis(0))
            .map(|s| (&s - &mean).mapv(|d| d.norm_sqr()))
            .fold(Array3::<f64>::zeros(mean.raw_dim()), |acc, d| acc + d)
            / self.len() as f64;
        var.mapv(f64::sqrt)
    }

    /// Mean magnitude in dB
    pub fn mean_s_db(&self) -> Array3<f64> {
        self.stacked()
            .mapv(|c| c.norm())
            .mean_axis(Axis(0))
            .map(|m| m.mapv(magnitude_2_db))
            .unwrap_or_else(|| Array3::zeros((0, 0, 0)))
    }
}

impl<'a> IntoIterator for &'a NetworkSet {
    type Item = &'a Network;
    type IntoIter = std::slice::Iter<'a, Network>;

    fn into_iter(self) -> Self::IntoIter {
        self.networks.iter()
    }
}
