//! Branch-scoped path resolution for the layered warehouse.
//!
//! All storage and script addressing is derived from a single branch
//! identifier substituted into fixed templates. The resulting paths are plain
//! strings: the platform addresses storage through `lib://` URLs, which are
//! not filesystem paths on the orchestrating host.

use std::fmt;

/// One of the three warehouse layers, in reload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    System,
    Business,
    Requirements,
}

impl Layer {
    /// All layers, in the fixed reload order.
    pub const ALL: [Layer; 3] = [Layer::System, Layer::Business, Layer::Requirements];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::System => "system",
            Layer::Business => "business",
            Layer::Requirements => "requirements",
        }
    }

    /// Directory segment used by both storage paths and script names.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Layer::System => "data_according_to_system",
            Layer::Business => "data_according_to_business",
            Layer::Requirements => "data_according_to_requirements",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four branch-derived paths, computed once at the start of a run and
/// read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPaths {
    pub system_storage: String,
    pub business_storage: String,
    pub requirements_storage: String,
    pub script_base: String,
}

impl LayerPaths {
    /// Substitute the branch identifier into the fixed path templates.
    ///
    /// No validation is applied here; a malformed branch propagates into
    /// malformed paths. Branch resolution rejects empty identifiers before
    /// this point.
    pub fn resolve(storage_root: &str, scripts_root: &str, branch: &str) -> Self {
        LayerPaths {
            system_storage: format!(
                "{}/Analytical Data Storage System/QVD/{}/data_according_to_system",
                storage_root, branch
            ),
            business_storage: format!(
                "{}/Analytical Data Storage System/QVD/{}/data_according_to_business",
                storage_root, branch
            ),
            requirements_storage: format!(
                "{}/Analytical Data Storage System/QVD/{}/data_according_to_requirements",
                storage_root, branch
            ),
            script_base: format!(
                "{}/Analytical Data Storage System/{}/scripts",
                scripts_root, branch
            ),
        }
    }

    /// Storage path for a layer's QVD directory.
    pub fn storage_path(&self, layer: Layer) -> &str {
        match layer {
            Layer::System => &self.system_storage,
            Layer::Business => &self.business_storage,
            Layer::Requirements => &self.requirements_storage,
        }
    }

    /// Path of the stage script that loads a layer.
    pub fn script_path(&self, layer: Layer) -> String {
        format!("{}/{}.qvs", self.script_base, layer.dir_name())
    }
}
