//! Closed catalogs of collections, product types, and processing baselines
//!
//! Every identifier a run is configured with must belong to one of the closed
//! sets defined here. Validation happens when the identifier is parsed, so a
//! [`Collection`], [`ProductCode`], or [`Baseline`] value is known-good by
//! construction and no further membership checks are needed downstream.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Errors produced when parsing catalog identifiers
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Collection name is not in the closed collection set
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// Product code is not in the closed product catalog
    #[error("unknown product code: {0}")]
    UnknownProduct(String),

    /// Baseline tag is not in the closed baseline set
    #[error("unknown baseline: {0}")]
    UnknownBaseline(String),
}

/// Named catalog collection (archive partition) on the OADS catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Collection {
    /// EarthCARE Auxiliary Data for Cal/Val Users
    Auxiliary,
    /// EarthCARE ESA L2 Products
    L2Validated,
    /// EarthCARE ESA L2 Products for Cal/Val Users
    L2InstChecked,
    /// EarthCARE ESA L2 Products for the Commissioning Team
    L2Products,
    /// EarthCARE JAXA L2 Products
    JaxaL2Validated,
    /// EarthCARE JAXA L2 Products for Cal/Val Users
    JaxaL2InstChecked,
    /// EarthCARE JAXA L2 Products for the Commissioning Team
    JaxaL2Products,
    /// EarthCARE L0 and L1 Products for the Commissioning Team
    L0L1Products,
    /// EarthCARE L1 Products
    L1Validated,
    /// EarthCARE L1 Products for Cal/Val Users
    L1InstChecked,
    /// EarthCARE Orbit Data
    OrbitData,
}

impl Collection {
    /// All collections, in catalog order
    pub const ALL: [Collection; 11] = [
        Collection::Auxiliary,
        Collection::L2Validated,
        Collection::L2InstChecked,
        Collection::L2Products,
        Collection::JaxaL2Validated,
        Collection::JaxaL2InstChecked,
        Collection::JaxaL2Products,
        Collection::L0L1Products,
        Collection::L1Validated,
        Collection::L1InstChecked,
        Collection::OrbitData,
    ];

    /// Collection identifier as it appears in catalog URLs
    pub fn id(&self) -> &'static str {
        match self {
            Collection::Auxiliary => "EarthCAREAuxiliary",
            Collection::L2Validated => "EarthCAREL2Validated",
            Collection::L2InstChecked => "EarthCAREL2InstChecked",
            Collection::L2Products => "EarthCAREL2Products",
            Collection::JaxaL2Validated => "JAXAL2Validated",
            Collection::JaxaL2InstChecked => "JAXAL2InstChecked",
            Collection::JaxaL2Products => "JAXAL2Products",
            Collection::L0L1Products => "EarthCAREL0L1Products",
            Collection::L1Validated => "EarthCAREL1Validated",
            Collection::L1InstChecked => "EarthCAREL1InstChecked",
            Collection::OrbitData => "EarthCAREOrbitData",
        }
    }

    /// Human-readable description of the collection
    pub fn description(&self) -> &'static str {
        match self {
            Collection::Auxiliary => "EarthCARE Auxiliary Data for Cal/Val Users",
            Collection::L2Validated => "EarthCARE ESA L2 Products",
            Collection::L2InstChecked => "EarthCARE ESA L2 Products for Cal/Val Users",
            Collection::L2Products => "EarthCARE ESA L2 Products for the Commissioning Team",
            Collection::JaxaL2Validated => "EarthCARE JAXA L2 Products",
            Collection::JaxaL2InstChecked => "EarthCARE JAXA L2 Products for Cal/Val Users",
            Collection::JaxaL2Products => "EarthCARE JAXA L2 Products for the Commissioning Team",
            Collection::L0L1Products => "EarthCARE L0 and L1 Products for the Commissioning Team",
            Collection::L1Validated => "EarthCARE L1 Products",
            Collection::L1InstChecked => "EarthCARE L1 Products for Cal/Val Users",
            Collection::OrbitData => "EarthCARE Orbit Data",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Collection {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| CatalogError::UnknownCollection(s.to_string()))
    }
}

/// Closed catalog of downloadable product types
const PRODUCT_CATALOG: &[&str] = &[
    // ATLID level 1b
    "ATL_NOM_1B",
    "ATL_DCC_1B",
    "ATL_CSC_1B",
    "ATL_FSC_1B",
    // MSI level 1b
    "MSI_NOM_1B",
    "MSI_BBS_1B",
    "MSI_SD1_1B",
    "MSI_SD2_1B",
    // BBR level 1b
    "BBR_NOM_1B",
    "BBR_SNG_1B",
    "BBR_SOL_1B",
    "BBR_LIN_1B",
    // CPR level 1b
    "CPR_NOM_1B",
    // MSI level 1c
    "MSI_RGR_1C",
    // level 1d
    "AUX_MET_1D",
    "AUX_JSG_1D",
    // ATLID level 2a
    "ATL_FM__2A",
    "ATL_AER_2A",
    "ATL_ICE_2A",
    "ATL_TC__2A",
    "ATL_EBD_2A",
    "ATL_CTH_2A",
    "ATL_ALD_2A",
    // MSI level 2a
    "MSI_CM__2A",
    "MSI_COP_2A",
    "MSI_AOT_2A",
    // CPR level 2a
    "CPR_FMR_2A",
    "CPR_CD__2A",
    "CPR_TC__2A",
    "CPR_CLD_2A",
    "CPR_APC_2A",
    // ATLID-MSI level 2b
    "AM__MO__2B",
    "AM__CTH_2B",
    "AM__ACD_2B",
    // ATLID-CPR level 2b
    "AC__TC__2B",
    // BBR-MSI-(ATLID) level 2b
    "BM__RAD_2B",
    "BMA_FLX_2B",
    // ATLID-CPR-MSI level 2b
    "ACM_CAP_2B",
    "ACM_COM_2B",
    "ACM_RT__2B",
    // ATLID-CPR-MSI-BBR
    "ALL_DF__2B",
    "ALL_3D__2B",
    // Orbit data
    "MPL_ORBSCT",
    "AUX_ORBPRE",
    "AUX_ORBRES",
];

/// Validated product code from the closed product catalog
///
/// A `ProductCode` can only be obtained by parsing a string that belongs to
/// the catalog, so holding one is proof of membership.
///
/// # Examples
///
/// ```
/// use earthcare_downloader::catalog::ProductCode;
/// use std::str::FromStr;
///
/// let code = ProductCode::from_str("ATL_ALD_2A").unwrap();
/// assert_eq!(code.as_str(), "ATL_ALD_2A");
/// assert!(ProductCode::from_str("NOT_A_PRODUCT").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductCode(&'static str);

impl ProductCode {
    /// Product code as configured (the download product code)
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Catalog search token for this product
    ///
    /// A handful of products are indexed in the catalog under a short token
    /// that differs from their download product code; everything else
    /// searches under its own code.
    pub fn search_code(&self) -> &'static str {
        match self.0 {
            "ATL_ALD_2A" => "AALD",
            "ATL_FM__2A" => "AFM",
            "ATL_EBD_2A" => "AEBD",
            "ATL_CTH_2A" => "ACTH",
            other => other,
        }
    }

    /// All product codes in the catalog, in catalog order
    pub fn all() -> impl Iterator<Item = ProductCode> {
        PRODUCT_CATALOG.iter().copied().map(ProductCode)
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for ProductCode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PRODUCT_CATALOG
            .iter()
            .copied()
            .find(|code| *code == s)
            .map(ProductCode)
            .ok_or_else(|| CatalogError::UnknownProduct(s.to_string()))
    }
}

/// Processing-baseline version tag (two-character generation marker)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Baseline {
    /// Baseline AC
    Ac,
    /// Baseline AD
    Ad,
    /// Baseline AE
    Ae,
    /// Baseline BA
    Ba,
    /// Baseline BB
    Bb,
}

impl Baseline {
    /// All known baselines
    pub const ALL: [Baseline; 5] = [
        Baseline::Ac,
        Baseline::Ad,
        Baseline::Ae,
        Baseline::Ba,
        Baseline::Bb,
    ];

    /// Two-character tag as it appears in product titles
    pub fn as_str(&self) -> &'static str {
        match self {
            Baseline::Ac => "AC",
            Baseline::Ad => "AD",
            Baseline::Ae => "AE",
            Baseline::Ba => "BA",
            Baseline::Bb => "BB",
        }
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Baseline {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Baseline::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownBaseline(s.to_string()))
    }
}
