mod tree;
mod plot;
mod stand;
mod coefficients;

pub use tree::{Biomass, Species, Tree, TreeMetrics, TreeRecord, TreeStatus};
pub use plot::{expansion_factor, Plot};
pub use stand::{MainSpecies, Stand};
pub use coefficients::{
    BiomassModel, CompartmentModel, DiameterTransform, DominanceExponent, HypsometricModel,
    RootModel, SiteIndexCurve, SpeciesCoefficients, StemProfile, TimberModel, VolumeModel,
    VolumeRatioModel,
};
