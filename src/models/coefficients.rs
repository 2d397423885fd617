use serde::{Deserialize, Serialize};

use super::Species;

/// Transform applied to DBH before the reciprocal height model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DiameterTransform {
    Identity,
    SquareRoot,
}

/// Reciprocal height-diameter model: `h = x / (a + b·x)` with `x = transform(dbh)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HypsometricModel {
    pub a: f64,
    pub b: f64,
    pub transform: DiameterTransform,
}

/// Power-law stem volume: `V = coef · (dbh·dbh_scale)^dbh_exp · h^height_exp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeModel {
    pub coef: f64,
    pub dbh_scale: f64,
    pub dbh_exp: f64,
    pub height_exp: f64,
}

/// Height exponent of Eucalyptus trunk and bark biomass, driven by dominant height.
///
/// Above `threshold` the exponent is `above`, otherwise `hdom / (c1 + c2·hdom)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominanceExponent {
    pub threshold: f64,
    pub above: f64,
    pub c1: f64,
    pub c2: f64,
}

impl DominanceExponent {
    pub fn at(&self, hdom: f64) -> f64 {
        if hdom > self.threshold {
            self.above
        } else {
            hdom / (self.c1 + self.c2 * hdom)
        }
    }
}

/// Allometric form of one above-ground biomass compartment (kg).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CompartmentModel {
    /// `coef · d^d_exp · h^h_exp`
    DbhHeight { coef: f64, d_exp: f64, h_exp: f64 },
    /// `coef · d^d_exp · (h/d)^ratio_exp`
    Slenderness { coef: f64, d_exp: f64, ratio_exp: f64 },
    /// `coef · d^d_exp · h^β(hdom)`
    DominanceScaled {
        coef: f64,
        d_exp: f64,
        h_exp: DominanceExponent,
    },
    /// `coef · (π·d)^c_exp`
    Circumference { coef: f64, c_exp: f64 },
}

/// Below-ground biomass model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RootModel {
    /// Fraction of the aerial biomass
    ShootRatio(f64),
    /// `coef · d^d_exp`
    Dbh { coef: f64, d_exp: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomassModel {
    pub trunk: CompartmentModel,
    pub bark: CompartmentModel,
    pub branches: CompartmentModel,
    pub foliage: CompartmentModel,
    pub roots: RootModel,
}

/// Stem profile used to estimate the diameter at 2 m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StemProfile {
    /// `d2 = dbh · sqrt((h - 2) / (h - 1.3))`
    Paraboloid,
    /// Relative diameter `r(hi) = 1 - ln(1 - (hi/h)^(1/k)·(1 - e^x)) / x`,
    /// scaled so that `r(1.3)` maps to DBH.
    LogTaper { x: f64, k: f64 },
}

/// Merchantable volume up to a top diameter: `V(d) = V · exp(-k · d^top_exp / dbh^dbh_exp)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRatioModel {
    pub k: f64,
    pub top_exp: f64,
    pub dbh_exp: f64,
}

/// Timber assortments of a species, largest top diameter first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimberModel {
    pub ratio: VolumeRatioModel,
    pub top_diameters: &'static [f64],
    pub profile: StemProfile,
}

/// Site index growth curves. `reference_age` is the base age in years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SiteIndexCurve {
    /// `S = A · (hdom/A)^((t/t_ref)^β)`
    Power {
        asymptote: f64,
        beta: f64,
        reference_age: f64,
    },
    /// `S = A / (1 + (A/hdom - 1) · (t/t_ref)^β)`
    Logistic {
        asymptote: f64,
        beta: f64,
        reference_age: f64,
    },
    /// `S = hdom · ((1 - e^(-k·t_ref)) / (1 - e^(-k·t)))^c`
    ChapmanRichards {
        rate: f64,
        shape: f64,
        reference_age: f64,
    },
}

/// Every coefficient the engine needs for one species.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeciesCoefficients {
    pub hypsometric: HypsometricModel,
    pub volume: VolumeModel,
    pub merchantable: Option<VolumeModel>,
    pub biomass: BiomassModel,
    pub timber: Option<TimberModel>,
    /// Reineke exponent for the stand density index
    pub sdi_exponent: f64,
    pub site_index: SiteIndexCurve,
}

impl SpeciesCoefficients {
    pub fn for_species(species: Species) -> &'static SpeciesCoefficients {
        match species {
            Species::Pb => &MARITIME_PINE,
            Species::Pm => &STONE_PINE,
            Species::Ec => &BLUE_GUM,
            Species::Sb => &CORK_OAK,
        }
    }
}

const MARITIME_PINE: SpeciesCoefficients = SpeciesCoefficients {
    hypsometric: HypsometricModel {
        a: 0.6,
        b: 0.03,
        transform: DiameterTransform::Identity,
    },
    volume: VolumeModel {
        coef: 0.7520,
        dbh_scale: 0.01,
        dbh_exp: 2.0706,
        height_exp: 0.8031,
    },
    merchantable: Some(VolumeModel {
        coef: 0.0000247,
        dbh_scale: 1.0,
        dbh_exp: 2.1119,
        height_exp: 0.9261,
    }),
    biomass: BiomassModel {
        trunk: CompartmentModel::DbhHeight {
            coef: 0.0146,
            d_exp: 1.94687,
            h_exp: 1.106577,
        },
        bark: CompartmentModel::DbhHeight {
            coef: 0.0114,
            d_exp: 1.8728,
            h_exp: 0.6694,
        },
        branches: CompartmentModel::Slenderness {
            coef: 0.00308,
            d_exp: 2.75761,
            ratio_exp: -0.39381,
        },
        foliage: CompartmentModel::Slenderness {
            coef: 0.0998,
            d_exp: 1.39252,
            ratio_exp: -0.71962,
        },
        roots: RootModel::ShootRatio(0.2756),
    },
    timber: Some(TimberModel {
        ratio: VolumeRatioModel {
            k: 0.6360,
            top_exp: 3.2408,
            dbh_exp: 3.2019,
        },
        top_diameters: &[35.0, 15.0, 7.0],
        profile: StemProfile::Paraboloid,
    }),
    sdi_exponent: 1.897,
    site_index: SiteIndexCurve::Power {
        asymptote: 45.0,
        beta: 0.45,
        reference_age: 50.0,
    },
};

const STONE_PINE: SpeciesCoefficients = SpeciesCoefficients {
    hypsometric: HypsometricModel {
        a: 0.9,
        b: 0.05,
        transform: DiameterTransform::Identity,
    },
    volume: VolumeModel {
        coef: 0.0000571,
        dbh_scale: 1.0,
        dbh_exp: 2.0324,
        height_exp: 0.8152,
    },
    merchantable: None,
    biomass: BiomassModel {
        trunk: CompartmentModel::Circumference {
            coef: 0.0134,
            c_exp: 2.1,
        },
        bark: CompartmentModel::Circumference {
            coef: 0.0036,
            c_exp: 2.0,
        },
        branches: CompartmentModel::Circumference {
            coef: 0.0007,
            c_exp: 2.6,
        },
        foliage: CompartmentModel::Circumference {
            coef: 0.0052,
            c_exp: 1.8,
        },
        roots: RootModel::Dbh {
            coef: 0.0325,
            d_exp: 2.2,
        },
    },
    timber: None,
    sdi_exponent: 1.605,
    site_index: SiteIndexCurve::Power {
        asymptote: 24.0,
        beta: 0.5,
        reference_age: 80.0,
    },
};

const BLUE_GUM: SpeciesCoefficients = SpeciesCoefficients {
    hypsometric: HypsometricModel {
        a: 0.55,
        b: 0.022,
        transform: DiameterTransform::Identity,
    },
    volume: VolumeModel {
        coef: 0.000048,
        dbh_scale: 1.0,
        dbh_exp: 1.8961,
        height_exp: 0.9892,
    },
    merchantable: Some(VolumeModel {
        coef: 0.0000429,
        dbh_scale: 1.0,
        dbh_exp: 1.8889,
        height_exp: 1.0061,
    }),
    biomass: BiomassModel {
        trunk: CompartmentModel::DominanceScaled {
            coef: 0.0280,
            d_exp: 1.8,
            h_exp: DominanceExponent {
                threshold: 20.0,
                above: 1.052632,
                c1: 3.2,
                c2: 0.79,
            },
        },
        bark: CompartmentModel::DominanceScaled {
            coef: 0.0106,
            d_exp: 1.6,
            h_exp: DominanceExponent {
                threshold: 18.0,
                above: 0.725806,
                c1: 5.0,
                c2: 1.1,
            },
        },
        branches: CompartmentModel::DbhHeight {
            coef: 0.0520,
            d_exp: 1.78,
            h_exp: 0.0,
        },
        foliage: CompartmentModel::DbhHeight {
            coef: 0.1057,
            d_exp: 1.3,
            h_exp: 0.0,
        },
        roots: RootModel::ShootRatio(0.20),
    },
    timber: Some(TimberModel {
        ratio: VolumeRatioModel {
            k: 0.7,
            top_exp: 3.1,
            dbh_exp: 3.0,
        },
        top_diameters: &[6.0],
        profile: StemProfile::LogTaper { x: -2.5, k: 1.6 },
    }),
    sdi_exponent: 1.41,
    site_index: SiteIndexCurve::Logistic {
        asymptote: 40.0,
        beta: 1.15,
        reference_age: 10.0,
    },
};

const CORK_OAK: SpeciesCoefficients = SpeciesCoefficients {
    hypsometric: HypsometricModel {
        a: 0.2,
        b: 0.07,
        transform: DiameterTransform::SquareRoot,
    },
    volume: VolumeModel {
        coef: 0.000081,
        dbh_scale: 1.0,
        dbh_exp: 2.0,
        height_exp: 0.7,
    },
    merchantable: None,
    biomass: BiomassModel {
        trunk: CompartmentModel::Circumference {
            coef: 0.0085,
            c_exp: 2.1,
        },
        bark: CompartmentModel::Circumference {
            coef: 0.0042,
            c_exp: 1.9,
        },
        branches: CompartmentModel::Circumference {
            coef: 0.0013,
            c_exp: 2.5,
        },
        foliage: CompartmentModel::Circumference {
            coef: 0.0105,
            c_exp: 1.6,
        },
        roots: RootModel::Dbh {
            coef: 0.0487,
            d_exp: 2.2,
        },
    },
    timber: None,
    sdi_exponent: 1.605,
    site_index: SiteIndexCurve::ChapmanRichards {
        rate: 0.0196,
        shape: 1.3,
        reference_age: 80.0,
    },
};
