use std::f64::consts::PI;

use crate::analysis::Dominance;
use crate::error::ForestError;
use crate::models::{
    Biomass, CompartmentModel, RootModel, SpeciesCoefficients, Tree, TreeMetrics, TreeStatus,
    VolumeModel,
};

/// Real-valued power that refuses out-of-domain bases instead of yielding NaN.
pub(crate) fn real_pow(base: f64, exp: f64, what: &str) -> Result<f64, ForestError> {
    if !base.is_finite() || base < 0.0 || (base == 0.0 && exp < 0.0) {
        return Err(ForestError::ComputationError(format!(
            "{what}: cannot raise {base} to the power {exp}"
        )));
    }
    Ok(base.powf(exp))
}

/// Basal area in m² for a DBH in cm.
pub fn basal_area(dbh: f64) -> f64 {
    PI * (dbh / 100.0 / 2.0).powi(2)
}

fn volume_with(model: &VolumeModel, dbh: f64, height: f64, what: &str) -> Result<f64, ForestError> {
    Ok(model.coef
        * real_pow(dbh * model.dbh_scale, model.dbh_exp, what)?
        * real_pow(height, model.height_exp, what)?)
}

fn compartment(
    model: &CompartmentModel,
    dbh: f64,
    height: f64,
    hdom: f64,
    what: &str,
) -> Result<f64, ForestError> {
    match *model {
        CompartmentModel::DbhHeight { coef, d_exp, h_exp } => {
            Ok(coef * real_pow(dbh, d_exp, what)? * real_pow(height, h_exp, what)?)
        }
        CompartmentModel::Slenderness {
            coef,
            d_exp,
            ratio_exp,
        } => {
            if dbh <= 0.0 {
                return Err(ForestError::ComputationError(format!(
                    "{what}: slenderness is undefined for DBH {dbh}"
                )));
            }
            Ok(coef * real_pow(dbh, d_exp, what)? * real_pow(height / dbh, ratio_exp, what)?)
        }
        CompartmentModel::DominanceScaled { coef, d_exp, h_exp } => {
            Ok(coef * real_pow(dbh, d_exp, what)? * real_pow(height, h_exp.at(hdom), what)?)
        }
        CompartmentModel::Circumference { coef, c_exp } => {
            Ok(coef * real_pow(PI * dbh, c_exp, what)?)
        }
    }
}

/// Biomass compartments (kg) of a tree.
///
/// `hdom` only matters for species whose trunk and bark exponents depend on it.
pub fn biomass(tree: &Tree, hdom: f64) -> Result<Biomass, ForestError> {
    let model = SpeciesCoefficients::for_species(tree.species).biomass;
    let (d, h) = (tree.est_dbh, tree.est_height);

    let trunk = compartment(&model.trunk, d, h, hdom, "trunk biomass")?;
    let bark = compartment(&model.bark, d, h, hdom, "bark biomass")?;
    let branches = compartment(&model.branches, d, h, hdom, "branch biomass")?;
    let foliage = compartment(&model.foliage, d, h, hdom, "foliage biomass")?;
    let aerial = trunk + bark + branches + foliage;

    let roots = match model.roots {
        RootModel::ShootRatio(ratio) => aerial * ratio,
        RootModel::Dbh { coef, d_exp } => coef * real_pow(d, d_exp, "root biomass")?,
    };

    Ok(Biomass {
        trunk,
        bark,
        branches,
        foliage,
        aerial,
        roots,
        total: aerial + roots,
    })
}

/// Compute the per-tree metrics that do not depend on timber prices.
///
/// Taking the [`Dominance`] of the plot makes the dominant height an explicit
/// input: it has to be selected before any tree can be measured up.
pub fn compute_tree_metrics(tree: &Tree, dominance: &Dominance) -> Result<TreeMetrics, ForestError> {
    let coefficients = SpeciesCoefficients::for_species(tree.species);
    let (d, h) = (tree.est_dbh, tree.est_height);
    let mut metrics = TreeMetrics::default();

    let wrap = |e: ForestError| match e {
        ForestError::ComputationError(msg) => {
            ForestError::ComputationError(format!("Tree {}: {msg}", tree.id))
        }
        other => other,
    };

    if matches!(tree.status, TreeStatus::Alive | TreeStatus::Dead) {
        metrics.volume = volume_with(&coefficients.volume, d, h, "stem volume").map_err(wrap)?;
    }

    if tree.is_alive() {
        metrics.basal_area = basal_area(d);
        if let Some(model) = &coefficients.merchantable {
            metrics.merchantable_volume =
                volume_with(model, d, h, "merchantable volume").map_err(wrap)?;
        }
        metrics.biomass = biomass(tree, dominance.height).map_err(wrap)?;
    }

    Ok(metrics)
}
