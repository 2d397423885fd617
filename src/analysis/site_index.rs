use crate::analysis::tree_metrics::real_pow;
use crate::error::ForestError;
use crate::models::{MainSpecies, SiteIndexCurve, SpeciesCoefficients};

/// Expected dominant height at the curve's reference age.
pub fn evaluate_curve(curve: SiteIndexCurve, hdom: f64, age: f64) -> Result<f64, ForestError> {
    if hdom <= 0.0 || age <= 0.0 {
        return Err(ForestError::ComputationError(format!(
            "site index needs positive dominant height and age, got {hdom} m at {age} years"
        )));
    }

    let site_index = match curve {
        SiteIndexCurve::Power {
            asymptote,
            beta,
            reference_age,
        } => {
            let exponent = (age / reference_age).powf(beta);
            asymptote * real_pow(hdom / asymptote, exponent, "site index")?
        }
        SiteIndexCurve::Logistic {
            asymptote,
            beta,
            reference_age,
        } => {
            let denominator = 1.0 + (asymptote / hdom - 1.0) * (age / reference_age).powf(beta);
            if denominator <= 0.0 {
                return Err(ForestError::ComputationError(format!(
                    "dominant height {hdom} m is outside the logistic site curve"
                )));
            }
            asymptote / denominator
        }
        SiteIndexCurve::ChapmanRichards {
            rate,
            shape,
            reference_age,
        } => {
            let ratio = (1.0 - (-rate * reference_age).exp()) / (1.0 - (-rate * age).exp());
            hdom * real_pow(ratio, shape, "site index")?
        }
    };

    if !site_index.is_finite() {
        return Err(ForestError::ComputationError(format!(
            "site index is not finite for {hdom} m at {age} years"
        )));
    }
    Ok(site_index)
}

/// Site index of the stand: 0 unless there is a main species and a known age.
pub fn site_index(main: MainSpecies, hdom: f64, age: Option<f64>) -> Result<f64, ForestError> {
    let (Some(species), Some(age)) = (main.species(), age) else {
        tracing::debug!(%main, ?age, "site index not defined for this stand");
        return Ok(0.0);
    };
    let curve = SpeciesCoefficients::for_species(species).site_index;
    evaluate_curve(curve, hdom, age)
}
