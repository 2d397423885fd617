use crate::config::TimberPrices;
use crate::models::{SpeciesCoefficients, StemProfile, TimberModel, Tree};

const BREAST_HEIGHT: f64 = 1.3;
const LOG_HEIGHT: f64 = 2.0;

/// Stem diameter (cm) at 2 m, or `None` when the profile is undefined there.
pub fn diameter_at_2m(profile: StemProfile, dbh: f64, height: f64) -> Option<f64> {
    match profile {
        StemProfile::Paraboloid => {
            if height <= LOG_HEIGHT {
                return Some(0.0);
            }
            Some(dbh * ((height - LOG_HEIGHT) / (height - BREAST_HEIGHT)).sqrt())
        }
        StemProfile::LogTaper { x, k } => {
            if height <= 0.0 {
                return None;
            }
            let relative = |hi: f64| -> Option<f64> {
                let arg = 1.0 - (hi / height).powf(1.0 / k) * (1.0 - x.exp());
                if arg <= 0.0 {
                    return None;
                }
                Some(1.0 - arg.ln() / x)
            };
            let at_breast = relative(BREAST_HEIGHT)?;
            if at_breast <= 0.0 {
                return None;
            }
            Some(dbh * relative(LOG_HEIGHT)? / at_breast)
        }
    }
}

/// Merchantable volume per assortment band, largest top diameter first.
///
/// The volume of the largest band moves down one band when the stem is
/// thinner than that band's top diameter at 2 m; for a single-band species it
/// falls out of the priced assortments.
pub fn assortment_volumes(model: &TimberModel, dbh: f64, height: f64, merchantable: f64) -> Vec<f64> {
    if dbh <= 0.0 || merchantable <= 0.0 {
        return vec![0.0; model.top_diameters.len()];
    }

    let ratio = model.ratio;
    let up_to = |top: f64| {
        merchantable * (-ratio.k * top.powf(ratio.top_exp) / dbh.powf(ratio.dbh_exp)).exp()
    };

    let mut bands = Vec::with_capacity(model.top_diameters.len());
    let mut previous = 0.0;
    for &top in model.top_diameters {
        let cumulative = up_to(top);
        bands.push((cumulative - previous).max(0.0));
        previous = cumulative;
    }

    let largest_top = model.top_diameters.first().copied().unwrap_or(0.0);
    let d2 = diameter_at_2m(model.profile, dbh, height);
    let thick_enough = matches!(d2, Some(d) if d >= largest_top);
    if !thick_enough {
        if d2.is_none() {
            tracing::warn!(dbh, height, "2 m diameter undefined, largest assortment reclassified");
        }
        if bands.len() > 1 {
            bands[1] += bands[0];
        }
        if let Some(first) = bands.first_mut() {
            *first = 0.0;
        }
    }

    bands
}

/// Value of a tree's merchantable volume at the configured unit prices.
///
/// Species without an assortment model are worth 0.
pub fn wood_value(tree: &Tree, merchantable: f64, prices: &TimberPrices) -> f64 {
    let Some(model) = SpeciesCoefficients::for_species(tree.species).timber else {
        return 0.0;
    };
    assortment_volumes(&model, tree.est_dbh, tree.est_height, merchantable)
        .iter()
        .zip(prices.for_species(tree.species))
        .map(|(volume, price)| volume * price)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Species, TreeStatus};
    use assert_approx_eq::assert_approx_eq;

    fn timber(species: Species) -> TimberModel {
        SpeciesCoefficients::for_species(species).timber.unwrap()
    }

    fn tree(species: Species, dbh: f64, height: f64) -> Tree {
        Tree::new(1, species, Some(dbh), Some(height), TreeStatus::Alive)
    }

    #[test]
    fn test_paraboloid_diameter_at_2m() {
        let d2 = diameter_at_2m(StemProfile::Paraboloid, 30.0, 20.0).unwrap();
        assert_approx_eq!(d2, 30.0 * (18.0f64 / 18.7).sqrt(), 1e-9);
        assert_eq!(diameter_at_2m(StemProfile::Paraboloid, 30.0, 1.8), Some(0.0));
    }

    #[test]
    fn test_log_taper_slightly_below_dbh() {
        let profile = timber(Species::Ec).profile;
        let d2 = diameter_at_2m(profile, 20.0, 20.0).unwrap();
        assert!(d2 < 20.0);
        assert!(d2 > 18.0);
    }

    #[test]
    fn test_log_taper_guard_on_short_trees() {
        let profile = timber(Species::Ec).profile;
        assert_eq!(diameter_at_2m(profile, 6.0, 1.5), None);
        assert_eq!(diameter_at_2m(profile, 6.0, 0.0), None);
    }

    #[test]
    fn test_reference_maritime_pine_value() {
        let t = tree(Species::Pb, 12.0, 14.0);
        let value = wood_value(&t, 0.0541064, &TimberPrices::default());
        assert_approx_eq!(value, 0.94, 0.005);
    }

    #[test]
    fn test_bands_sum_to_volume_above_smallest_top() {
        let model = timber(Species::Pb);
        let bands = assortment_volumes(&model, 40.0, 25.0, 1.2);
        assert_eq!(bands.len(), 3);
        let above_7 = 1.2 * (-0.6360 * 7f64.powf(3.2408) / 40f64.powf(3.2019)).exp();
        assert_approx_eq!(bands.iter().sum::<f64>(), above_7, 1e-9);
        assert!(bands[0] > 0.0);
    }

    #[test]
    fn test_thin_pine_loses_largest_band() {
        let model = timber(Species::Pb);
        // 2 m diameter of a 36 cm, 5 m tall pine is well under 35 cm
        let bands = assortment_volumes(&model, 36.0, 5.0, 0.5);
        assert_eq!(bands[0], 0.0);
        assert!(bands[1] > 0.0);
    }

    #[test]
    fn test_eucalyptus_below_threshold_has_no_value() {
        let t = tree(Species::Ec, 6.0, 1.5);
        assert_eq!(wood_value(&t, 0.002, &TimberPrices::default()), 0.0);
    }

    #[test]
    fn test_eucalyptus_single_band_priced() {
        let t = tree(Species::Ec, 20.0, 22.0);
        let value = wood_value(&t, 0.28, &TimberPrices::default());
        let above_6 = 0.28 * (-0.7 * 6f64.powf(3.1) / 20f64.powf(3.0)).exp();
        assert_approx_eq!(value, above_6 * 38.0, 1e-9);
    }

    #[test]
    fn test_species_without_assortments_worth_nothing() {
        for species in [Species::Pm, Species::Sb] {
            let t = tree(species, 30.0, 10.0);
            assert_eq!(wood_value(&t, 0.4, &TimberPrices::default()), 0.0);
        }
    }

    #[test]
    fn test_zero_volume_is_worth_nothing() {
        let t = tree(Species::Pb, 20.0, 15.0);
        assert_eq!(wood_value(&t, 0.0, &TimberPrices::default()), 0.0);
    }
}
