use std::f64::consts::PI;

use crate::analysis::Dominance;
use crate::error::ForestError;
use crate::models::{expansion_factor, MainSpecies, SpeciesCoefficients, Stand, Tree, TreeStatus};

/// Aggregate per-tree metrics into per-hectare stand figures.
///
/// Sums (basal area, volumes, value, biomass) run over alive trees only.
/// Site index and age are left at 0 for the site index stage to fill in.
pub fn aggregate_stand(
    trees: &[Tree],
    area_m2: f64,
    dominance: &Dominance,
) -> Result<Stand, ForestError> {
    let f = expansion_factor(area_m2)?;

    let count = |status: TreeStatus| trees.iter().filter(|t| t.status == status).count();
    let n = trees.len() as f64 * f;
    let n_alive = count(TreeStatus::Alive) as f64 * f;
    let n_dead = count(TreeStatus::Dead) as f64 * f;
    let n_missing = count(TreeStatus::Missing) as f64 * f;
    let n_stump = count(TreeStatus::Stump) as f64 * f;

    let alive: Vec<&Tree> = trees.iter().filter(|t| t.is_alive()).collect();
    let per_ha = |value: fn(&Tree) -> f64| alive.iter().map(|t| value(*t)).sum::<f64>() * f;
    let basal_area = per_ha(|t| t.metrics.basal_area);
    let volume = per_ha(|t| t.metrics.volume);
    let merchantable_volume = per_ha(|t| t.metrics.merchantable_volume);
    let wood_value = per_ha(|t| t.metrics.wood_value);
    let biomass = per_ha(|t| t.metrics.biomass.total) / 1000.0;

    if n_alive == 0.0 {
        return Err(ForestError::ComputationError(
            "quadratic mean diameter is undefined without alive trees".to_string(),
        ));
    }
    let quadratic_mean_diameter = (4.0 * basal_area / (PI * n_alive)).sqrt() * 100.0;

    if dominance.height <= 0.0 {
        return Err(ForestError::ComputationError(format!(
            "Wilson factor is undefined for dominant height {}",
            dominance.height
        )));
    }
    let wilson_factor = 100.0 / (dominance.height * n_alive.sqrt());

    let stand_density_index = match dominance.main_species {
        MainSpecies::Single(species) => {
            let exponent = SpeciesCoefficients::for_species(species).sdi_exponent;
            n_alive * (quadratic_mean_diameter / 25.0).powf(exponent)
        }
        MainSpecies::Mixed => {
            tracing::warn!("mixed stand: stand density index set to 0");
            0.0
        }
    };

    tracing::debug!(n, n_alive, basal_area, volume, "stand aggregated");

    Ok(Stand {
        area_m2,
        age: 0.0,
        tree_count: trees.len(),
        n,
        n_alive,
        n_dead,
        n_missing,
        n_stump,
        main_species: dominance.main_species,
        dominant_count: dominance.count,
        dominant_height: dominance.height,
        dominant_diameter: dominance.diameter,
        basal_area,
        volume,
        merchantable_volume,
        wood_value,
        biomass,
        quadratic_mean_diameter,
        wilson_factor,
        stand_density_index,
        site_index: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Species, TreeMetrics};
    use assert_approx_eq::assert_approx_eq;

    fn make_tree(id: u32, status: TreeStatus, basal_area: f64, volume: f64) -> Tree {
        let mut tree = Tree::new(id, Species::Pb, Some(12.0), Some(14.0), status);
        tree.metrics = TreeMetrics {
            basal_area,
            volume,
            ..TreeMetrics::default()
        };
        tree
    }

    fn dominance(main_species: MainSpecies, height: f64) -> Dominance {
        Dominance {
            main_species,
            count: 1,
            height,
            diameter: 12.0,
        }
    }

    #[test]
    fn test_densities_per_status() {
        let trees = vec![
            make_tree(1, TreeStatus::Alive, 0.01, 0.1),
            make_tree(2, TreeStatus::Alive, 0.01, 0.1),
            make_tree(3, TreeStatus::Dead, 0.0, 0.1),
            make_tree(4, TreeStatus::Missing, 0.0, 0.0),
            make_tree(5, TreeStatus::Stump, 0.0, 0.0),
        ];
        let stand =
            aggregate_stand(&trees, 500.0, &dominance(MainSpecies::Single(Species::Pb), 14.0))
                .unwrap();
        assert_eq!(stand.tree_count, 5);
        assert_eq!(stand.n, 100.0);
        assert_eq!(stand.n_alive, 40.0);
        assert_eq!(stand.n_dead, 20.0);
        assert_eq!(stand.n_missing, 20.0);
        assert_eq!(stand.n_stump, 20.0);
    }

    #[test]
    fn test_sums_use_alive_trees_only() {
        let trees = vec![
            make_tree(1, TreeStatus::Alive, 0.02, 0.3),
            make_tree(2, TreeStatus::Dead, 0.0, 0.5),
        ];
        let stand =
            aggregate_stand(&trees, 1000.0, &dominance(MainSpecies::Single(Species::Pb), 14.0))
                .unwrap();
        assert_approx_eq!(stand.basal_area, 0.2, 1e-12);
        assert_approx_eq!(stand.volume, 3.0, 1e-12);
    }

    #[test]
    fn test_quadratic_mean_diameter_of_uniform_stand() {
        let ba = basal(20.0);
        let trees: Vec<Tree> = (1..=4)
            .map(|i| make_tree(i, TreeStatus::Alive, ba, 0.0))
            .collect();
        let stand =
            aggregate_stand(&trees, 400.0, &dominance(MainSpecies::Single(Species::Pb), 14.0))
                .unwrap();
        assert_approx_eq!(stand.quadratic_mean_diameter, 20.0, 1e-9);
    }

    fn basal(dbh: f64) -> f64 {
        PI * (dbh / 200.0).powi(2)
    }

    #[test]
    fn test_wilson_factor() {
        let trees: Vec<Tree> = (1..=4)
            .map(|i| make_tree(i, TreeStatus::Alive, basal(12.0), 0.0))
            .collect();
        let stand =
            aggregate_stand(&trees, 400.0, &dominance(MainSpecies::Single(Species::Pb), 10.0))
                .unwrap();
        // 100 trees/ha, hdom 10 m
        assert_approx_eq!(stand.wilson_factor, 100.0 / (10.0 * 10.0), 1e-12);
    }

    #[test]
    fn test_sdi_uses_main_species_exponent() {
        let trees: Vec<Tree> = (1..=4)
            .map(|i| make_tree(i, TreeStatus::Alive, basal(12.0), 0.0))
            .collect();
        let stand =
            aggregate_stand(&trees, 400.0, &dominance(MainSpecies::Single(Species::Pb), 14.0))
                .unwrap();
        assert_approx_eq!(
            stand.stand_density_index,
            100.0 * (12.0f64 / 25.0).powf(1.897),
            1e-9
        );
    }

    #[test]
    fn test_mixed_stand_sdi_is_zero() {
        let trees = vec![make_tree(1, TreeStatus::Alive, basal(12.0), 0.0)];
        let stand = aggregate_stand(&trees, 100.0, &dominance(MainSpecies::Mixed, 14.0)).unwrap();
        assert_eq!(stand.stand_density_index, 0.0);
        assert_eq!(stand.main_species, MainSpecies::Mixed);
    }

    #[test]
    fn test_no_alive_trees_fails() {
        let trees = vec![make_tree(1, TreeStatus::Dead, 0.0, 0.2)];
        let err = aggregate_stand(&trees, 100.0, &dominance(MainSpecies::Mixed, 14.0)).unwrap_err();
        assert!(matches!(err, ForestError::ComputationError(_)));
    }

    #[test]
    fn test_zero_area_is_configuration_error() {
        let trees = vec![make_tree(1, TreeStatus::Alive, 0.01, 0.1)];
        let err = aggregate_stand(&trees, 0.0, &dominance(MainSpecies::Mixed, 14.0)).unwrap_err();
        assert!(matches!(err, ForestError::ConfigurationError(_)));
    }
}
