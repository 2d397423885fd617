use crate::error::ForestError;
use crate::models::{DiameterTransform, Species, SpeciesCoefficients, Tree, TreeStatus};

/// Total height (m) predicted from DBH (cm) by the species' height-diameter model.
pub fn height_from_dbh(species: Species, dbh: f64) -> Result<f64, ForestError> {
    let model = SpeciesCoefficients::for_species(species).hypsometric;
    let x = match model.transform {
        DiameterTransform::Identity => dbh,
        DiameterTransform::SquareRoot => dbh.sqrt(),
    };
    let denominator = model.a + model.b * x;
    if denominator <= 0.0 {
        return Err(ForestError::ComputationError(format!(
            "{species} height model is undefined for DBH {dbh} cm"
        )));
    }
    check_estimate(x / denominator, "height", species)
}

/// DBH (cm) from total height (m), by inverting the species' height-diameter model.
pub fn dbh_from_height(species: Species, height: f64) -> Result<f64, ForestError> {
    let model = SpeciesCoefficients::for_species(species).hypsometric;
    let denominator = 1.0 - model.b * height;
    if denominator <= 0.0 {
        return Err(ForestError::ComputationError(format!(
            "height {height} m is beyond the asymptote of the {species} height model"
        )));
    }
    let x = model.a * height / denominator;
    let dbh = match model.transform {
        DiameterTransform::Identity => x,
        DiameterTransform::SquareRoot => x * x,
    };
    check_estimate(dbh, "DBH", species)
}

fn check_estimate(value: f64, what: &str, species: Species) -> Result<f64, ForestError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ForestError::ComputationError(format!(
            "{species} {what} estimate is out of range ({value})"
        )));
    }
    Ok(value)
}

/// Fill the working DBH/height of one tree from its sibling measurement.
///
/// Missing trees are left untouched and stumps keep a zero height.
pub fn impute(tree: &mut Tree) -> Result<(), ForestError> {
    match tree.status {
        TreeStatus::Missing => return Ok(()),
        TreeStatus::Stump => {
            tree.est_height = 0.0;
            return Ok(());
        }
        TreeStatus::Alive | TreeStatus::Dead => {}
    }

    match (tree.dbh, tree.height) {
        (Some(dbh), Some(height)) => {
            tree.est_dbh = dbh;
            tree.est_height = height;
        }
        (Some(dbh), None) => {
            tree.est_dbh = dbh;
            tree.est_height = height_from_dbh(tree.species, dbh)?;
        }
        (None, Some(height)) => {
            tree.est_dbh = dbh_from_height(tree.species, height)?;
            tree.est_height = height;
        }
        (None, None) => {
            return Err(ForestError::ComputationError(format!(
                "Tree {} has neither DBH nor height to impute from",
                tree.id
            )));
        }
    }
    Ok(())
}

/// Impute every tree of the plot. Any failure aborts the whole plot.
pub fn impute_all(trees: &mut [Tree]) -> Result<(), ForestError> {
    for tree in trees.iter_mut() {
        impute(tree).map_err(|e| match e {
            ForestError::ComputationError(msg) => {
                ForestError::ComputationError(format!("Tree {}: {msg}", tree.id))
            }
            other => other,
        })?;
    }
    let imputed = trees.iter().filter(|t| t.is_imputed()).count();
    tracing::debug!(imputed, "hypsometric imputation done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_height_from_dbh_pb() {
        // 12 / (0.6 + 0.03 * 12)
        assert_approx_eq!(height_from_dbh(Species::Pb, 12.0).unwrap(), 12.5, 1e-9);
    }

    #[test]
    fn test_height_from_dbh_sb_uses_square_root() {
        // sqrt(16) / (0.2 + 0.07 * 4)
        assert_approx_eq!(height_from_dbh(Species::Sb, 16.0).unwrap(), 4.0 / 0.48, 1e-9);
    }

    #[test]
    fn test_inverse_recovers_dbh() {
        for species in Species::ALL {
            for dbh in [8.0, 15.0, 27.5, 42.0] {
                let h = height_from_dbh(species, dbh).unwrap();
                let back = dbh_from_height(species, h).unwrap();
                assert_approx_eq!(back, dbh, 1e-6);
            }
        }
    }

    #[test]
    fn test_inverse_beyond_asymptote_fails() {
        // Pb asymptote is 1 / 0.03 = 33.3 m
        let err = dbh_from_height(Species::Pb, 34.0).unwrap_err();
        assert!(matches!(err, ForestError::ComputationError(_)));
        let err = dbh_from_height(Species::Pb, 1.0 / 0.03).unwrap_err();
        assert!(err.to_string().contains("asymptote"));
    }

    #[test]
    fn test_tree_with_both_measurements_unchanged() {
        let mut tree = Tree::new(1, Species::Ec, Some(18.0), Some(21.0), TreeStatus::Alive);
        let before = tree.clone();
        impute(&mut tree).unwrap();
        assert_eq!(tree, before);
    }

    #[test]
    fn test_missing_height_is_imputed() {
        let mut tree = Tree::new(1, Species::Pb, Some(12.0), None, TreeStatus::Alive);
        impute(&mut tree).unwrap();
        assert_eq!(tree.est_dbh, 12.0);
        assert_approx_eq!(tree.est_height, 12.5, 1e-9);
        assert_eq!(tree.height, None);
    }

    #[test]
    fn test_missing_dbh_is_imputed() {
        let mut tree = Tree::new(1, Species::Pm, None, Some(8.0), TreeStatus::Dead);
        impute(&mut tree).unwrap();
        // 0.9 * 8 / (1 - 0.05 * 8)
        assert_approx_eq!(tree.est_dbh, 12.0, 1e-9);
        assert_eq!(tree.dbh, None);
    }

    #[test]
    fn test_missing_tree_not_imputed() {
        let mut tree = Tree::new(1, Species::Pb, None, None, TreeStatus::Missing);
        impute(&mut tree).unwrap();
        assert_eq!(tree.est_dbh, 0.0);
        assert_eq!(tree.est_height, 0.0);
    }

    #[test]
    fn test_stump_keeps_zero_height() {
        let mut tree = Tree::new(1, Species::Sb, Some(35.0), None, TreeStatus::Stump);
        impute(&mut tree).unwrap();
        assert_eq!(tree.est_dbh, 35.0);
        assert_eq!(tree.est_height, 0.0);
    }

    #[test]
    fn test_impute_all_reports_tree_id() {
        let mut trees = vec![
            Tree::new(1, Species::Pb, Some(12.0), None, TreeStatus::Alive),
            Tree::new(9, Species::Pb, None, Some(40.0), TreeStatus::Alive),
        ];
        let err = impute_all(&mut trees).unwrap_err();
        assert!(err.to_string().contains("Tree 9"));
    }
}
