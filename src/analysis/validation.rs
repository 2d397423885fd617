use std::collections::HashSet;

use crate::error::ForestError;
use crate::models::{Species, Tree, TreeRecord, TreeStatus};

/// Validate one raw record and admit it as a [`Tree`].
///
/// Checks run in field order (id, species, dbh, height, status) and stop at
/// the first violation.
pub fn validate_record(record: &TreeRecord) -> Result<Tree, ForestError> {
    let id = validate_id(record.id)?;
    let species: Species = record
        .species
        .parse()
        .map_err(|_| {
            ForestError::validation(
                "species",
                format!(
                    "Tree {id}: species '{}' is not one of Pb, Pm, Ec, Sb",
                    record.species
                ),
            )
        })?;

    if let Some(dbh) = record.dbh {
        validate_dbh(id, species, dbh)?;
    }
    if let Some(height) = record.height {
        validate_number(id, "height", height)?;
    }

    let status: TreeStatus = record.status.parse().map_err(|_| {
        ForestError::validation(
            "status",
            format!("Tree {id}: unknown status code '{}'", record.status),
        )
    })?;

    if status == TreeStatus::Stump {
        if let Some(height) = record.height.filter(|h| *h > 0.0) {
            return Err(ForestError::validation(
                "height",
                format!("Tree {id}: a stump must have height 0, got {height} m"),
            ));
        }
    }

    if record.dbh.is_none() && record.height.is_none() && status != TreeStatus::Missing {
        return Err(ForestError::validation(
            "dbh",
            format!("Tree {id}: both DBH and height are missing"),
        ));
    }

    Ok(Tree::new(id, species, record.dbh, record.height, status))
}

/// Validate every record of a plot, rejecting duplicate ids.
pub fn validate_records(records: &[TreeRecord]) -> Result<Vec<Tree>, ForestError> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut trees = Vec::with_capacity(records.len());

    for record in records {
        let tree = validate_record(record)?;
        if !seen.insert(tree.id) {
            return Err(ForestError::validation(
                "id",
                format!("Tree id {} appears more than once on the plot", tree.id),
            ));
        }
        trees.push(tree);
    }

    tracing::debug!(trees = trees.len(), "records validated");
    Ok(trees)
}

fn validate_id(id: f64) -> Result<u32, ForestError> {
    if !id.is_finite() || id.fract() != 0.0 {
        return Err(ForestError::validation(
            "id",
            format!("tree id must be an integer, got {id}"),
        ));
    }
    if id <= 0.0 {
        return Err(ForestError::validation(
            "id",
            format!("tree id must be positive, got {id}"),
        ));
    }
    if id > u32::MAX as f64 {
        return Err(ForestError::validation(
            "id",
            format!("tree id {id} is out of range"),
        ));
    }
    Ok(id as u32)
}

fn validate_number(id: u32, field: &str, value: f64) -> Result<(), ForestError> {
    if !value.is_finite() {
        return Err(ForestError::validation(
            field,
            format!("Tree {id}: {field} must be a finite number, got {value}"),
        ));
    }
    if value < 0.0 {
        return Err(ForestError::validation(
            field,
            format!("Tree {id}: {field} must not be negative, got {value}"),
        ));
    }
    Ok(())
}

fn validate_dbh(id: u32, species: Species, dbh: f64) -> Result<(), ForestError> {
    validate_number(id, "dbh", dbh)?;
    if dbh < species.min_dbh() {
        let message = match species {
            Species::Ec => format!(
                "Tree {id}: Eucalyptus DBH {dbh} cm is below the 5 cm minimum for the species"
            ),
            _ => format!(
                "Tree {id}: DBH {dbh} cm is below 7.5 cm and is not considered a tree"
            ),
        };
        return Err(ForestError::validation("dbh", message));
    }
    Ok(())
}
