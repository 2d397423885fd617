mod tables;
mod charts;

pub use tables::{
    format_stand_summary, print_stand_summary,
    format_tree_table, print_tree_table,
    format_species_reference, print_species_reference,
};
pub use charts::{format_diameter_histogram, print_diameter_histogram};
