//! Package-category dimension expansion.
//!
//! When a row carries a package category, the category's standard parcel
//! dimensions overwrite whatever dimension values the row already had:
//! the category is the more deliberate signal. Unknown categories leave
//! the row untouched.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::domain::fields::{HEIGHT, LENGTH, PACKAGE_CATEGORY, WEIGHT, WIDTH};
use crate::domain::CanonicalRow;

/// length / width / height in cm, weight in kg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

static CATEGORY_DIMENSIONS: Lazy<HashMap<&'static str, CategoryDimensions>> = Lazy::new(|| {
    let mut table = HashMap::new();
    let mut add = |names: &[&'static str], dims: CategoryDimensions| {
        for name in names {
            table.insert(*name, dims);
        }
    };

    add(
        &["smartphone", "phone"],
        CategoryDimensions { length: 20.0, width: 11.0, height: 6.0, weight: 0.5 },
    );
    add(
        &["tablet"],
        CategoryDimensions { length: 30.0, width: 23.0, height: 6.0, weight: 1.0 },
    );
    add(
        &["laptop"],
        CategoryDimensions { length: 45.0, width: 33.0, height: 10.0, weight: 3.0 },
    );
    add(
        &["smartwatch", "watch"],
        CategoryDimensions { length: 15.0, width: 10.0, height: 8.0, weight: 0.4 },
    );
    add(
        &["desktop"],
        CategoryDimensions { length: 50.0, width: 45.0, height: 25.0, weight: 8.0 },
    );
    add(
        &["monitor"],
        CategoryDimensions { length: 70.0, width: 50.0, height: 20.0, weight: 7.0 },
    );
    add(
        &["console"],
        CategoryDimensions { length: 45.0, width: 35.0, height: 15.0, weight: 4.0 },
    );
    add(
        &["earbuds"],
        CategoryDimensions { length: 15.0, width: 10.0, height: 6.0, weight: 0.3 },
    );
    add(
        &["accessory", "accessories"],
        CategoryDimensions { length: 20.0, width: 15.0, height: 8.0, weight: 0.5 },
    );
    table
});

pub fn dimensions_for(category: &str) -> Option<CategoryDimensions> {
    CATEGORY_DIMENSIONS
        .get(category.trim().to_lowercase().as_str())
        .copied()
}

/// Expand category-implied dimensions into the row. Returns a new row;
/// the input is left untouched.
pub fn expand(row: &CanonicalRow) -> CanonicalRow {
    let mut expanded = row.clone();
    let category = match row.get(PACKAGE_CATEGORY) {
        Some(c) => c,
        None => return expanded,
    };
    if let Some(dims) = dimensions_for(category) {
        expanded.set(LENGTH, format_dim(dims.length));
        expanded.set(WIDTH, format_dim(dims.width));
        expanded.set(HEIGHT, format_dim(dims.height));
        expanded.set(WEIGHT, format_dim(dims.weight));
    }
    expanded
}

fn format_dim(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with(pairs: &[(&str, &str)]) -> CanonicalRow {
        let mut row = CanonicalRow::new();
        for (field, value) in pairs {
            row.set(field, value.to_string());
        }
        row
    }

    #[test]
    fn test_hit_overwrites_existing_dimensions() {
        let row = row_with(&[
            (PACKAGE_CATEGORY, " Laptop "),
            (LENGTH, "99"),
            (WEIGHT, "99"),
        ]);
        let expanded = expand(&row);
        assert_eq!(expanded.get(LENGTH), Some("45"));
        assert_eq!(expanded.get(WIDTH), Some("33"));
        assert_eq!(expanded.get(HEIGHT), Some("10"));
        assert_eq!(expanded.get(WEIGHT), Some("3"));
    }

    #[test]
    fn test_miss_leaves_row_untouched() {
        let row = row_with(&[(PACKAGE_CATEGORY, "furniture"), (LENGTH, "99")]);
        let expanded = expand(&row);
        assert_eq!(expanded.get(LENGTH), Some("99"));
        assert!(expanded.get(WIDTH).is_none());
    }

    #[test]
    fn test_no_category_leaves_row_untouched() {
        let row = row_with(&[(LENGTH, "12")]);
        assert_eq!(expand(&row), row);
    }

    #[test]
    fn test_fractional_weight_keeps_decimal() {
        let row = row_with(&[(PACKAGE_CATEGORY, "smartphone")]);
        assert_eq!(expand(&row).get(WEIGHT), Some("0.5"));
    }
}
