pub use crate::config::*;

use log::debug;
use std::collections::{HashMap, HashSet};

/// A builder for grouping cities under their department, one pair at a time.
///
/// ```
/// use geo_grouping::builder::Builder;
///
/// let mut builder = Builder::new();
/// builder.add_row("Antioquia", "Medellín");
/// builder.add_row(" Antioquia ", "Itagüí");
/// builder.add_row("Chocó", "");
///
/// let doc = builder.build();
/// assert_eq!(doc.departments.len(), 1);
/// assert_eq!(doc.departments[0].cities, vec!["Itagüí", "Medellín"]);
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    // The departments in first-seen order, with their cities in insertion order.
    _groups: Vec<(String, Vec<String>)>,
    // Position of each department in _groups
    _positions: HashMap<String, usize>,
    // Cities already added, per position in _groups
    _seen: Vec<HashSet<String>>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Adds a (department, city) pair.
    ///
    /// Both names are trimmed. The pair is ignored if one of the names is empty
    /// after trimming, or if the city was already added for this department.
    /// Returns true if the city was added.
    pub fn add_row(&mut self, department: &str, city: &str) -> bool {
        let department = department.trim();
        let city = city.trim();
        if department.is_empty() || city.is_empty() {
            debug!(
                "add_row: skipping incomplete row: department: {:?} city: {:?}",
                department, city
            );
            return false;
        }
        let pos = match self._positions.get(department) {
            Some(pos) => *pos,
            None => {
                let pos = self._groups.len();
                self._groups.push((department.to_string(), Vec::new()));
                self._seen.push(HashSet::new());
                self._positions.insert(department.to_string(), pos);
                pos
            }
        };
        if self._seen[pos].insert(city.to_string()) {
            self._groups[pos].1.push(city.to_string());
            true
        } else {
            false
        }
    }

    pub fn num_departments(&self) -> usize {
        self._groups.len()
    }

    /// Assembles the document. The cities of each department are sorted at this point.
    pub fn build(self) -> GeographyDocument {
        let departments = self
            ._groups
            .into_iter()
            .map(|(name, mut cities)| {
                cities.sort();
                Department { name, cities }
            })
            .collect();
        GeographyDocument { departments }
    }
}
