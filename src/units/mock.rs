// src/units/mock.rs

use super::UnitRegistry;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Registry backed by a fixed set of unit names. Records every query.
#[derive(Debug, Clone, Default)]
pub struct StaticUnitRegistry {
    units: BTreeSet<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl StaticUnitRegistry {
    pub fn with_units<I, S>(units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            units: units.into_iter().map(Into::into).collect(),
            queries: Arc::default(),
        }
    }

    /// Every unit name asked about, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl UnitRegistry for StaticUnitRegistry {
    fn exists(&self, unit: &str) -> bool {
        self.queries.lock().unwrap().push(unit.to_string());
        self.units.contains(unit)
    }
}
