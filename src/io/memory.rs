//! In-memory grid source.

use std::collections::HashMap;

use ndarray::Array2;

use super::{AttributeValue, GridSource, check_step};
use crate::error::GridError;

/// Grid source backed by arrays held in memory.
///
/// Useful for synthetic grids and for data already read by other means.
#[derive(Debug, Clone)]
pub struct MemoryGridSource {
    lon: Array2<f64>,
    lat: Array2<f64>,
    mask: Option<Array2<bool>>,
    variables: HashMap<String, Vec<Array2<f64>>>,
    attributes: HashMap<(String, String), AttributeValue>,
}

impl MemoryGridSource {
    /// Source with coordinates only; the mask defaults to all ocean.
    pub fn new(lon: Array2<f64>, lat: Array2<f64>) -> Self {
        Self {
            lon,
            lat,
            mask: None,
            variables: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    /// Set the ocean mask.
    pub fn with_mask(mut self, mask: Array2<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Add a static variable.
    pub fn with_variable(mut self, name: impl Into<String>, field: Array2<f64>) -> Self {
        self.variables.insert(name.into(), vec![field]);
        self
    }

    /// Add a time-dependent variable, one array per step.
    pub fn with_series(mut self, name: impl Into<String>, steps: Vec<Array2<f64>>) -> Self {
        self.variables.insert(name.into(), steps);
        self
    }

    /// Attach an attribute to a variable.
    pub fn with_attribute(
        mut self,
        variable: impl Into<String>,
        name: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        self.attributes.insert((variable.into(), name.into()), value);
        self
    }

    fn steps(&self, name: &str) -> Result<&[Array2<f64>], GridError> {
        self.variables
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GridError::MissingVariable(name.to_string()))
    }
}

impl GridSource for MemoryGridSource {
    fn lon(&self) -> Result<Array2<f64>, GridError> {
        Ok(self.lon.clone())
    }

    fn lat(&self) -> Result<Array2<f64>, GridError> {
        Ok(self.lat.clone())
    }

    fn mask(&self) -> Result<Array2<bool>, GridError> {
        Ok(self
            .mask
            .clone()
            .unwrap_or_else(|| Array2::from_elem(self.lon.raw_dim(), true)))
    }

    fn variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variables.keys().cloned().collect();
        names.sort();
        names
    }

    fn time_steps(&self, name: &str) -> Result<usize, GridError> {
        Ok(self.steps(name)?.len())
    }

    fn variable_at(&self, name: &str, step: usize) -> Result<Array2<f64>, GridError> {
        let steps = self.steps(name)?;
        check_step(name, step, steps.len())?;
        Ok(steps[step].clone())
    }

    fn attribute(&self, variable: &str, name: &str) -> Result<AttributeValue, GridError> {
        self.attributes
            .get(&(variable.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| GridError::MissingAttribute {
                variable: variable.to_string(),
                attribute: name.to_string(),
            })
    }
}
