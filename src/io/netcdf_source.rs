//! NetCDF grid source.
//!
//! Reads gridded products such as AVISO altimetry or ROMS output:
//!
//! - coordinate variables are detected by name ([`LON_NAMES`], [`LAT_NAMES`])
//!   and 1-D axes are expanded to 2-D
//! - the mask comes from a mask variable ([`MASK_NAMES`], non-zero is ocean),
//!   or is all ocean when none exists
//! - variables are unpacked with `scale_factor`/`add_offset`, with
//!   `_FillValue`/`missing_value` cells set to NaN
//!
//! Variables may be `(y, x)`, `(time, y, x)` or `(time, depth, y, x)`; for the
//! last form the first level is read.

use std::path::{Path, PathBuf};

use ndarray::Array2;

use super::{AttributeValue, GridSource, check_step};
use crate::error::GridError;

/// Candidate longitude variable names, in lookup order.
pub const LON_NAMES: [&str; 4] = ["lon", "longitude", "nav_lon", "lon_rho"];
/// Candidate latitude variable names, in lookup order.
pub const LAT_NAMES: [&str; 4] = ["lat", "latitude", "nav_lat", "lat_rho"];
/// Candidate mask variable names, in lookup order.
pub const MASK_NAMES: [&str; 3] = ["mask_rho", "mask", "tmask"];

/// Values beyond this magnitude are treated as missing.
const HUGE_VALUE: f64 = 1e30;

/// Grid source over a NetCDF file.
pub struct NetcdfGridSource {
    path: PathBuf,
    file: netcdf::File,
    lon_name: &'static str,
    lat_name: &'static str,
    shape: (usize, usize),
}

impl std::fmt::Debug for NetcdfGridSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcdfGridSource")
            .field("path", &self.path)
            .field("lon_name", &self.lon_name)
            .field("lat_name", &self.lat_name)
            .field("shape", &self.shape)
            .finish()
    }
}

impl NetcdfGridSource {
    /// Open a file and detect its coordinate variables.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref().to_path_buf();
        let file = netcdf::open(&path)?;
        let (lon_name, lat_name) = Self::detect_coordinates(&file)?;

        let lon_var = file
            .variable(lon_name)
            .ok_or_else(|| GridError::MissingVariable(lon_name.to_string()))?;
        let lat_var = file
            .variable(lat_name)
            .ok_or_else(|| GridError::MissingVariable(lat_name.to_string()))?;
        let shape = match (lon_var.dimensions(), lat_var.dimensions()) {
            ([y, x], _) => (y.len(), x.len()),
            ([x], [y]) => (y.len(), x.len()),
            (lon_dims, lat_dims) => {
                return Err(GridError::invalid_shape(
                    "netcdf coordinates",
                    format!(
                        "{} has rank {}, {} has rank {}",
                        lon_name,
                        lon_dims.len(),
                        lat_name,
                        lat_dims.len()
                    ),
                ));
            }
        };

        tracing::info!(
            path = %path.display(),
            lon = lon_name,
            lat = lat_name,
            ny = shape.0,
            nx = shape.1,
            "Opened grid file"
        );

        Ok(Self {
            path,
            file,
            lon_name,
            lat_name,
            shape,
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Grid shape `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    fn detect_coordinates(file: &netcdf::File) -> Result<(&'static str, &'static str), GridError> {
        let lon = LON_NAMES.iter().find(|name| file.variable(name).is_some());
        let lat = LAT_NAMES.iter().find(|name| file.variable(name).is_some());
        match (lon, lat) {
            (Some(&lon), Some(&lat)) => Ok((lon, lat)),
            _ => Err(GridError::MissingVariable("lat/lon coordinates".to_string())),
        }
    }

    fn nc_variable(&self, name: &str) -> Result<netcdf::Variable<'_>, GridError> {
        self.file
            .variable(name)
            .ok_or_else(|| GridError::MissingVariable(name.to_string()))
    }

    /// Read a coordinate variable as a 2-D array, expanding 1-D axes.
    fn read_coordinate(&self, name: &str, along_columns: bool) -> Result<Array2<f64>, GridError> {
        let var = self.nc_variable(name)?;
        let values: Vec<f64> = var.get_values(..)?;
        if var.dimensions().len() == 2 {
            return to_array2(values, self.shape);
        }
        let expected = if along_columns { self.shape.1 } else { self.shape.0 };
        if values.len() != expected {
            return Err(GridError::invalid_shape(
                "netcdf coordinates",
                format!("{} has {} values, grid needs {}", name, values.len(), expected),
            ));
        }
        let expanded = if along_columns {
            Array2::from_shape_fn(self.shape, |(_, i)| values[i])
        } else {
            Array2::from_shape_fn(self.shape, |(j, _)| values[j])
        };
        Ok(expanded)
    }

    fn number_attribute(var: &netcdf::Variable, name: &str) -> Option<f64> {
        var.attribute_value(name)
            .and_then(|r| r.ok())
            .and_then(|v| convert_attribute(v).and_then(|a| a.as_f64()))
    }
}

impl GridSource for NetcdfGridSource {
    fn lon(&self) -> Result<Array2<f64>, GridError> {
        self.read_coordinate(self.lon_name, true)
    }

    fn lat(&self) -> Result<Array2<f64>, GridError> {
        self.read_coordinate(self.lat_name, false)
    }

    fn mask(&self) -> Result<Array2<bool>, GridError> {
        match MASK_NAMES.iter().find(|name| self.file.variable(name).is_some()) {
            Some(name) => {
                let mask = self.variable_at(name, 0)?;
                Ok(mask.mapv(|m| m.is_finite() && m != 0.0))
            }
            None => {
                tracing::debug!(path = %self.path.display(), "No mask variable, assuming all ocean");
                Ok(Array2::from_elem(self.shape, true))
            }
        }
    }

    fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    fn time_steps(&self, name: &str) -> Result<usize, GridError> {
        let var = self.nc_variable(name)?;
        let dims = var.dimensions();
        Ok(if dims.len() > 2 { dims[0].len() } else { 1 })
    }

    fn variable_at(&self, name: &str, step: usize) -> Result<Array2<f64>, GridError> {
        let var = self.nc_variable(name)?;
        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let rank = dims.len();
        if rank < 2 {
            return Err(GridError::invalid_shape(
                "netcdf variable",
                format!("{} has rank {}, need at least 2", name, rank),
            ));
        }
        let shape = (dims[rank - 2], dims[rank - 1]);
        if shape != self.shape {
            return Err(GridError::shape_mismatch(self.shape, shape));
        }
        let steps = if rank > 2 { dims[0] } else { 1 };
        check_step(name, step, steps)?;

        // Only the requested plane is read; for 4-D data that is the first level
        let plane_values: Vec<f64> = match rank {
            2 => var.get_values(..)?,
            3 => var.get_values((step, .., ..))?,
            4 => var.get_values((step, 0, .., ..))?,
            _ => {
                return Err(GridError::invalid_shape(
                    "netcdf variable",
                    format!("{} has rank {}, need at most 4", name, rank),
                ));
            }
        };

        let scale = Self::number_attribute(&var, "scale_factor").unwrap_or(1.0);
        let offset = Self::number_attribute(&var, "add_offset").unwrap_or(0.0);
        let fill = Self::number_attribute(&var, "_FillValue");
        let missing = Self::number_attribute(&var, "missing_value");

        let unpacked = plane_values
            .into_iter()
            .map(|v| {
                if !v.is_finite() || Some(v) == fill || Some(v) == missing || v.abs() > HUGE_VALUE {
                    f64::NAN
                } else {
                    v * scale + offset
                }
            })
            .collect();
        to_array2(unpacked, shape)
    }

    fn attribute(&self, variable: &str, name: &str) -> Result<AttributeValue, GridError> {
        let var = self.nc_variable(variable)?;
        let missing = || GridError::MissingAttribute {
            variable: variable.to_string(),
            attribute: name.to_string(),
        };
        let value = var.attribute_value(name).ok_or_else(missing)??;
        convert_attribute(value).ok_or_else(missing)
    }
}

fn to_array2(values: Vec<f64>, shape: (usize, usize)) -> Result<Array2<f64>, GridError> {
    let len = values.len();
    Array2::from_shape_vec(shape, values).map_err(|_| {
        GridError::invalid_shape(
            "netcdf variable",
            format!("{} values do not fill a {}x{} grid", len, shape.0, shape.1),
        )
    })
}

fn convert_attribute(value: netcdf::AttributeValue) -> Option<AttributeValue> {
    use netcdf::AttributeValue as Nc;
    Some(match value {
        Nc::Double(d) => AttributeValue::Number(d),
        Nc::Float(f) => AttributeValue::Number(f as f64),
        Nc::Int(i) => AttributeValue::Number(i as f64),
        Nc::Short(s) => AttributeValue::Number(s as f64),
        Nc::Schar(c) => AttributeValue::Number(c as f64),
        Nc::Uchar(c) => AttributeValue::Number(c as f64),
        Nc::Doubles(ds) => AttributeValue::Numbers(ds),
        Nc::Floats(fs) => AttributeValue::Numbers(fs.into_iter().map(f64::from).collect()),
        Nc::Ints(is) => AttributeValue::Numbers(is.into_iter().map(f64::from).collect()),
        Nc::Shorts(ss) => AttributeValue::Numbers(ss.into_iter().map(f64::from).collect()),
        Nc::Str(s) => AttributeValue::Text(s),
        _ => return None,
    })
}
