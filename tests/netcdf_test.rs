//! NetCDF grid source round trip.
//!
//! Writes a small global altimetry-style file, reads it back through
//! `NetcdfGridSource` and runs a zero-crossing domain over it.

#![cfg(feature = "netcdf")]

use std::path::Path;
use std::sync::Arc;

use eddy_grid::{
    DomainConfig, GeoBounds, Grid, GridDomain, GridKind, GridSource, NetcdfGridSource,
    RecordingSink,
};
use tempfile::tempdir;

const NX: usize = 144;
const NY: usize = 40;

fn write_global(path: &Path) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    file.add_dimension("time", 1)?;
    file.add_dimension("latitude", NY)?;
    file.add_dimension("longitude", NX)?;

    let lons: Vec<f64> = (0..NX).map(|i| 1.25 + i as f64 * 2.5).collect();
    let lats: Vec<f64> = (0..NY).map(|j| -58.75 + j as f64 * 2.5).collect();
    let mut lon = file.add_variable::<f64>("longitude", &["longitude"])?;
    lon.put_attribute("units", "degrees_east")?;
    lon.put_values(&lons, ..)?;
    let mut lat = file.add_variable::<f64>("latitude", &["latitude"])?;
    lat.put_attribute("units", "degrees_north")?;
    lat.put_values(&lats, ..)?;

    // Meridional ramp in metres, packed as centimetres
    let mut adt = file.add_variable::<i32>("adt", &["time", "latitude", "longitude"])?;
    adt.put_attribute("scale_factor", 0.01f64)?;
    adt.put_attribute("add_offset", 0.0f64)?;
    let packed: Vec<i32> = (0..NY * NX).map(|k| (k / NX) as i32 * 2).collect();
    adt.put_values(&packed, ..)?;
    Ok(())
}

#[test]
fn test_netcdf_domain_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("global.nc");
    write_global(&path).unwrap();

    let source = NetcdfGridSource::open(&path).unwrap();
    assert_eq!(source.shape(), (NY, NX));
    assert_eq!(source.find_variable(&["sla", "adt"]), Some("adt".to_string()));

    let grid = Arc::new(Grid::from_source(&source, GridKind::Global).unwrap());
    assert!(grid.is_regular());
    assert_eq!(grid.resolution(), Some(2.5));

    let sink = RecordingSink::new();
    let config = DomainConfig::new("seam", GeoBounds::new(340.0, 20.0, -40.0, 20.0));
    let domain = GridDomain::new(grid, config, &sink).unwrap();
    assert!(domain.zero_crossing());

    let adt = source.variable("adt").unwrap();
    assert!((adt[[3, 10]] - 0.06).abs() < 1e-12);
    let vel = domain.velocity(adt.view(), &sink).unwrap();
    assert_eq!(vel.shape(), domain.shape());

    // SSH only varies with latitude: no meridional flow anywhere on the seam
    for v in vel.v.valid_values() {
        assert!(v.abs() < 1e-12);
    }
    let (z, m) = domain.gaussian_resolution(20.0, 10.0).unwrap();
    assert_eq!((z, m), (1.0, 0.5));
}
