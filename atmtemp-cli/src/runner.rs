//! Model execution and text export.

use crate::config::Configuration;
use anyhow::{Context, Result};
use atmtemp_core::{solve_atmosphere, EquilibriumProfile};
use log::{info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const TEMPERATURE_FILE: &str = "Temperature_Profile.txt";
pub const OPTICAL_DEPTH_FILE: &str = "OD_Profile.txt";

/// Relative energy imbalance at the top of the atmosphere above which a run is reported.
const ENERGY_BALANCE_TOLERANCE: f64 = 1e-6;

/// Solve the configured atmosphere and check its top-of-atmosphere energy balance.
pub fn run_model(config: &Configuration) -> Result<EquilibriumProfile> {
    let profile = solve_atmosphere(&config.atmosphere, &config.radiation)
        .context("radiative equilibrium solve failed")?;

    let olr = profile.outgoing_longwave(&config.radiation)?;
    let tsi = config.radiation.total_solar_irradiance();
    let imbalance = (olr - tsi).abs() / tsi;
    if imbalance > ENERGY_BALANCE_TOLERANCE {
        warn!(
            "Energy imbalance at the top of the atmosphere: OLR {:.6} W/m², absorbed {:.6} W/m²",
            olr, tsi
        );
    } else {
        info!("Outgoing long-wave radiation {:.4} W/m²", olr);
    }
    Ok(profile)
}

/// Write the height/temperature table.
pub fn write_temperature_table<W: Write>(profile: &EquilibriumProfile, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "# In this file is presented the temperature in function of the height"
    )?;
    writeln!(out, "# Height[m]  Temperature[K]")?;
    for (z, t) in profile.rows() {
        writeln!(out, "{:.6} {:.6}", z, t)?;
    }
    Ok(())
}

/// Write the height/optical-depth table for both bands.
pub fn write_optical_depth_table<W: Write>(
    profile: &EquilibriumProfile,
    out: &mut W,
) -> Result<()> {
    writeln!(
        out,
        "# In this file is presented the optical depth in function of the height"
    )?;
    writeln!(out, "# Height[m]  OD_IR  OD_SW")?;
    for ((z, ir), sw) in profile
        .z
        .iter()
        .zip(profile.ch_ir.iter())
        .zip(profile.ch_sw.iter())
    {
        writeln!(out, "{:.6} {:e} {:e}", z, ir, sw)?;
    }
    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut std::io::BufWriter<std::fs::File>) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    write(&mut writer)?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write the requested tables into `directory`, returning the paths written.
pub fn export(
    profile: &EquilibriumProfile,
    directory: &Path,
    with_optical_depth: bool,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let path = directory.join(TEMPERATURE_FILE);
    write_file(&path, |out| write_temperature_table(profile, out))?;
    info!("Wrote {}", path.display());
    written.push(path);

    if with_optical_depth {
        let path = directory.join(OPTICAL_DEPTH_FILE);
        write_file(&path, |out| write_optical_depth_table(profile, out))?;
        info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atmtemp_core::parameters::AtmosphereParameters;
    use ndarray::array;

    fn small_profile() -> EquilibriumProfile {
        EquilibriumProfile {
            z: array![10_000.0, 5000.0, 0.0],
            ch_ir: array![0.1, 0.2, 0.0],
            ch_sw: array![0.0, 0.01, 0.0],
            temperature: array![220.5, 235.25, 273.125],
        }
    }

    #[test]
    fn test_temperature_table_format() {
        let mut buffer = Vec::new();
        write_temperature_table(&small_profile(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let expected = "\
# In this file is presented the temperature in function of the height
# Height[m]  Temperature[K]
10000.000000 220.500000
5000.000000 235.250000
0.000000 273.125000
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_optical_depth_table_format() {
        let mut buffer = Vec::new();
        write_optical_depth_table(&small_profile(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "# Height[m]  OD_IR  OD_SW");
        assert_eq!(lines[3], "5000.000000 2e-1 1e-2");
        assert_eq!(lines[4], "0.000000 0e0 0e0");
    }

    #[test]
    fn test_run_model_defaults() {
        let profile = run_model(&Configuration::default()).unwrap();
        assert_eq!(profile.nlayer(), 51);
        assert!(profile.temperature.iter().all(|&t| t > 0.0));
    }

    #[test]
    fn test_run_model_reports_invalid_parameters() {
        let config = Configuration {
            atmosphere: AtmosphereParameters {
                nlayer: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = run_model(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("nlayer"));
    }

    #[test]
    fn test_export_writes_files() {
        let directory =
            std::env::temp_dir().join(format!("atmtemp-cli-export-{}", std::process::id()));
        let written = export(&small_profile(), &directory, true).unwrap();

        assert_eq!(written.len(), 2);
        let text = std::fs::read_to_string(directory.join(TEMPERATURE_FILE)).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(directory.join(OPTICAL_DEPTH_FILE).exists());

        std::fs::remove_dir_all(&directory).unwrap();
    }
}
