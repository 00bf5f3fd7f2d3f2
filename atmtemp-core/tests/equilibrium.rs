//! End-to-end tests of the optical-depth assembly and the equilibrium solve.
//!
//! These tests verify physical properties of the solution:
//! - Energy balance at the top of the atmosphere
//! - The greenhouse structure of a long-wave-only atmosphere
//! - The response to clouds, short-wave absorbers and ozone

use approx::assert_relative_eq;
use atmtemp_core::constants::DIFFUSIVITY_FACTOR;
use atmtemp_core::parameters::{AtmosphereParameters, CloudParameters, RadiationParameters, Switch};
use atmtemp_core::profile::ProfileKind;
use atmtemp_core::{optical_depth, solve_atmosphere, temperature_profile, RadiativeEquilibrium};
use is_close::is_close;

fn default_run(atmosphere: AtmosphereParameters) -> atmtemp_core::EquilibriumProfile {
    solve_atmosphere(&atmosphere, &RadiationParameters::default()).unwrap()
}

mod energy_balance {
    use super::*;

    /// Outgoing long-wave radiation must equal the absorbed sunlight for any atmosphere.
    #[test]
    fn test_outgoing_longwave_matches_absorbed_solar() {
        let radiation = RadiationParameters::default();
        let atmospheres = [
            AtmosphereParameters::default(),
            AtmosphereParameters {
                nlayer: 101,
                k_1: 1.2,
                k_2: 0.005,
                k_ozone: 0.002,
                ozone: Switch::On,
                scale_height_1: 10.0,
                ..Default::default()
            },
            AtmosphereParameters {
                nlayer: 41,
                z_top: 40.0,
                scale_height_1: 8.0,
                scale_height_2: 3.0,
                profile_1: ProfileKind::Exponential,
                profile_2: ProfileKind::Exponential,
                ozone: Switch::On,
                k_1: 1.5,
                k_2: 0.1,
                k_ozone: 0.2,
                clouds: CloudParameters {
                    enabled: Switch::On,
                    bottom: 3.0,
                    top: 6.0,
                    k_lw: 5e-4,
                    k_sw: 1e-4,
                },
            },
        ];

        for atmosphere in atmospheres {
            let profile = solve_atmosphere(&atmosphere, &radiation).unwrap();
            let olr = profile.outgoing_longwave(&radiation).unwrap();
            assert!(
                is_close!(olr, radiation.total_solar_irradiance()),
                "OLR {} does not balance {} for {:?}",
                olr,
                radiation.total_solar_irradiance(),
                atmosphere
            );
        }
    }

    /// A surface-only atmosphere is a black body at the effective temperature.
    #[test]
    fn test_surface_only_atmosphere() {
        let profile = default_run(AtmosphereParameters {
            nlayer: 1,
            ..Default::default()
        });

        assert_eq!(profile.z.to_vec(), vec![0.0]);
        assert_eq!(profile.ch_ir.to_vec(), vec![0.0]);
        assert_relative_eq!(profile.surface_temperature().unwrap(), 254.99768, epsilon = 1e-4);
    }
}

mod greenhouse {
    use super::*;

    #[test]
    fn test_default_atmosphere_cools_with_height() {
        let profile = default_run(AtmosphereParameters::default());

        assert!(profile.ch_sw.iter().all(|&v| v == 0.0));
        for i in 1..profile.nlayer() {
            assert!(
                profile.temperature[i - 1] <= profile.temperature[i],
                "temperature increases with height at level {}: {} > {}",
                i,
                profile.temperature[i - 1],
                profile.temperature[i]
            );
        }
        assert_relative_eq!(profile.temperature[0], 214.43, epsilon = 0.01);
        assert_relative_eq!(profile.surface_temperature().unwrap(), 274.01, epsilon = 0.01);
    }

    /// The column optical depth is set by the absorption coefficient alone.
    #[test]
    fn test_column_optical_depth() {
        let atmosphere = AtmosphereParameters::default();
        let od = optical_depth(&atmosphere).unwrap();
        let (tau_ir, tau_sw) = od.column_optical_depth();

        assert_relative_eq!(tau_ir, atmosphere.k_1 / DIFFUSIVITY_FACTOR, epsilon = 1e-12);
        assert_eq!(tau_sw, 0.0);
    }

    #[test]
    fn test_more_absorber_warms_the_surface() {
        let thin = default_run(AtmosphereParameters::default());
        let thick = default_run(AtmosphereParameters {
            k_1: 1.2,
            ..Default::default()
        });

        assert!(thick.surface_temperature().unwrap() > thin.surface_temperature().unwrap());
        assert_relative_eq!(thick.surface_temperature().unwrap(), 303.19, epsilon = 0.01);
    }

    #[test]
    fn test_direct_solver_matches_model_run() {
        let atmosphere = AtmosphereParameters {
            nlayer: 21,
            k_2: 0.05,
            ..Default::default()
        };
        let od = optical_depth(&atmosphere).unwrap();
        let direct = temperature_profile(od.ch_ir.view(), od.ch_sw.view()).unwrap();
        let profile = default_run(atmosphere);

        assert_eq!(direct, profile.temperature);
    }
}

mod forcing {
    use super::*;

    #[test]
    fn test_longwave_cloud_warms_the_surface() {
        let clear = default_run(AtmosphereParameters::default());
        let cloudy = default_run(AtmosphereParameters {
            clouds: CloudParameters {
                enabled: Switch::On,
                k_lw: 1e-4,
                ..Default::default()
            },
            ..Default::default()
        });

        assert_relative_eq!(cloudy.surface_temperature().unwrap(), 285.99, epsilon = 0.01);
        assert!(cloudy.surface_temperature().unwrap() > clear.surface_temperature().unwrap());
    }

    #[test]
    fn test_disabled_cloud_has_no_effect() {
        let clear = default_run(AtmosphereParameters::default());
        let disabled = default_run(AtmosphereParameters {
            clouds: CloudParameters {
                enabled: Switch::Off,
                k_lw: 1e-3,
                k_sw: 1e-3,
                ..Default::default()
            },
            ..Default::default()
        });

        assert_eq!(clear.temperature, disabled.temperature);
    }

    /// Sunlight absorbed aloft no longer reaches the ground.
    #[test]
    fn test_shortwave_absorber_cools_surface_and_warms_top() {
        let clear = default_run(AtmosphereParameters::default());
        let absorbing = default_run(AtmosphereParameters {
            k_2: 0.5,
            ..Default::default()
        });

        assert_relative_eq!(absorbing.surface_temperature().unwrap(), 251.32, epsilon = 0.01);
        assert!(absorbing.surface_temperature().unwrap() < clear.surface_temperature().unwrap());
        assert!(absorbing.temperature[0] > clear.temperature[0]);
    }

    #[test]
    fn test_ozone_heats_the_stratosphere() {
        let profile = default_run(AtmosphereParameters {
            ozone: Switch::On,
            k_ozone: 0.3,
            ..Default::default()
        });

        // Level 15 sits at 35 km, the centre of the ozone band
        assert_eq!(profile.z[15], 35_000.0);
        assert!(profile.temperature[15] > profile.temperature[0]);
        assert!(profile.temperature[15] > profile.surface_temperature().unwrap());
        // Below the band the short-wave optical depth vanishes
        assert!(profile.ch_sw.iter().skip(31).all(|&v| v == 0.0));
    }

    #[test]
    fn test_solar_constant_scales_temperature() {
        let od = optical_depth(&AtmosphereParameters::default()).unwrap();
        let base = RadiativeEquilibrium::new()
            .solve(od.ch_ir.view(), od.ch_sw.view())
            .unwrap();
        let doubled = RadiativeEquilibrium::from_parameters(RadiationParameters {
            solar_constant: 2.0 * 1370.0,
            ..Default::default()
        })
        .solve(od.ch_ir.view(), od.ch_sw.view())
        .unwrap();

        // The system is linear in sigma T^4, so doubling the source scales T by 2^(1/4)
        for (b, d) in base.iter().zip(doubled.iter()) {
            assert_relative_eq!(d / b, 2.0_f64.powf(0.25), epsilon = 1e-10);
        }
    }
}
