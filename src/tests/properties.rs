use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    prelude::{
        Config, Constellation, IntegrityMonitor, PositionFix, RAIMStatus, SatelliteCatalog, SV,
    },
    tests::{init_logger, observation, reference_epoch},
};

fn random_fix(rng: &mut SmallRng) -> PositionFix {
    PositionFix::new(
        reference_epoch(),
        rng.random_range(-85.0..85.0),
        rng.random_range(-180.0..180.0),
        rng.random_range(-100.0..12000.0),
    )
}

/// Random look angles, above the default elevation mask
fn random_catalog(rng: &mut SmallRng, fix: &PositionFix, n: usize, bias: f64) -> SatelliteCatalog {
    let observations = (0..n)
        .map(|i| {
            let sv = SV::new(Constellation::GPS, i as u8 + 1);
            let el = rng.random_range(15.0..85.0);
            let az = (i as f64) * 360.0 / n as f64 + rng.random_range(0.0..10.0);
            observation(fix, sv, el, az, bias)
        })
        .collect();
    SatelliteCatalog::new(observations)
}

#[test]
fn less_than_four_usable_is_always_unavailable() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(0);
    let monitor = IntegrityMonitor::default();

    for _ in 0..50 {
        let fix = random_fix(&mut rng);
        let usable = rng.random_range(0..4);
        let tracked = usable + rng.random_range(0..6);

        // everything past "usable" sits below the elevation mask
        let observations = (0..tracked)
            .map(|i| {
                let sv = SV::new(Constellation::GPS, i as u8 + 1);
                let el = if i < usable { 45.0 } else { 1.0 };
                let bias = rng.random_range(-50.0..50.0);
                observation(&fix, sv, el, 40.0 * i as f64, bias)
            })
            .collect::<Vec<_>>();

        monitor.ingest_satellite_catalog(observations);
        let result = monitor.ingest_position_fix(&fix);
        assert!(
            result.status().is_unavailable(),
            "{} usable SV: {}",
            usable,
            result.status()
        );
    }
}

#[test]
fn null_residuals_never_faulty() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(1);
    let monitor = IntegrityMonitor::default();

    for n in 5..=12 {
        for _ in 0..5 {
            let fix = random_fix(&mut rng);
            monitor.ingest_satellite_catalog(random_catalog(&mut rng, &fix, n, 0.0));
            let result = monitor.ingest_position_fix(&fix);

            assert!(!result.status().is_fault_detected());
            assert!(!result.fault_detected());
            if let Some(statistic) = result.statistic() {
                assert!(statistic < 1.0E-9, "statistic={}", statistic);
            }
        }
    }
}

#[test]
fn idempotent_evaluations() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(2);
    let monitor = IntegrityMonitor::new(Config::default().with_sigma(3.0)).unwrap();

    for n in [4, 6, 9] {
        let fix = random_fix(&mut rng);
        monitor.ingest_satellite_catalog(random_catalog(&mut rng, &fix, n, 1.7));

        let first = monitor.ingest_position_fix(&fix);
        let second = monitor.ingest_position_fix(&fix);
        assert_eq!(*first, *second);

        let (a, b) = (first.hpl_m(), second.hpl_m());
        assert_eq!(a.map(f64::to_bits), b.map(f64::to_bits));
        assert_eq!(
            first.statistic().map(f64::to_bits),
            second.statistic().map(f64::to_bits)
        );
    }
}

#[test]
fn protection_levels_follow_dop() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(3);
    let cfg = Config::default();

    for _ in 0..20 {
        let fix = random_fix(&mut rng);
        let n = rng.random_range(5..12);
        let monitor = IntegrityMonitor::new(cfg.clone()).unwrap();
        monitor.ingest_satellite_catalog(random_catalog(&mut rng, &fix, n, 0.0));
        let result = monitor.ingest_position_fix(&fix);

        if let (Some(dop), Some(hpl), Some(vpl)) = (result.dop(), result.hpl_m(), result.vpl_m()) {
            let k_md = 3.090232;
            assert!((hpl - k_md * cfg.sigma_m * dop.hdop).abs() < 1.0E-4);
            assert!((vpl - k_md * cfg.sigma_m * dop.vdop).abs() < 1.0E-4);
            assert!(dop.hdop >= 1.0 && dop.vdop >= 1.0);
            assert!(dop.gdop <= cfg.max_dop);
        } else {
            assert!(matches!(result.status(), RAIMStatus::Unavailable(_)));
        }
    }
}
