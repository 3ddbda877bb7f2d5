// ═══════════════════════════════════════════════════════════════════
// Series Generation Tests — SeriesService, generate_dataset
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, TimeZone, Utc};

use token_dashboard_core::errors::CoreError;
use token_dashboard_core::generate_dataset;
use token_dashboard_core::models::dataset::{DatasetConfig, MAX_HORIZON_DAYS};
use token_dashboard_core::models::series::{Resolution, SeriesKind, DAY_MS};
use token_dashboard_core::services::seeded_source::{Seed, SeededSource};
use token_dashboard_core::services::series_service::{GenerationParams, SeriesService, MIN_PRICE, PRICE_FLOOR};

/// Wednesday, 2025-01-15 12:00 UTC
fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

fn config() -> DatasetConfig {
    DatasetConfig {
        horizon_days: 180,
        start_price: 0.75,
        price_volatility: 0.03,
        base_volume: 500_000.0,
        base_liquidity: 2_000_000.0,
        as_of: Some(as_of()),
        ..DatasetConfig::default()
    }
}

/// Always returns the same draw.
struct ConstantSource(f64);

impl SeededSource for ConstantSource {
    fn unit(&self, _seed: Seed) -> f64 {
        self.0
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Dataset scenario
// ═══════════════════════════════════════════════════════════════════

mod dataset {
    use super::*;

    #[test]
    fn price_series_has_horizon_plus_one_points() {
        let dataset = generate_dataset(&config()).unwrap();
        assert_eq!(dataset.series.price.len(), 181);
        assert!(dataset.series.price.iter().all(|p| p.value > 0.01));
    }

    #[test]
    fn summary_current_is_last_price() {
        let dataset = generate_dataset(&config()).unwrap();
        let last = dataset.series.price.last().unwrap();
        assert_eq!(dataset.summary.current, last.value);
    }

    #[test]
    fn every_series_is_positive() {
        let dataset = generate_dataset(&config()).unwrap();
        for kind in SeriesKind::ALL {
            let series = dataset.series.get(kind);
            assert_eq!(series.len(), 181, "{kind}");
            assert!(series.iter().all(|p| p.value > 0.0 && p.value.is_finite()), "{kind}");
        }
    }

    #[test]
    fn every_series_is_daily_and_ends_now() {
        let dataset = generate_dataset(&config()).unwrap();
        for kind in SeriesKind::ALL {
            let series = dataset.series.get(kind);
            assert_eq!(series.resolution(), Resolution::Daily);
            assert_eq!(series.last().unwrap().timestamp, as_of().timestamp_millis());
            for w in series.points().windows(2) {
                assert_eq!(w[1].timestamp - w[0].timestamp, DAY_MS, "{kind}");
            }
        }
    }

    #[test]
    fn identical_config_identical_dataset() {
        let a = generate_dataset(&config()).unwrap();
        let b = generate_dataset(&config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_prices() {
        let a = generate_dataset(&config()).unwrap();
        let b = generate_dataset(&DatasetConfig { seed: 9, ..config() }).unwrap();
        assert_ne!(a.series.price, b.series.price);
    }

    #[test]
    fn volume_shares_price_timestamps() {
        let dataset = generate_dataset(&config()).unwrap();
        let price_ts: Vec<i64> = dataset.series.price.iter().map(|p| p.timestamp).collect();
        let volume_ts: Vec<i64> = dataset.series.volume.iter().map(|p| p.timestamp).collect();
        assert_eq!(price_ts, volume_ts);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = DatasetConfig { start_price: 0.0, ..config() };
        assert!(matches!(generate_dataset(&bad), Err(CoreError::InvalidParameter(_))));
    }

    #[test]
    fn empty_horizon_cannot_be_summarized() {
        let empty = DatasetConfig { horizon_days: 0, ..config() };
        assert!(matches!(generate_dataset(&empty), Err(CoreError::InvalidParameter(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  SeriesService
// ═══════════════════════════════════════════════════════════════════

mod series_service {
    use super::*;

    #[test]
    fn non_positive_horizon_is_empty() {
        let service = SeriesService::new();
        let params = GenerationParams::new(as_of());
        for horizon in [0, -1, -30] {
            for kind in SeriesKind::ALL {
                let series = service.generate(kind, horizon, 10.0, &params).unwrap();
                assert!(series.is_empty(), "{kind} horizon {horizon}");
            }
        }
    }

    #[test]
    fn non_positive_start_value_fails() {
        let service = SeriesService::new();
        let params = GenerationParams::new(as_of());
        for start in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = service.generate(SeriesKind::Price, 30, start, &params);
            assert!(matches!(result, Err(CoreError::InvalidParameter(_))), "start {start}");
        }
    }

    #[test]
    fn negative_volatility_fails() {
        let service = SeriesService::new();
        let params = GenerationParams::new(as_of()).with_volatility(-0.1);
        assert!(matches!(
            service.price(30, 1.0, &params),
            Err(CoreError::InvalidParameter(_))
        ));
    }

    #[test]
    fn first_point_is_start_value() {
        let service = SeriesService::new();
        let params = GenerationParams::new(as_of());
        let price = service.price(10, 0.75, &params).unwrap();
        assert_eq!(price.first().unwrap().value, 0.75);
        let liquidity = service.liquidity(10, 2_000_000.0, &params).unwrap();
        assert_eq!(liquidity.first().unwrap().value, 2_000_000.0);
    }

    #[test]
    fn injected_source_drives_the_walk() {
        // Mon 13th, Tue 14th, Wed 15th: no weekend penalty.
        let service = SeriesService::with_source(ConstantSource(0.5));
        let params = GenerationParams::new(as_of()).with_volatility(0.03);
        let price = service.price(2, 1.0, &params).unwrap();
        let step = 1.0 + (0.5 - 0.48) * 0.03;
        let values = price.values();
        assert_eq!(values[0], 1.0);
        assert!((values[1] - step).abs() < 1e-12);
        assert!((values[2] - step * step).abs() < 1e-12);
    }

    #[test]
    fn weekend_penalty_applies() {
        // Sat 18th and Sun 19th carry the penalty; zero volatility isolates it.
        let sunday = Utc.with_ymd_and_hms(2025, 1, 19, 12, 0, 0).unwrap();
        let service = SeriesService::with_source(ConstantSource(0.5));
        let params = GenerationParams::new(sunday).with_volatility(0.0);
        let values = service.price(2, 1.0, &params).unwrap().values();
        assert!((values[1] - 0.995).abs() < 1e-12);
        assert!((values[2] - 0.995 * 0.995).abs() < 1e-12);
    }

    #[test]
    fn price_never_falls_below_floor() {
        // A draw of zero is the largest possible down move.
        let service = SeriesService::with_source(ConstantSource(0.0));
        let params = GenerationParams::new(as_of()).with_volatility(1.0);
        let price = service.price(60, 0.05, &params).unwrap();
        assert!(price.iter().all(|p| p.value > PRICE_FLOOR));
        assert_eq!(price.last().unwrap().value, MIN_PRICE);
    }

    #[test]
    fn high_volatility_stays_strictly_above_floor() {
        let service = SeriesService::new();
        for seed in 0..50 {
            let params = GenerationParams::new(as_of()).with_seed(seed).with_volatility(0.5);
            let price = service.price(180, 0.75, &params).unwrap();
            assert!(price.iter().all(|p| p.value > PRICE_FLOOR), "seed {seed}");
        }
    }

    #[test]
    fn horizon_above_maximum_is_rejected() {
        let service = SeriesService::new();
        let params = GenerationParams::new(as_of());
        for kind in SeriesKind::ALL {
            assert!(
                matches!(
                    service.generate(kind, MAX_HORIZON_DAYS + 1, 100.0, &params),
                    Err(CoreError::InvalidParameter(_))
                ),
                "{kind}"
            );
        }
        assert!(matches!(
            service.liquidity(i64::MAX, 100.0, &params),
            Err(CoreError::InvalidParameter(_))
        ));
        assert!(service.price(MAX_HORIZON_DAYS, 1.0, &params).is_ok());
    }

    #[test]
    fn flat_price_gives_jitter_only_volume() {
        let service = SeriesService::with_source(ConstantSource(0.5));
        let params = GenerationParams::new(as_of()).with_volatility(0.0);
        let price = service.price(3, 1.0, &params).unwrap();
        let volume = service.volume_from_price(&price, 1_000.0, &params).unwrap();
        // Jitter range 0.5..1.5 at a draw of 0.5 is exactly 1.0.
        assert!(volume.iter().all(|p| (p.value - 1_000.0).abs() < 1e-9));
    }

    #[test]
    fn volume_requires_price_series() {
        let service = SeriesService::new();
        let params = GenerationParams::new(as_of());
        let liquidity = service.liquidity(5, 100.0, &params).unwrap();
        assert!(matches!(
            service.volume_from_price(&liquidity, 100.0, &params),
            Err(CoreError::InvalidParameter(_))
        ));
    }

    #[test]
    fn standalone_volume_matches_dataset_volume() {
        let service = SeriesService::new();
        let params = GenerationParams::new(as_of()).with_volatility(0.03);
        let via_generate = service
            .generate(SeriesKind::Volume, 30, 500_000.0, &params)
            .unwrap();
        let price = service.price(30, params.reference_price, &params).unwrap();
        let via_price = service.volume_from_price(&price, 500_000.0, &params).unwrap();
        assert_eq!(via_generate, via_price);
    }

    #[test]
    fn holders_never_decrease_and_growth_tapers() {
        let service = SeriesService::new();
        let params = GenerationParams::new(as_of());
        let holders = service.generate(SeriesKind::Holders, 180, 500.0, &params).unwrap();
        let values = holders.values();
        assert!(values.windows(2).all(|w| w[1] >= w[0]));
        assert!(values.iter().all(|v| v.fract() == 0.0));

        let early = values[30] / values[0];
        let late = values[180] / values[150];
        assert!(early > late, "early growth {early} late growth {late}");
    }

    #[test]
    fn transactions_dip_on_weekends() {
        // Constant draws make the trend smooth, so the weekend factor shows directly.
        let service = SeriesService::with_source(ConstantSource(0.5));
        let params = GenerationParams::new(as_of());
        let tx = service
            .generate(SeriesKind::Transactions, 14, 10_000.0, &params)
            .unwrap();
        let points = tx.points();
        // 14 days before Wed 15th is Wed 1st; index 3 is Sat 4th, index 2 is Fri 3rd.
        assert!(points[3].value < points[2].value);
        assert!(points[5].value > points[4].value);
    }

    #[test]
    fn liquidity_events_add_steps() {
        // A draw of zero always triggers an event but adds nothing, a draw of 0.5 adds 10%.
        let service = SeriesService::with_source(ConstantSource(0.0));
        let params = GenerationParams::new(as_of());
        let liquidity = service.liquidity(1, 1_000.0, &params).unwrap();
        let expected = 1_000.0 * (1.0 - 0.45 * 0.03);
        assert!((liquidity.values()[1] - expected).abs() < 1e-9);

        let service = SeriesService::with_source(ConstantSource(0.5));
        let liquidity = service.liquidity(1, 1_000.0, &params).unwrap();
        let walked = 1_000.0 * (1.0 + 0.05 * 0.03);
        assert!((liquidity.values()[1] - walked).abs() < 1e-9);
    }
}
