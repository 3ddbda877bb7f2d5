// ═══════════════════════════════════════════════════════════════════
// Window Tests — TimeWindow parsing, filtering, weekly aggregation
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};

use token_dashboard_core::errors::CoreError;
use token_dashboard_core::generate_dataset;
use token_dashboard_core::models::dataset::{Dataset, DatasetConfig};
use token_dashboard_core::models::series::{Resolution, Series, SeriesKind, TimePoint, DAY_MS};
use token_dashboard_core::models::window::{AggregationMode, TimeWindow};
use token_dashboard_core::services::window_service::{week_start, WindowService};

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

fn dataset() -> Dataset {
    generate_dataset(&DatasetConfig {
        as_of: Some(as_of()),
        ..DatasetConfig::default()
    })
    .unwrap()
}

fn millis(y: i32, m: u32, d: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap().timestamp_millis()
}

fn is_sunday_midnight(timestamp: i64) -> bool {
    let dt = DateTime::from_timestamp_millis(timestamp).unwrap();
    dt.weekday() == Weekday::Sun && timestamp % DAY_MS == 0
}

mod labels {
    use super::*;

    #[test]
    fn parse_known_labels() {
        assert_eq!("24H".parse::<TimeWindow>().unwrap(), TimeWindow::Day);
        assert_eq!("7D".parse::<TimeWindow>().unwrap(), TimeWindow::Week);
        assert_eq!("30D".parse::<TimeWindow>().unwrap(), TimeWindow::Month);
        assert_eq!("90D".parse::<TimeWindow>().unwrap(), TimeWindow::Quarter);
        assert_eq!("ALL".parse::<TimeWindow>().unwrap(), TimeWindow::All);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("all".parse::<TimeWindow>().unwrap(), TimeWindow::All);
        assert_eq!(" 7d ".parse::<TimeWindow>().unwrap(), TimeWindow::Week);
    }

    #[test]
    fn malformed_label_is_invalid_parameter() {
        for label in ["", "1Y", "7", "D7"] {
            assert!(matches!(
                label.parse::<TimeWindow>(),
                Err(CoreError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn display_round_trips() {
        for window in TimeWindow::ALL {
            assert_eq!(window.to_string().parse::<TimeWindow>().unwrap(), window);
        }
    }

    #[test]
    fn only_large_windows_are_coarse() {
        assert!(!TimeWindow::Day.is_coarse());
        assert!(!TimeWindow::Week.is_coarse());
        assert!(!TimeWindow::Month.is_coarse());
        assert!(TimeWindow::Quarter.is_coarse());
        assert!(TimeWindow::All.is_coarse());
        assert_eq!(TimeWindow::All.days(), None);
    }
}

mod filtering {
    use super::*;

    #[test]
    fn seven_day_window_is_contained() {
        let dataset = dataset();
        let windowed = WindowService::new()
            .windowed_by_label(&dataset.series.price, "7D", as_of())
            .unwrap();
        let cutoff = as_of().timestamp_millis() - 7 * DAY_MS;
        assert_eq!(windowed.len(), 8);
        assert!(windowed.iter().all(|p| p.timestamp >= cutoff));
        assert_eq!(windowed.resolution(), Resolution::Daily);
    }

    #[test]
    fn fine_windows_keep_native_points() {
        let dataset = dataset();
        let service = WindowService::new();
        let month = service
            .windowed_by_label(&dataset.series.volume, "30D", as_of())
            .unwrap();
        assert_eq!(month.len(), 31);
        let last = dataset.series.volume.last().unwrap();
        assert_eq!(month.last().unwrap(), last);
    }

    #[test]
    fn window_after_the_data_is_empty() {
        let dataset = dataset();
        let later = as_of() + chrono::Duration::days(30);
        let windowed = WindowService::new()
            .windowed_by_label(&dataset.series.price, "7D", later)
            .unwrap();
        assert!(windowed.is_empty());
    }

    #[test]
    fn all_window_skips_filtering() {
        let dataset = dataset();
        let far_future = as_of() + chrono::Duration::days(3650);
        let filtered = WindowService::new().filter(&dataset.series.price, TimeWindow::All, far_future);
        assert_eq!(filtered, dataset.series.price);
    }

    #[test]
    fn invalid_label_fails() {
        let dataset = dataset();
        assert!(matches!(
            WindowService::new().windowed_by_label(&dataset.series.price, "2W", as_of()),
            Err(CoreError::InvalidParameter(_))
        ));
    }
}

mod aggregation {
    use super::*;

    fn handmade() -> Series {
        // Sun 12th, Mon 13th, Tue 14th, then Sun 19th and Mon 20th.
        let points = vec![
            TimePoint::new(millis(2025, 1, 12), 1.0),
            TimePoint::new(millis(2025, 1, 13), 2.0),
            TimePoint::new(millis(2025, 1, 14), 3.0),
            TimePoint::new(millis(2025, 1, 19), 4.0),
            TimePoint::new(millis(2025, 1, 20) + 5 * 3_600_000, 5.0),
        ];
        Series::from_points(SeriesKind::Volume, Resolution::Daily, points).unwrap()
    }

    #[test]
    fn week_starts_on_sunday_midnight() {
        assert_eq!(week_start(millis(2025, 1, 15) + 12 * 3_600_000), millis(2025, 1, 12));
        assert_eq!(week_start(millis(2025, 1, 12)), millis(2025, 1, 12));
        assert_eq!(week_start(millis(2025, 1, 18) + DAY_MS - 1), millis(2025, 1, 12));
        assert_eq!(week_start(millis(2025, 1, 19)), millis(2025, 1, 19));
    }

    #[test]
    fn sum_mode_adds_bucket_members() {
        let weekly = WindowService::new().aggregate_weekly(&handmade(), AggregationMode::Sum);
        let points = weekly.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], TimePoint::new(millis(2025, 1, 12), 6.0));
        assert_eq!(points[1], TimePoint::new(millis(2025, 1, 19), 9.0));
        assert_eq!(weekly.resolution(), Resolution::Weekly);
    }

    #[test]
    fn last_value_mode_keeps_latest_member() {
        let weekly = WindowService::new().aggregate_weekly(&handmade(), AggregationMode::LastValue);
        assert_eq!(weekly.values(), vec![3.0, 5.0]);
    }

    #[test]
    fn coarse_volume_totals_reconcile() {
        let dataset = dataset();
        let service = WindowService::new();
        let volume = &dataset.series.volume;
        let weekly = service.windowed(volume, TimeWindow::All, AggregationMode::Sum, as_of());
        assert!((weekly.total() - volume.total()).abs() < 1e-6 * volume.total());
        assert!(weekly.iter().all(|p| is_sunday_midnight(p.timestamp)));
        assert!(weekly.points().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn boundary_point_stays_in_its_bucket() {
        let dataset = dataset();
        let service = WindowService::new();
        let volume = &dataset.series.volume;
        let filtered = service.filter(volume, TimeWindow::Quarter, as_of());
        let weekly = service.windowed(volume, TimeWindow::Quarter, AggregationMode::Sum, as_of());

        let first_point = filtered.first().unwrap().timestamp;
        let first_bucket = weekly.first().unwrap().timestamp;
        assert!(first_bucket <= first_point);
        assert!(first_point - first_bucket < 7 * DAY_MS);
        assert!((weekly.total() - filtered.total()).abs() < 1e-6 * filtered.total());
    }

    #[test]
    fn price_defaults_to_last_value() {
        let dataset = dataset();
        let weekly = WindowService::new()
            .windowed_by_label(&dataset.series.price, "ALL", as_of())
            .unwrap();
        assert_eq!(
            weekly.last().unwrap().value,
            dataset.series.price.last().unwrap().value
        );
        assert!(weekly.iter().all(|p| p.value > 0.01));
    }

    #[test]
    fn aggregation_is_deterministic() {
        let dataset = dataset();
        let service = WindowService::new();
        let a = service.windowed_by_label(&dataset.series.volume, "90D", as_of()).unwrap();
        let b = service.windowed_by_label(&dataset.series.volume, "90D", as_of()).unwrap();
        assert_eq!(a, b);
    }
}
