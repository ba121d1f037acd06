//! Loader, cache and presenter integration tests.
//!
//! Tests cover:
//! - Latest-date discovery and the filtered position query
//! - Net column derivation and null propagation from malformed cells
//! - Failure kinds (unreachable source, empty aggregate, malformed response)
//! - Cache idempotence, including concurrent callers
//! - Full fetch-render cycle against the HTML and terminal hosts

mod common;

use chrono::NaiveDate;
use common::*;
use cotboard::adapters::html_adapter::HtmlDisplay;
use cotboard::adapters::terminal_adapter::TerminalDisplay;
use cotboard::domain::cache::CachedLoader;
use cotboard::domain::config::CotConfig;
use cotboard::domain::error::CotError;
use cotboard::domain::loader::load_latest_report;
use cotboard::domain::presenter::{render, PageMeta, StyledTable};
use cotboard::domain::report::Column;
use cotboard::domain::style::CellStyle;
use cotboard::ports::data_port::DatasetPort;
use serde_json::json;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

mod loader {
    use super::*;

    #[test]
    fn gold_example_produces_expected_row() {
        let port = gold_port();
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();

        assert_eq!(
            snapshot.report_date.date,
            NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
        );
        assert_eq!(snapshot.table.len(), 1);
        let row = &snapshot.table.rows[0];
        assert_eq!(row.instrument, "GOLD");
        assert_eq!(row.long, Some(120_000));
        assert_eq!(row.change_long, Some(-500));
        assert_eq!(row.short, Some(30_000));
        assert_eq!(row.change_short, Some(200));
        assert_eq!(row.net_positions, Some(90_000));
        assert_eq!(row.net_change, Some(-700));

        let styled = StyledTable::from_report(&snapshot.table);
        assert_eq!(styled.rows[0][2].style, CellStyle::Negative);
    }

    #[test]
    fn second_query_uses_raw_date_and_filter() {
        let port = gold_port();
        load_latest_report(&port, &metals_config()).unwrap();

        let queries = port.recorded_queries();
        assert_eq!(queries.len(), 2);
        assert!(queries[0].is_aggregate());
        let predicate = queries[1].where_clause.as_deref().unwrap();
        assert!(predicate.contains("report_date_as_yyyy_mm_dd = '2024-05-14T00:00:00.000'"));
        assert!(predicate.contains("commodity_name in ('GOLD','SILVER')"));
    }

    #[test]
    fn not_available_cell_becomes_null() {
        let port = MockDatasetPort::new()
            .with_latest_date("2024-05-14")
            .with_positions(vec![position("GOLD", "120000", "-500", "N/A", "200")]);
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();
        let row = &snapshot.table.rows[0];
        assert_eq!(row.short, None);
        assert_eq!(row.net_positions, None);
        assert_eq!(row.net_change, Some(-700));
    }

    #[test]
    fn null_net_change_is_unstyled() {
        let port = MockDatasetPort::new()
            .with_latest_date("2024-05-14")
            .with_positions(vec![position("GOLD", "1", "N/A", "1", "5")]);
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();
        assert_eq!(snapshot.table.rows[0].net_change, None);
        let styled = StyledTable::from_report(&snapshot.table);
        assert_eq!(styled.rows[0][2].style, CellStyle::Neutral);
        assert_eq!(styled.rows[0][2].text, "");
    }

    #[test]
    fn missing_fields_become_null() {
        let port = MockDatasetPort::new()
            .with_latest_date("2024-05-14")
            .with_positions(vec![record(json!({ "commodity_name": "SILVER" }))]);
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();
        let row = &snapshot.table.rows[0];
        assert_eq!(row.long, None);
        assert_eq!(row.net_positions, None);
        assert_eq!(row.net_change, None);
    }

    #[test]
    fn absent_instruments_are_not_synthesized() {
        let port = gold_port();
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();
        let names: Vec<&str> = snapshot
            .table
            .rows
            .iter()
            .map(|r| r.instrument.as_str())
            .collect();
        assert_eq!(names, ["GOLD"]);
    }

    #[test]
    fn rows_outside_filter_are_dropped() {
        let port = MockDatasetPort::new()
            .with_latest_date("2024-05-14")
            .with_positions(vec![
                gold_record(),
                position("BITCOIN", "1", "1", "1", "1"),
                position("SILVER", "10", "1", "5", "1"),
                position("gold", "1", "1", "1", "1"),
            ]);
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();
        let names: Vec<&str> = snapshot
            .table
            .rows
            .iter()
            .map(|r| r.instrument.as_str())
            .collect();
        assert_eq!(names, ["GOLD", "SILVER"]);
    }

    #[test]
    fn duplicates_and_order_are_preserved() {
        let port = MockDatasetPort::new()
            .with_latest_date("2024-05-14")
            .with_positions(vec![
                position("SILVER", "10", "1", "5", "1"),
                gold_record(),
                gold_record(),
            ]);
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();
        let names: Vec<&str> = snapshot
            .table
            .rows
            .iter()
            .map(|r| r.instrument.as_str())
            .collect();
        assert_eq!(names, ["SILVER", "GOLD", "GOLD"]);
    }

    #[test]
    fn empty_position_result_is_an_empty_table() {
        let port = MockDatasetPort::new()
            .with_latest_date("2024-05-14")
            .with_positions(Vec::new());
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();
        assert!(snapshot.table.is_empty());
    }

    #[test]
    fn unreachable_source_fails() {
        let port = MockDatasetPort::new().with_unreachable("connection refused");
        let err = load_latest_report(&port, &metals_config()).unwrap_err();
        assert!(matches!(err, CotError::RemoteUnavailable { .. }));
        assert!(err.is_data_unavailable());
        assert_eq!(port.position_calls(), 0);
    }

    #[test]
    fn failure_on_second_query_fails_whole_load() {
        let port = MockDatasetPort::new()
            .with_latest_date("2024-05-14")
            .with_positions_error("reset by peer");
        let err = load_latest_report(&port, &metals_config()).unwrap_err();
        assert!(matches!(err, CotError::RemoteUnavailable { .. }));
    }

    #[test]
    fn empty_aggregate_fails() {
        let port = MockDatasetPort::new().with_aggregate(Vec::new());
        let err = load_latest_report(&port, &metals_config()).unwrap_err();
        assert!(matches!(err, CotError::EmptyAggregate { .. }));
        assert_eq!(port.position_calls(), 0);
    }

    #[test]
    fn null_aggregate_value_fails() {
        let port = MockDatasetPort::new()
            .with_aggregate(vec![record(json!({ "max_report_date_as_yyyy_mm_dd": null }))]);
        let err = load_latest_report(&port, &metals_config()).unwrap_err();
        assert!(matches!(err, CotError::EmptyAggregate { .. }));

        let port = MockDatasetPort::new().with_aggregate(vec![record(json!({}))]);
        let err = load_latest_report(&port, &metals_config()).unwrap_err();
        assert!(matches!(err, CotError::EmptyAggregate { .. }));
    }

    #[test]
    fn unparseable_report_date_is_malformed() {
        let port = MockDatasetPort::new().with_latest_date("soon");
        let err = load_latest_report(&port, &metals_config()).unwrap_err();
        assert!(matches!(err, CotError::MalformedResponse { .. }));
    }

    #[test]
    fn record_without_name_is_malformed() {
        let port = MockDatasetPort::new()
            .with_latest_date("2024-05-14")
            .with_positions(vec![record(json!({ "noncommercial_long_all": "5" }))]);
        let err = load_latest_report(&port, &metals_config()).unwrap_err();
        assert!(matches!(err, CotError::MalformedResponse { .. }));
    }
}

mod caching {
    use super::*;

    fn cached(port: Arc<MockDatasetPort>, ttl_secs: u64) -> CachedLoader {
        let config = CotConfig {
            cache_ttl: Duration::from_secs(ttl_secs),
            ..metals_config()
        };
        CachedLoader::new(port as Arc<dyn DatasetPort + Send + Sync>, Arc::new(config))
    }

    #[test]
    fn two_loads_in_window_fetch_once() {
        let port = Arc::new(gold_port());
        let loader = cached(Arc::clone(&port), 3600);
        let t0 = Instant::now();

        let a = loader.load_at(t0).unwrap();
        let b = loader.load_at(t0 + Duration::from_secs(3599)).unwrap();

        assert_eq!(*a, *b);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(port.aggregate_calls(), 1);
        assert_eq!(port.position_calls(), 1);
    }

    #[test]
    fn load_after_window_fetches_again() {
        let port = Arc::new(gold_port());
        let loader = cached(Arc::clone(&port), 60);
        let t0 = Instant::now();

        loader.load_at(t0).unwrap();
        loader.load_at(t0 + Duration::from_secs(61)).unwrap();
        assert_eq!(port.total_calls(), 4);
    }

    #[test]
    fn failed_load_is_retried_on_next_call() {
        let port = Arc::new(MockDatasetPort::new().with_unreachable("down"));
        let loader = cached(Arc::clone(&port), 3600);
        let t0 = Instant::now();

        assert!(loader.load_at(t0).is_err());
        assert!(loader.load_at(t0).is_err());
        assert_eq!(port.aggregate_calls(), 2);
        assert!(loader.cache().fetched_at().is_none());
    }

    #[test]
    fn concurrent_viewers_share_one_fetch() {
        let port = Arc::new(gold_port());
        let loader = Arc::new(cached(Arc::clone(&port), 3600));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let loader = Arc::clone(&loader);
                thread::spawn(move || loader.load().unwrap())
            })
            .collect();
        let snapshots: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(port.aggregate_calls(), 1);
        assert_eq!(port.position_calls(), 1);
        assert!(snapshots.windows(2).all(|w| w[0] == w[1]));
    }
}

mod rendering {
    use super::*;

    #[test]
    fn html_cycle_renders_caption_and_negative_style() {
        let port = gold_port();
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();
        let mut display = HtmlDisplay::new();
        render(&snapshot, &PageMeta::wide("COT"), &mut display).unwrap();
        let html = display.into_html().unwrap();

        assert!(html.contains("Latest CFTC Report: 2024-05-14"));
        assert!(html.contains("style=\"color: red; font-weight: bold\">-700</td>"));
    }

    #[test]
    fn terminal_cycle_lists_all_columns() {
        let port = gold_port();
        let snapshot = load_latest_report(&port, &metals_config()).unwrap();
        let mut display = TerminalDisplay::new(Vec::new(), false);
        render(&snapshot, &PageMeta::wide("COT"), &mut display).unwrap();
        let out = String::from_utf8(display.into_inner()).unwrap();

        for column in Column::ALL {
            assert!(out.contains(column.header()), "missing {column}");
        }
        assert!(out.contains("90000"));
    }
}
