mod common;

use ct_housing_dashboard::data::{filter_by_year, County, Joiner};
use ct_housing_dashboard::session::{Selection, Session};
use ct_housing_dashboard::view::{
    bubble_size, compute_series, marker_diameter, size_reference, DashboardMode, MetricSelector,
    PipelineError, RenderRequest, ViewDispatcher, X_AXIS_LABEL, Y_AXIS_LABEL,
};
use std::collections::HashSet;

fn session() -> Session {
    Session::new(common::dataset())
}

#[test]
fn join_keeps_every_row_and_every_boundary() {
    let dataset = common::dataset();
    assert_eq!(dataset.rows.len(), 5);
    assert_eq!(dataset.boundaries.len(), 4);

    let joined = Joiner::join(&dataset.boundaries, &dataset.rows);
    // five score rows plus the boundary nobody matched
    assert_eq!(joined.len(), 6);

    let names: HashSet<&str> = joined.records().iter().map(|r| r.name.as_str()).collect();
    for boundary in &dataset.boundaries {
        assert!(names.contains(boundary.name.as_str()), "{} lost", boundary.name);
    }
    for row in &dataset.rows {
        assert!(joined
            .records()
            .iter()
            .any(|r| r.name == row.town && r.year == Some(row.year)));
    }

    assert_eq!(joined.towns_without_geometry(), vec!["Atlantis".to_string()]);
    assert_eq!(joined.towns_without_data(), vec!["Avon".to_string()]);
    assert_eq!(joined.years(), vec![2011, 2012]);
}

#[test]
fn joined_records_follow_year_then_town_code() {
    let session = session();
    let order: Vec<(Option<i32>, Option<i64>)> = session
        .joined()
        .records()
        .iter()
        .map(|r| (r.year, r.town_code))
        .collect();

    assert_eq!(
        order,
        vec![
            (Some(2011), Some(1)),
            (Some(2011), Some(2)),
            (Some(2011), Some(3)),
            (Some(2011), Some(999)),
            (Some(2012), Some(1)),
            (None, None),
        ]
    );
}

#[test]
fn year_filter_selects_exact_year_in_order() {
    let session = session();
    let subset = filter_by_year(session.joined(), 2011);
    let towns: Vec<&str> = subset.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(towns, vec!["Andover", "Ansonia", "Ashford", "Atlantis"]);
    assert!(subset.iter().all(|r| r.year == Some(2011)));

    assert_eq!(session.year_subset(2012).len(), 1);
    assert!(session.year_subset(2005).is_empty());
}

#[test]
fn bubble_sizes_follow_square_root_of_returns() {
    let session = session();
    let series = compute_series(&session.year_subset(2011)).unwrap();

    let size_of = |county: County, town: &str| {
        series.per_county[&county]
            .points
            .iter()
            .find(|p| p.town == town)
            .map(|p| p.bubble_size)
            .unwrap()
    };
    assert!((size_of(County::Tolland, "Andover") - 10.0).abs() < 1e-9);
    assert!((size_of(County::NewHaven, "Ansonia") - 20.0).abs() < 1e-9);
    assert!((size_of(County::Windham, "Ashford") - 30.0).abs() < 1e-9);
    assert!((series.size_reference - 0.006).abs() < 1e-12);

    // Atlantis has no known county
    assert_eq!(series.dropped, 1);
    assert_eq!(series.point_count(), 3);
    assert_eq!(series.per_county.len(), 8);
    assert!(series.per_county[&County::Fairfield].points.is_empty());
}

#[test]
fn more_returns_never_means_a_smaller_marker() {
    let sizes: Vec<f64> = [1, 4, 9, 100, 10_000, 250_000]
        .iter()
        .map(|&k| bubble_size(Some(k)))
        .collect();
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]));

    let reference = 2.0 * sizes[sizes.len() - 1] / 100.0_f64.powi(2);
    let diameters: Vec<f32> = sizes.iter().map(|&s| marker_diameter(s, reference)).collect();
    assert!(diameters.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn scaling_returns_scales_size_reference_by_square_root() {
    let returns = [100_i64, 400, 900];
    let base = size_reference(returns.iter().map(|&n| bubble_size(Some(n))));
    assert!((base - 0.006).abs() < 1e-12);

    for k in [4_i64, 9, 25] {
        let scaled = size_reference(returns.iter().map(|&n| bubble_size(Some(n * k))));
        let expected = base * (k as f64).sqrt();
        assert!((scaled - expected).abs() < 1e-12, "k = {k}");
    }
}

#[test]
fn year_without_rows_gives_empty_states() {
    let session = session();

    let map = session
        .render(Selection {
            mode: DashboardMode::AffordableHousingMap,
            year: 2005,
        })
        .unwrap();
    match map {
        RenderRequest::Choropleth(req) => {
            assert!(!req.has_values());
            assert_eq!(req.boundaries.len(), 4);
        }
        other => panic!("expected a map, got {other:?}"),
    }

    let chart = session.render(Selection {
        mode: DashboardMode::ComparisonChart,
        year: 2005,
    });
    assert_eq!(chart, Err(PipelineError::EmptySeries { year: 2005 }));
}

#[test]
fn geometry_only_town_is_drawn_without_a_value() {
    let session = session();

    assert!(session
        .joined()
        .records()
        .iter()
        .any(|r| r.name == "Avon" && r.year.is_none() && r.has_geometry()));

    let request = session
        .render(Selection {
            mode: DashboardMode::IncomeInequalityMap,
            year: 2011,
        })
        .unwrap();
    let RenderRequest::Choropleth(req) = request else {
        panic!("expected a map");
    };
    assert_eq!(req.legend_label, "IIE Score");
    assert!(req.boundaries.iter().any(|b| b.name == "Avon"));
    assert_eq!(req.value_for("Avon"), None);
    assert_eq!(req.value_for("Ansonia"), Some(1.2));
    assert_eq!(req.values.len(), 3);
    assert_eq!(req.unmapped, vec!["Atlantis".to_string()]);
}

#[test]
fn comparison_request_carries_axes_and_every_county() {
    let session = session();
    let request = session
        .render(Selection {
            mode: DashboardMode::ComparisonChart,
            year: 2011,
        })
        .unwrap();
    let RenderRequest::Comparison(req) = request else {
        panic!("expected the bubble chart");
    };

    assert_eq!(req.x_label, X_AXIS_LABEL);
    assert_eq!(req.y_label, Y_AXIS_LABEL);
    assert!(req.title.contains("2011"));
    assert_eq!(req.series.len(), 8);
    assert!(req
        .series
        .iter()
        .all(|s| (s.size_reference - 0.006).abs() < 1e-12));
}

#[test]
fn dispatch_is_repeatable() {
    let session = session();
    for mode in [
        DashboardMode::AffordableHousingMap,
        DashboardMode::IncomeInequalityMap,
        DashboardMode::ComparisonChart,
    ] {
        let selection = Selection { mode, year: 2011 };
        assert_eq!(session.render(selection), session.render(selection));

        let subset = session.year_subset(2011);
        let direct =
            ViewDispatcher::dispatch(mode, &subset, session.joined().boundaries(), None).unwrap();
        assert_eq!(Ok(direct), session.render(selection));
    }
}

#[test]
fn untyped_selection_outside_modes_is_rejected() {
    assert!(MetricSelector::resolve_str("comparison-chart").is_ok());
    assert!(matches!(
        MetricSelector::resolve_str("Scatter Plot"),
        Err(PipelineError::UnknownSelection(_))
    ));
}
