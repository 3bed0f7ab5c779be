use std::collections::HashSet;

use super::*;

fn ortho(width: u32, height: u32) -> GridConfig {
    GridConfig::new(width, height)
}

fn iso(cell: f64, width: u32, height: u32) -> GridConfig {
    let mut cfg = GridConfig::new(width, height);
    cfg.cell_size_px = cell;
    cfg.projection = Projection::Isometric;
    cfg
}

#[test]
fn ortho_counts_follow_their_own_axis() {
    let mut cfg = ortho(200, 60);
    assert_eq!(
        OrthoCounts::for_config(&cfg),
        OrthoCounts {
            vertical: 10,
            horizontal: 3,
        }
    );
    cfg.cell_size_px = 7.0;
    let counts = OrthoCounts::for_config(&cfg);
    assert_eq!(counts.vertical, 15);
    assert_eq!(counts.horizontal, 5);
}

#[test]
fn ortho_scenario_classifies_indices() {
    let plan = compile_grid(&ortho(110, 110)).unwrap();

    let vertical_kinds: Vec<(u32, LineKind)> = plan
        .segments()
        .filter(|(_, s)| s.orientation == Orientation::Vertical)
        .map(|(k, s)| (s.index, k))
        .collect();

    for (index, kind) in &vertical_kinds {
        let expected = match index {
            0 => LineKind::Grid(Level::Cluster),
            5 => LineKind::Grid(Level::Group),
            1..=4 => LineKind::Grid(Level::Cell),
            other => panic!("unexpected vertical index {other}"),
        };
        assert_eq!(*kind, expected, "index {index}");
    }
    let indices: HashSet<u32> = vertical_kinds.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, (0..6).collect());

    let group_xs: Vec<f64> = plan
        .segments()
        .filter(|(k, s)| {
            *k == LineKind::Grid(Level::Group) && s.orientation == Orientation::Vertical
        })
        .map(|(_, s)| s.line.p0.x)
        .collect();
    assert_eq!(group_xs, vec![105.0, 5.0]);
}

#[test]
fn ortho_scenario_at_100px_stops_before_the_group_line() {
    let cfg = ortho(100, 100);
    assert_eq!(OrthoCounts::for_config(&cfg).vertical, 5);

    let plan = compile_grid(&cfg).unwrap();
    let indices: HashSet<u32> = plan
        .segments()
        .filter(|(_, s)| s.orientation == Orientation::Vertical)
        .map(|(_, s)| s.index)
        .collect();
    assert_eq!(indices, (0..5).collect());
    let vertical_groups = plan
        .segments()
        .filter(|(k, s)| {
            s.orientation == Orientation::Vertical && *k == LineKind::Grid(Level::Group)
        })
        .count();
    assert_eq!(vertical_groups, 0);
}

#[test]
fn passes_are_layered_cell_group_cluster() {
    let plan = compile_grid(&ortho(110, 110)).unwrap();
    let kinds: Vec<LineKind> = plan.passes.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LineKind::Grid(Level::Cell),
            LineKind::Grid(Level::Group),
            LineKind::Grid(Level::Cluster),
        ]
    );
    let widths: Vec<f64> = plan.passes.iter().map(|p| p.style.width).collect();
    assert_eq!(widths, vec![1.0, 1.0, 2.0]);
    assert!(plan.passes.iter().all(|p| p.style.smoothing == Smoothing::Crisp));
    assert_eq!(plan.passes[0].style.dash, DashStyle::Dotted);
    assert_eq!(plan.passes[1].style.dash, DashStyle::Dashed);
}

#[test]
fn ortho_lines_are_mirrored_about_the_center() {
    let mut cfg = ortho(173, 91);
    cfg.cell_size_px = 6.0;
    cfg.cells_per_group = 3;
    cfg.groups_per_cluster = 4;
    let plan = compile_grid(&cfg).unwrap();
    let center = cfg.center();

    let key = |s: &Segment| match s.orientation {
        Orientation::Vertical => (s.orientation, s.line.p0.x.to_bits()),
        _ => (s.orientation, s.line.p0.y.to_bits()),
    };
    let all: HashSet<_> = plan.segments().map(|(_, s)| key(s)).collect();

    for (_, s) in plan.segments() {
        let mirrored = match s.orientation {
            Orientation::Vertical => {
                (s.orientation, (2.0 * center.x - s.line.p0.x).to_bits())
            }
            _ => (s.orientation, (2.0 * center.y - s.line.p0.y).to_bits()),
        };
        assert!(all.contains(&mirrored), "segment {s:?} lacks a twin");
    }

    let zero: Vec<_> = plan.segments().filter(|(_, s)| s.index == 0).collect();
    assert_eq!(zero.len(), 2, "one singular line per axis");
}

#[test]
fn no_line_is_drawn_twice() {
    for cpg in 1..=10 {
        for gpc in 1..=10 {
            let mut cfg = ortho(120, 80);
            cfg.cell_size_px = 4.0;
            cfg.cells_per_group = cpg;
            cfg.groups_per_cluster = gpc;
            let plan = compile_grid(&cfg).unwrap();

            let mut seen = HashSet::new();
            for (_, s) in plan.segments() {
                let k = (
                    s.orientation,
                    s.line.p0.x.to_bits(),
                    s.line.p0.y.to_bits(),
                );
                assert!(seen.insert(k), "duplicate {s:?} for cpg={cpg} gpc={gpc}");
            }

            let counts = OrthoCounts::for_config(&cfg);
            let expected = (2 * counts.vertical - 1) + (2 * counts.horizontal - 1);
            assert_eq!(plan.segment_count(), expected as usize);
        }
    }
}

#[test]
fn iso_scenario_metrics() {
    let cfg = iso(20.0, 200, 200);
    let m = IsoMetrics::for_config(&cfg);
    assert!((m.sine_helper - 1.732_050_8).abs() < 1e-6);
    assert_eq!(m.reference_count, 6);
    assert_eq!(m.diagonal_count, 16);

    let plan = compile_grid(&cfg).unwrap();
    let reference_indices: HashSet<u32> = plan
        .segments()
        .filter(|(k, _)| matches!(k, LineKind::Reference(_)))
        .map(|(_, s)| s.index)
        .collect();
    assert_eq!(reference_indices, (0..6).collect());
    let reference_segments = plan
        .segments()
        .filter(|(k, _)| matches!(k, LineKind::Reference(_)))
        .count();
    assert_eq!(reference_segments, 11);
}

#[test]
fn iso_references_come_first_and_are_tiered() {
    let mut cfg = iso(20.0, 200, 200);
    cfg.iso_vertical_color = Rgba8::new(10, 20, 30, 255);
    cfg.cells_per_group = 2;
    cfg.groups_per_cluster = 2;
    let plan = compile_grid(&cfg).unwrap();

    let kinds: Vec<LineKind> = plan.passes.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LineKind::Reference(Level::Cell),
            LineKind::Reference(Level::Group),
            LineKind::Reference(Level::Cluster),
            LineKind::Grid(Level::Cell),
            LineKind::Grid(Level::Group),
            LineKind::Grid(Level::Cluster),
        ]
    );

    let minor = &plan.passes[0].style;
    assert_eq!(minor.color, Rgba8::new(10, 20, 30, REFERENCE_MINOR_ALPHA));
    assert_eq!(minor.width, 1.0);
    assert_eq!(plan.passes[1].style.color.a, 255);
    assert_eq!(plan.passes[2].style.width, 2.0);
    assert!(plan.passes[..3].iter().all(|p| p.style.dash == DashStyle::Solid));
    assert!(plan.passes[..3].iter().all(|p| p.style.smoothing == Smoothing::Crisp));

    let diag_widths: Vec<f64> = plan.passes[3..].iter().map(|p| p.style.width).collect();
    assert_eq!(diag_widths, vec![1.0, 1.0, 1.6]);
    assert!(plan.passes[3..].iter().all(|p| p.style.smoothing == Smoothing::AntiAlias));
}

#[test]
fn iso_reference_spacing() {
    let cfg = iso(20.0, 200, 200);
    let plan = compile_grid(&cfg).unwrap();
    let spacing = 10.0 * IsoMetrics::for_config(&cfg).sine_helper;
    for (_, s) in plan
        .segments()
        .filter(|(k, _)| matches!(k, LineKind::Reference(_)))
    {
        let offset = (s.line.p0.x - 100.0).abs();
        assert!((offset - spacing * f64::from(s.index)).abs() < 1e-9);
        assert_eq!(s.line.p0.y, 0.0);
        assert_eq!(s.line.p1.y, 200.0);
    }
}

#[test]
fn iso_diagonals_skip_index_zero_and_pair_up() {
    let cfg = iso(20.0, 200, 200);
    let m = IsoMetrics::for_config(&cfg);
    let plan = compile_grid(&cfg).unwrap();

    let diagonals: Vec<&Segment> = plan
        .segments()
        .filter(|(k, _)| matches!(k, LineKind::Grid(_)))
        .map(|(_, s)| s)
        .collect();
    assert_eq!(diagonals.len(), 2 * (m.diagonal_count as usize - 1));
    assert!(diagonals.iter().all(|s| s.index >= 1));

    let left = diagonals
        .iter()
        .find(|s| s.index == 3 && s.orientation == Orientation::DiagonalLeft)
        .unwrap();
    assert_eq!(left.line.p0, Point::new(0.0, 60.0));
    assert!((left.line.p1.x - 60.0 * m.sine_helper).abs() < 1e-9);
    assert_eq!(left.line.p1.y, 0.0);

    let right = diagonals
        .iter()
        .find(|s| s.index == 3 && s.orientation == Orientation::DiagonalRight)
        .unwrap();
    assert_eq!(right.line.p0, Point::new(200.0, 60.0));
    assert!((right.line.p1.x - (200.0 - 60.0 * m.sine_helper)).abs() < 1e-9);
}

#[test]
fn diagonal_classification_matches_classify() {
    let mut cfg = iso(10.0, 300, 120);
    cfg.cells_per_group = 3;
    cfg.groups_per_cluster = 2;
    let plan = compile_grid(&cfg).unwrap();
    for (kind, s) in plan.segments() {
        if let LineKind::Grid(level) = kind {
            assert_eq!(level, classify(s.index, 3, 2));
        }
    }
}

#[test]
fn dash_lengths_scale_with_width() {
    let style = LineStyle {
        width: 2.0,
        color: Rgba8::BLACK,
        dash: DashStyle::Dashed,
        smoothing: Smoothing::Crisp,
    };
    assert_eq!(style.dash_lengths(), vec![6.0, 2.0]);
}

#[test]
fn invalid_config_produces_no_plan() {
    let mut cfg = ortho(50, 50);
    cfg.cell_size_px = 0.0;
    assert!(compile_grid(&cfg).unwrap_err().is_config());
}
