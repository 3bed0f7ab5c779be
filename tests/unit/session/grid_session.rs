use std::thread;

use super::*;
use crate::foundation::core::Rgba8;
use crate::grid::config::Projection;
use crate::render::backend::compose;
use crate::render::tiles::NeverCancel;

fn config() -> GridConfig {
    let mut cfg = GridConfig::new(48, 32);
    cfg.background = Rgba8::WHITE;
    cfg
}

#[test]
fn new_composes_first_generation() {
    let session = GridSession::new(config()).unwrap();
    assert_eq!(session.generation(), 1);
    assert_eq!(
        session.stats(),
        SessionStats {
            composes: 1,
            compose_skips: 0
        }
    );
    assert_eq!(*session.snapshot(), compose(&config()).unwrap());
    assert_eq!(session.config(), config());
}

#[test]
fn identical_config_is_skipped() {
    let session = GridSession::new(config()).unwrap();
    let before = session.snapshot();
    assert!(!session.reconfigure(config()).unwrap());
    assert_eq!(session.generation(), 1);
    assert_eq!(session.stats().compose_skips, 1);
    assert!(Arc::ptr_eq(&before, &session.snapshot()));
}

#[test]
fn changed_config_swaps_buffer() {
    let session = GridSession::new(config()).unwrap();
    let old = session.snapshot();

    let mut next = config();
    next.projection = Projection::Isometric;
    assert!(session.reconfigure(next.clone()).unwrap());
    assert_eq!(session.generation(), 2);
    assert_eq!(session.stats().composes, 2);
    assert_eq!(session.config(), next);

    // Old snapshots stay valid and unchanged.
    assert_eq!(*old, compose(&config()).unwrap());
    assert_ne!(*old, *session.snapshot());
}

#[test]
fn failed_reconfigure_keeps_generation() {
    let session = GridSession::new(config()).unwrap();
    let mut bad = config();
    bad.cells_per_group = 0;
    assert!(session.reconfigure(bad).unwrap_err().is_config());
    assert_eq!(session.generation(), 1);
    assert_eq!(session.config(), config());
}

#[test]
fn paints_from_current_generation() {
    let session = GridSession::new(config()).unwrap();
    let mut tile_dst = Surface::new(48, 32);
    let bounds = tile_dst.bounds();
    let out = session
        .paint_tile(&mut tile_dst, Vec2::ZERO, bounds, &NeverCancel)
        .unwrap();
    assert_eq!(out.rows_painted(), 32);
    assert_eq!(tile_dst.data, session.snapshot().data());

    let mut par_dst = Surface::new(48, 32);
    let stats = session
        .paint_region_parallel(&mut par_dst, Vec2::ZERO, bounds, &TileOpts::default(), &NeverCancel)
        .unwrap();
    assert!(stats.is_complete());
    assert_eq!(par_dst, tile_dst);
}

#[test]
fn concurrent_paint_and_reconfigure() {
    let session = Arc::new(GridSession::new(config()).unwrap());
    let first = compose(&config()).unwrap();
    let mut second_cfg = config();
    second_cfg.cell_size_px = 6.0;
    let second = compose(&second_cfg).unwrap();

    let painter = {
        let session = Arc::clone(&session);
        thread::spawn(move || {
            let mut frames = Vec::new();
            for _ in 0..8 {
                let mut dst = Surface::new(48, 32);
                let bounds = dst.bounds();
                session
                    .paint_tile(&mut dst, Vec2::ZERO, bounds, &NeverCancel)
                    .unwrap();
                frames.push(dst.data);
            }
            frames
        })
    };
    session.reconfigure(second_cfg).unwrap();

    for frame in painter.join().unwrap() {
        assert!(frame == first.data() || frame == second.data());
    }
}

#[test]
fn recomposition_reuses_the_session_backend() {
    let session = GridSession::new(config()).unwrap();
    let cached = |s: &GridSession| s.backend.lock().unwrap().cached_size();
    assert_eq!(cached(&session), Some((48, 32)));

    let mut same_size = config();
    same_size.cell_size_px = 12.0;
    assert!(session.reconfigure(same_size.clone()).unwrap());
    assert_eq!(cached(&session), Some((48, 32)));
    assert_eq!(*session.snapshot(), compose(&same_size).unwrap());

    let resized = GridConfig::new(20, 24);
    assert!(session.reconfigure(resized.clone()).unwrap());
    assert_eq!(cached(&session), Some((20, 24)));
    assert_eq!(*session.snapshot(), compose(&resized).unwrap());
}
