//! End-to-end session scenarios.

use clt_explorer::distributions::{self, DistributionKind};
use clt_explorer::histogram::Histogram;
use clt_explorer::random::{create_rng, ScriptedSource};
use clt_explorer::sampling::{draw_sample_mean, SampleSize};
use clt_explorer::{Explorer, ExplorerConfig, ManualClock, RunState};

fn session(config: ExplorerConfig) -> (Explorer, ManualClock) {
    let clock = ManualClock::new();
    let explorer = Explorer::with_parts(config, create_rng(2024), clock.clone()).unwrap();
    (explorer, clock)
}

#[test]
fn uniform_mean_of_scripted_draws() {
    let mut src = ScriptedSource::new(vec![0.1, 0.2, 0.3, 0.4, 0.5]);
    let m = draw_sample_mean(
        DistributionKind::Uniform,
        SampleSize::new(5).unwrap(),
        &mut src,
    );
    assert!((m - 0.3).abs() < 1e-15);
}

#[test]
fn four_bin_histogram_clamps_upper_edge() {
    let h = Histogram::rebuild(&[0.1, 0.26, 0.5, 0.99, 1.0], 4).unwrap();
    assert_eq!(h.counts(), &[1, 1, 1, 2]);
}

#[test]
fn triangular_of_scripted_pair() {
    let mut src = ScriptedSource::new(vec![0.2, 0.8]);
    assert_eq!(distributions::triangular(&mut src), 0.5);
}

#[test]
fn changing_sample_size_clears_collection() {
    let (mut ex, _) = session(ExplorerConfig::default().with_sample_size(5));
    for _ in 0..50 {
        ex.sample_once();
    }
    assert_eq!(ex.means().len(), 50);
    ex.set_sample_size(10).unwrap();
    assert!(ex.means().is_empty());
    assert_eq!(ex.summary().count, 0);
    assert_eq!(ex.sample_size().get(), 10);
}

#[test]
fn reset_always_yields_empty_views() {
    let (mut ex, clock) = session(ExplorerConfig::default());
    ex.reset();
    assert_eq!((ex.summary().count, ex.summary().mean), (0, 0.0));

    for _ in 0..25 {
        ex.sample_once();
    }
    ex.start_auto_run(50, 10).unwrap();
    clock.advance_ms(50);
    ex.pump();
    ex.reset();

    let s = ex.summary();
    assert_eq!((s.count, s.mean), (0, 0.0));
    assert!(ex.histogram(41).unwrap().counts().iter().all(|&c| c == 0));
    assert!(ex.histogram(12).unwrap().counts().iter().all(|&c| c == 0));
    assert_eq!(ex.run_state(), RunState::Idle);

    // a stopped timer must not refill the collection
    clock.advance_ms(500);
    assert_eq!(ex.pump(), 0);
    assert!(ex.means().is_empty());
}

#[test]
fn double_start_runs_one_timer() {
    let (mut ex, clock) = session(ExplorerConfig::default());
    assert!(ex.start_auto_run(50, 10).unwrap());
    assert!(!ex.start_auto_run(50, 10).unwrap());
    clock.advance_ms(50);
    assert_eq!(ex.pump(), 10);
    ex.stop_auto_run();
    assert_eq!(ex.means().len(), 10);
    clock.advance_ms(50);
    assert_eq!(ex.pump(), 0);
    assert_eq!(ex.means().len(), 10);
}

#[test]
fn sample_once_while_running_keeps_state() {
    let (mut ex, clock) = session(ExplorerConfig::default());
    ex.start_auto_run_default();
    ex.sample_once();
    assert!(ex.run_state().is_running());
    clock.advance_ms(50);
    ex.pump();
    assert_eq!(ex.means().len(), 11);
}

#[test]
fn histogram_total_matches_collection_with_bleed() {
    let (mut ex, clock) = session(
        ExplorerConfig::default()
            .with_distribution(DistributionKind::Bimodal)
            .with_sample_size(1)
            .with_auto_run(10, 100),
    );
    ex.start_auto_run_default();
    for _ in 0..20 {
        clock.advance_ms(10);
        ex.pump();
    }
    let n = ex.means().len() as u64;
    assert_eq!(n, 2000);
    let h = ex.histogram(41).unwrap();
    assert_eq!(h.counts().iter().sum::<u64>(), n);
    assert_eq!(h, Histogram::rebuild(ex.means(), 41).unwrap());
}

#[test]
fn means_converge_on_prediction() {
    for kind in DistributionKind::ALL {
        let (mut ex, clock) = session(
            ExplorerConfig::default()
                .with_distribution(kind)
                .with_sample_size(25)
                .with_auto_run(50, 500),
        );
        ex.start_auto_run_default();
        for _ in 0..4 {
            clock.advance_ms(50);
            ex.pump();
        }
        let summary = ex.summary();
        let prediction = ex.prediction();
        assert_eq!(summary.count, 2000);
        assert!(
            (summary.mean - prediction.mean()).abs() < 5.0 * prediction.std_error() / (2000.0_f64).sqrt() + 1e-3,
            "{kind}: mean {} vs {}",
            summary.mean,
            prediction.mean()
        );
        let sd = summary.std_dev.unwrap();
        assert!(
            (sd / prediction.std_error() - 1.0).abs() < 0.1,
            "{kind}: sd {sd} vs {}",
            prediction.std_error()
        );
    }
}

#[test]
fn seeded_sessions_are_reproducible() {
    let config = ExplorerConfig::default()
        .with_distribution(DistributionKind::Stepped)
        .with_seed(11);
    let mut a = Explorer::new(config.clone()).unwrap();
    let mut b = Explorer::new(config).unwrap();
    for _ in 0..40 {
        a.sample_once();
        b.sample_once();
    }
    assert_eq!(a.means(), b.means());
}

#[test]
fn config_from_toml_drives_session() {
    let config = ExplorerConfig::from_toml_str(
        r#"
        distribution = "parabolic"
        sample_size = 3
        bin_count = 20
        auto_run_interval_ms = 25
        auto_run_batch_size = 4
        seed = 5
        "#,
    )
    .unwrap();
    let clock = ManualClock::new();
    let mut ex = Explorer::with_parts(config, create_rng(5), clock.clone()).unwrap();
    assert_eq!(ex.distribution(), DistributionKind::Parabolic);
    assert_eq!(ex.current_histogram().bin_count(), 20);
    ex.start_auto_run_default();
    clock.advance_ms(25);
    assert_eq!(ex.pump(), 4);
}
