// Tests for the end-to-end cluster permutation test

use super::*;
use crate::cluster::ClusterStatistic;
use crate::ttest::Tail;

/// Subject baselines differ; a zero-mean (for multiples of 5 subjects)
/// jitter gives the paired differences nonzero variance
fn paired_with_effect(
    n_frames: usize,
    n_subjects: usize,
    effect_frames: std::ops::Range<usize>,
) -> (TimeSeriesMatrix, TimeSeriesMatrix) {
    let baseline = |f: usize, s: usize| s as f64 * 1.5 + (f as f64 * 0.7).sin();
    let cond1 = TimeSeriesMatrix::from_fn(n_frames, n_subjects, baseline);
    let cond2 = TimeSeriesMatrix::from_fn(n_frames, n_subjects, |f, s| {
        let jitter = (((f * 7 + s * 13) % 5) as f64 - 2.0) * 0.1;
        let effect = if effect_frames.contains(&f) { 3.0 } else { 0.0 };
        baseline(f, s) + effect + jitter
    });
    (cond1, cond2)
}

fn config(n_permutations: usize, seed: u64) -> PermutationConfig {
    PermutationConfig {
        n_permutations,
        seed,
        ..Default::default()
    }
}

#[test]
fn test_paired_run_finds_effect_cluster() {
    let (cond1, cond2) = paired_with_effect(20, 10, 6..12);
    let test = ClusterPermutationTest::new(
        Design::Paired,
        TestOptions::default(),
        ClusterConfig::default(),
        config(200, 4),
    );

    let result = test.run(&cond1, Comparand::Condition(&cond2)).unwrap();

    assert_eq!(result.observed.len(), 20);
    assert_eq!(result.null_distribution.len(), 200);

    let effect = result
        .clusters
        .iter()
        .find(|c| c.cluster.onset <= 6 && c.cluster.offset >= 11)
        .expect("effect window must be inside one cluster");

    // cond1 < cond2 in the window: large negative mass
    assert!(effect.statistic < 0.0);
    assert!((0.0..=1.0).contains(&effect.p_value));
    assert_eq!(effect.statistic, effect.cluster.sum);
}

#[test]
fn test_null_distribution_is_reproducible() {
    let (cond1, cond2) = paired_with_effect(12, 8, 3..7);
    let test = ClusterPermutationTest::new(
        Design::Paired,
        TestOptions::default(),
        ClusterConfig::permissive(),
        config(50, 17),
    );

    let a = test
        .null_distribution(&cond1, Comparand::Condition(&cond2))
        .unwrap();
    let b = test
        .null_distribution(&cond1, Comparand::Condition(&cond2))
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 50);
}

#[test]
fn test_null_distribution_follows_seed() {
    let (cond1, cond2) = paired_with_effect(12, 8, 3..7);
    let null_for = |seed| {
        ClusterPermutationTest::new(
            Design::Paired,
            TestOptions::default(),
            ClusterConfig::permissive(),
            config(50, seed),
        )
        .null_distribution(&cond1, Comparand::Condition(&cond2))
        .unwrap()
    };
    assert_ne!(null_for(1), null_for(2));
}

#[test]
fn test_no_clusters_gives_zero_null_entries() {
    // Identical conditions: every difference is zero, nothing is testable
    let cond = TimeSeriesMatrix::from_fn(5, 4, |f, s| f as f64 + s as f64);
    let test = ClusterPermutationTest::new(
        Design::Paired,
        TestOptions::default(),
        ClusterConfig::default(),
        config(10, 0),
    );

    let result = test.run(&cond, Comparand::Condition(&cond)).unwrap();
    assert!(result.clusters.is_empty());
    assert_eq!(result.null_distribution, vec![0.0; 10]);
    assert!(result.significant(0.05).is_empty());
}

#[test]
fn test_independent_run_with_unequal_groups() {
    let cond1 = TimeSeriesMatrix::from_fn(10, 6, |f, s| (f + s) as f64 * 0.2);
    let cond2 = TimeSeriesMatrix::from_fn(10, 9, |f, s| {
        let effect = if (3..7).contains(&f) { 4.0 } else { 0.0 };
        (f + s) as f64 * 0.2 + effect
    });
    let test = ClusterPermutationTest::new(
        Design::Independent,
        TestOptions::default().welch(),
        ClusterConfig::default(),
        config(100, 9),
    );

    let result = test.run(&cond1, Comparand::Condition(&cond2)).unwrap();
    assert_eq!(result.design, Design::Independent);
    assert_eq!(result.null_distribution.len(), 100);
    assert!(result
        .clusters
        .iter()
        .any(|c| c.cluster.onset <= 3 && c.cluster.offset >= 6));
}

#[test]
fn test_one_sample_run() {
    let cond1 = TimeSeriesMatrix::from_fn(8, 7, |f, s| {
        let effect = if f >= 4 { 5.0 } else { 0.0 };
        effect + ((s * 3 + f) % 4) as f64 * 0.25 - 0.375
    });
    let test = ClusterPermutationTest::new(
        Design::OneSample,
        TestOptions::default().with_tail(Tail::Greater),
        ClusterConfig::default(),
        PermutationConfig {
            n_permutations: 100,
            seed: 2,
            statistic: ClusterStatistic::Sum,
            tail: Tail::Greater,
        },
    );

    let result = test.run(&cond1, Comparand::PopulationMean(0.0)).unwrap();
    let last = result.clusters.last().expect("effect cluster");
    assert_eq!(last.cluster.offset, 7);
    assert!(last.statistic > 0.0);
}

#[test]
fn test_comparand_mismatch_rejected_before_permuting() {
    let cond1 = TimeSeriesMatrix::from_fn(4, 3, |f, s| (f * s) as f64);
    let paired = ClusterPermutationTest::new(
        Design::Paired,
        TestOptions::default(),
        ClusterConfig::default(),
        config(10, 0),
    );
    assert!(matches!(
        paired.run(&cond1, Comparand::PopulationMean(0.0)),
        Err(ClusterPermError::ComparandMismatch { .. })
    ));

    let one_sample = ClusterPermutationTest::new(
        Design::OneSample,
        TestOptions::default(),
        ClusterConfig::default(),
        config(10, 0),
    );
    assert!(matches!(
        one_sample.run(&cond1, Comparand::Condition(&cond1)),
        Err(ClusterPermError::ComparandMismatch { .. })
    ));
}

#[test]
fn test_invalid_configuration_rejected() {
    let (cond1, cond2) = paired_with_effect(6, 4, 1..3);

    let zero = ClusterPermutationTest::new(
        Design::Paired,
        TestOptions::default(),
        ClusterConfig::default(),
        config(0, 0),
    );
    assert!(matches!(
        zero.run(&cond1, Comparand::Condition(&cond2)),
        Err(ClusterPermError::InvalidConfig(_))
    ));

    let bad_threshold = ClusterPermutationTest::new(
        Design::Paired,
        TestOptions::default(),
        ClusterConfig {
            threshold: 1.5,
            ..Default::default()
        },
        config(10, 0),
    );
    assert!(bad_threshold
        .run(&cond1, Comparand::Condition(&cond2))
        .is_err());
}

#[test]
fn test_shape_mismatch_propagates() {
    let cond1 = TimeSeriesMatrix::from_fn(6, 4, |_, s| s as f64);
    let cond2 = TimeSeriesMatrix::from_fn(5, 4, |_, s| s as f64);
    let test = ClusterPermutationTest::new(
        Design::Paired,
        TestOptions::default(),
        ClusterConfig::default(),
        config(10, 0),
    );
    assert!(matches!(
        test.run(&cond1, Comparand::Condition(&cond2)),
        Err(ClusterPermError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_from_config_matches_new() {
    let mut analysis = AnalysisConfig::new(Design::Paired);
    analysis.permutation = config(30, 5);
    analysis.cluster = ClusterConfig::strict();

    let (cond1, cond2) = paired_with_effect(10, 6, 2..8);
    let a = ClusterPermutationTest::from_config(&analysis)
        .run(&cond1, Comparand::Condition(&cond2))
        .unwrap();
    let b = ClusterPermutationTest::new(
        Design::Paired,
        TestOptions::default(),
        ClusterConfig::strict(),
        config(30, 5),
    )
    .run(&cond1, Comparand::Condition(&cond2))
    .unwrap();

    assert_eq!(a, b);
    assert_eq!(ClusterPermutationTest::from_config(&analysis).design(), Design::Paired);
}

#[test]
fn test_run_does_not_mutate_inputs() {
    let (cond1, cond2) = paired_with_effect(8, 5, 2..5);
    let snapshot = (cond1.clone(), cond2.clone());
    let test = ClusterPermutationTest::new(
        Design::Independent,
        TestOptions::default(),
        ClusterConfig::default(),
        config(20, 1),
    );
    let _ = test.run(&cond1, Comparand::Condition(&cond2)).unwrap();
    assert_eq!(snapshot, (cond1, cond2));
}

#[test]
fn test_uniform_offset_result_survives_json() {
    // halves keep v + 5 exact, so every paired difference is exactly -5
    let cond1 = TimeSeriesMatrix::from_frames(vec![
        vec![3.0, 2.5, 4.0],
        vec![3.5, 3.0, 4.5],
        vec![3.0, 3.0, 4.0],
        vec![2.5, 3.5, 4.0],
        vec![3.0, 3.0, 4.5],
    ])
    .unwrap();
    let cond2 = cond1.map(|v| v + 5.0);
    let test = ClusterPermutationTest::new(
        Design::Paired,
        TestOptions::default(),
        ClusterConfig::default(),
        config(20, 9),
    );
    let result = test.run(&cond1, Comparand::Condition(&cond2)).unwrap();
    assert!(result.observed.t.iter().all(|&t| t == f64::NEG_INFINITY));

    let json = result.to_json().unwrap();
    assert!(json.contains("\"-inf\""));

    let parsed: ClusterTestResult = serde_json::from_str(&json).unwrap();
    assert!(parsed.observed.t.iter().all(|&t| t == f64::NEG_INFINITY));
    assert_eq!(parsed.observed.p, result.observed.p);
    assert_eq!(parsed.observed.df, result.observed.df);
    assert_eq!(parsed.clusters, result.clusters);
    assert_eq!(parsed.clusters.len(), 1);
    assert_eq!(parsed.clusters[0].cluster.sum, f64::NEG_INFINITY);

    let same_null = parsed
        .null_distribution
        .iter()
        .zip(&result.null_distribution)
        .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()));
    assert!(same_null);
    assert_eq!(parsed.null_distribution.len(), 20);
}
