// Relabeling under the null hypothesis of exchangeable condition labels
//
// Every draw moves whole subjects: one decision per subject, applied to all
// frames. Inputs are borrowed and the pseudo datasets are new matrices, so
// concurrent workers can share the same source data.

use crate::error::{ClusterPermError, Result};
use crate::matrix::TimeSeriesMatrix;
use rand::seq::index;
use rand::Rng;

/// Swap each subject's condition labels with probability 1/2
///
/// A swapped subject contributes its condition 2 series to pseudo-condition
/// 1 and its condition 1 series to pseudo-condition 2, at every frame.
///
/// # Errors
/// `ShapeMismatch` unless both conditions have the same frames and subjects.
///
/// # Example
/// ```
/// use clusterperm::{paired_random_assign, TimeSeriesMatrix};
/// use rand::SeedableRng;
///
/// let cond1 = TimeSeriesMatrix::from_frames(vec![vec![1.0, 2.0]; 3])?;
/// let cond2 = TimeSeriesMatrix::from_frames(vec![vec![10.0, 20.0]; 3])?;
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
///
/// let (pseudo1, pseudo2) = paired_random_assign(&cond1, &cond2, &mut rng)?;
/// assert_eq!(pseudo1.n_subjects(), 2);
/// assert_eq!(pseudo2.n_frames(), 3);
/// # Ok::<(), clusterperm::ClusterPermError>(())
/// ```
pub fn paired_random_assign<R: Rng + ?Sized>(
    cond1: &TimeSeriesMatrix,
    cond2: &TimeSeriesMatrix,
    rng: &mut R,
) -> Result<(TimeSeriesMatrix, TimeSeriesMatrix)> {
    if cond1.n_frames() != cond2.n_frames() {
        return Err(ClusterPermError::frames(
            "paired permutation",
            cond1.n_frames(),
            cond2.n_frames(),
        ));
    }
    if cond1.n_subjects() != cond2.n_subjects() {
        return Err(ClusterPermError::subjects(
            "paired permutation",
            cond1.n_subjects(),
            cond2.n_subjects(),
        ));
    }

    let swapped: Vec<bool> = (0..cond1.n_subjects()).map(|_| rng.gen_bool(0.5)).collect();

    let pick = |frame: usize, subject: usize, swap: bool| -> f64 {
        let source = if swap { cond2 } else { cond1 };
        source.frame(frame)[subject]
    };

    let pseudo1 = TimeSeriesMatrix::from_fn(cond1.n_frames(), cond1.n_subjects(), |f, s| {
        pick(f, s, swapped[s])
    });
    let pseudo2 = TimeSeriesMatrix::from_fn(cond1.n_frames(), cond1.n_subjects(), |f, s| {
        pick(f, s, !swapped[s])
    });

    Ok((pseudo1, pseudo2))
}

/// Reassign pooled subjects to two groups of the original sizes
///
/// Subjects of both conditions are pooled (condition 1 first), then `n1`
/// pooled indices are drawn without replacement. Drawn subjects form
/// pseudo-condition 1 in ascending pooled order, the rest pseudo-condition 2.
///
/// # Errors
/// `ShapeMismatch` when the frame counts differ. Group sizes may differ.
pub fn random_assign<R: Rng + ?Sized>(
    cond1: &TimeSeriesMatrix,
    cond2: &TimeSeriesMatrix,
    rng: &mut R,
) -> Result<(TimeSeriesMatrix, TimeSeriesMatrix)> {
    if cond1.n_frames() != cond2.n_frames() {
        return Err(ClusterPermError::frames(
            "independent permutation",
            cond1.n_frames(),
            cond2.n_frames(),
        ));
    }

    let pooled = cond1.concat_subjects(cond2)?;
    let total = pooled.n_subjects();

    let mut in_group1 = vec![false; total];
    for i in index::sample(rng, total, cond1.n_subjects()).into_vec() {
        in_group1[i] = true;
    }

    let (group1, group2): (Vec<usize>, Vec<usize>) = (0..total).partition(|&i| in_group1[i]);

    Ok((pooled.select_subjects(&group1), pooled.select_subjects(&group2)))
}

/// Reflect each subject's series about `popmean` with probability 1/2
///
/// One-sample counterpart of the paired swap: under the null the
/// deviations from the population mean are symmetric, so flipping their
/// sign per subject yields an exchangeable pseudo dataset.
pub fn sign_flip_assign<R: Rng + ?Sized>(
    cond1: &TimeSeriesMatrix,
    popmean: f64,
    rng: &mut R,
) -> TimeSeriesMatrix {
    let flipped: Vec<bool> = (0..cond1.n_subjects()).map(|_| rng.gen_bool(0.5)).collect();

    TimeSeriesMatrix::from_fn(cond1.n_frames(), cond1.n_subjects(), |f, s| {
        let value = cond1.frame(f)[s];
        if flipped[s] {
            2.0 * popmean - value
        } else {
            value
        }
    })
}
