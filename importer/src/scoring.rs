use snapshot_apis::Test;

/// Credit which is split between tests when package declares no points
pub const FULL_CREDIT: f64 = 100.0;

/// Splits [`FULL_CREDIT`] between `count` tests. Scores are integral and
/// rounding remainder goes to the last tests.
pub fn distribute_evenly(count: usize) -> Vec<f32> {
    let mut credit = FULL_CREDIT;
    (0..count)
        .map(|i| {
            let remaining = (count - i) as f64;
            let score = (credit / remaining).floor().min(credit);
            credit -= score;
            score as f32
        })
        .collect()
}

/// Keeps declared scores, unless they sum up to zero. In that case scores
/// are distributed evenly.
pub(crate) fn assign_scores(tests: &mut [Test]) {
    let total: f32 = tests.iter().map(|test| test.score).sum();
    if total != 0.0 {
        return;
    }
    tracing::debug!(count = tests.len(), "no points declared, distributing evenly");
    let scores = distribute_evenly(tests.len());
    for (test, score) in tests.iter_mut().zip(scores) {
        test.score = score;
    }
}
