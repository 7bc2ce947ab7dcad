use rand::Rng;

use crate::quiz::Question;

/// Upper bound on the number of questions asked in one session.
pub const SESSION_QUESTION_CAP: usize = 5;

/// In-place Fisher–Yates: walks from the last index down to 1 and swaps each
/// slot with a uniformly chosen index in `0..=i`.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        // drawn as u64 so a seed gives the same order on 32- and 64-bit targets
        let j = rng.gen_range(0..=i as u64) as usize;
        items.swap(i, j);
    }
}

/// Permutes the whole bank and keeps the first `SESSION_QUESTION_CAP`.
pub fn sample<R: Rng + ?Sized>(bank: &[Question], rng: &mut R) -> Vec<Question> {
    let mut questions = bank.to_vec();
    fisher_yates(&mut questions, rng);
    questions.truncate(SESSION_QUESTION_CAP);
    return questions;
}
