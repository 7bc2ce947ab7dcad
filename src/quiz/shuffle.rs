use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::quiz::sampler::fisher_yates;
use crate::quiz::{Letter, Question};

const SEED_MULTIPLIER: u64 = 7919;

/// One option as the user sees it. `label` is the display position and is
/// cosmetic; grading only looks at `original_letter` and `text`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PresentedOption {
    pub label: Letter,
    pub original_letter: Letter,
    pub text: String,
}

pub fn seed_for(question_index: usize) -> u64 {
    (question_index as u64 + 1) * SEED_MULTIPLIER
}

/// Shuffles the four options of `question` with a generator seeded from its
/// position in the session, so the same position always yields the same order.
pub fn present_options(question: &Question, question_index: usize) -> Vec<PresentedOption> {
    let mut options: Vec<(Letter, String)> = Letter::ALL
        .iter()
        .copied()
        .zip(question.options.iter().cloned())
        .collect();

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed_for(question_index));
    fisher_yates(&mut options, &mut rng);

    return options
        .into_iter()
        .zip(Letter::ALL)
        .map(|((original_letter, text), label)| PresentedOption {
            label,
            original_letter,
            text,
        })
        .collect();
}
