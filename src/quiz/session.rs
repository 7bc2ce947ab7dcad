use log::{debug, info, warn};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::quiz::bank::{BankError, QuestionBank};
use crate::quiz::sampler::sample;
use crate::quiz::shuffle::{present_options, PresentedOption};
use crate::quiz::tier::Tier;
use crate::quiz::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// Nothing to ask; the user can only retry the load.
    EmptyBank,
    Quiz,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStage {
    Unanswered,
    PendingReveal,
    Revealed,
}

/// How a presented option should be marked right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    Neutral,
    Pending,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionQuestion {
    pub question: Question,
    pub presented_options: Vec<PresentedOption>,
    pub revealed: bool,
    pub selected_index: Option<usize>,
    pub pending_index: Option<usize>,
}

impl SessionQuestion {
    fn new(question: Question) -> Self {
        Self {
            question,
            presented_options: Vec::new(),
            revealed: false,
            selected_index: None,
            pending_index: None,
        }
    }

    /// Builds a fresh shuffled view and clears any reveal state.
    fn prepare(&mut self, index: usize) {
        self.presented_options = present_options(&self.question, index);
        self.revealed = false;
        self.selected_index = None;
        self.pending_index = None;
    }

    pub fn text(&self) -> &str {
        &self.question.text
    }

    pub fn stage(&self) -> QuestionStage {
        if self.revealed {
            QuestionStage::Revealed
        } else if self.pending_index.is_some() {
            QuestionStage::PendingReveal
        } else {
            QuestionStage::Unanswered
        }
    }

    pub fn is_option_correct(&self, index: usize) -> bool {
        self.presented_options
            .get(index)
            .map(|o| self.question.is_correct(o.original_letter, &o.text))
            .unwrap_or(false)
    }

    pub fn option_status(&self, index: usize) -> OptionStatus {
        if self.revealed {
            if self.is_option_correct(index) {
                OptionStatus::Correct
            } else if self.selected_index == Some(index) {
                OptionStatus::Wrong
            } else {
                OptionStatus::Neutral
            }
        } else if self.pending_index == Some(index) {
            OptionStatus::Pending
        } else {
            OptionStatus::Neutral
        }
    }

    /// `None` until the question is revealed.
    pub fn answered_correctly(&self) -> Option<bool> {
        if !self.revealed {
            return None;
        }
        Some(
            self.selected_index
                .map(|i| self.is_option_correct(i))
                .unwrap_or(false),
        )
    }
}

/// Identifies one scheduled reveal. Any later selection, advance or reset
/// moves the session to a newer generation, which turns the ticket stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    generation: u64,
    question_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealOutcome {
    pub question_index: usize,
    pub selected_index: usize,
    pub correct: bool,
}

pub struct QuizSession {
    bank: Vec<Question>,
    questions: Vec<SessionQuestion>,
    current_index: usize,
    score: usize,
    phase: Phase,
    tier: Option<Tier>,
    generation: u64,
    rng: Xoshiro256PlusPlus,
}

impl QuizSession {
    pub fn new(bank: Vec<Question>, rng: Xoshiro256PlusPlus) -> Self {
        let mut session = Self {
            bank,
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            phase: Phase::EmptyBank,
            tier: None,
            generation: 0,
            rng,
        };
        session.reset();
        session
    }

    pub fn with_seed(bank: Vec<Question>, seed: u64) -> Self {
        Self::new(bank, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    /// A failed load is not an error for the session, it just has nothing to ask.
    pub fn from_load(loaded: Result<QuestionBank, BankError>, rng: Xoshiro256PlusPlus) -> Self {
        Self::new(bank_or_empty(loaded), rng)
    }

    /// Replaces the bank and starts over. Used by the retry-load action.
    pub fn reload(&mut self, loaded: Result<QuestionBank, BankError>) {
        self.bank = bank_or_empty(loaded);
        self.reset();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Only set in the result phase.
    pub fn tier(&self) -> Option<Tier> {
        self.tier
    }

    pub fn questions(&self) -> &[SessionQuestion] {
        &self.questions
    }

    pub fn current(&self) -> Option<&SessionQuestion> {
        match self.phase {
            Phase::Quiz => self.questions.get(self.current_index),
            _ => None,
        }
    }

    /// Records `index` as the pending choice and hands out a ticket for the
    /// reveal. Returns `None` when the selection is not allowed right now.
    pub fn select_option(&mut self, index: usize) -> Option<RevealTicket> {
        if self.phase != Phase::Quiz {
            debug!("Ignoring selection {} outside of the quiz phase", index);
            return None;
        }
        let current_index = self.current_index;
        let question = self.questions.get_mut(current_index)?;
        if question.revealed || index >= question.presented_options.len() {
            debug!("Ignoring selection {} on question {}", index, current_index);
            return None;
        }

        question.pending_index = Some(index);
        self.generation += 1;
        debug!(
            "Question {}: option {} pending (generation {})",
            current_index, index, self.generation
        );
        Some(RevealTicket {
            generation: self.generation,
            question_index: current_index,
        })
    }

    pub fn is_current(&self, ticket: RevealTicket) -> bool {
        self.phase == Phase::Quiz
            && ticket.generation == self.generation
            && ticket.question_index == self.current_index
    }

    /// Reveals and grades the pending choice. A stale ticket is dropped.
    pub fn reveal_timer_fires(&mut self, ticket: RevealTicket) -> Option<RevealOutcome> {
        if !self.is_current(ticket) {
            debug!("Dropping stale reveal (generation {})", ticket.generation);
            return None;
        }
        let question = self.questions.get_mut(self.current_index)?;
        if question.revealed {
            return None;
        }
        let selected_index = question.pending_index.take()?;

        question.revealed = true;
        question.selected_index = Some(selected_index);
        let correct = question.is_option_correct(selected_index);
        if correct {
            self.score += 1;
        }
        debug!(
            "Question {} revealed: option {} is {}, score {}",
            self.current_index,
            selected_index,
            if correct { "correct" } else { "wrong" },
            self.score
        );
        Some(RevealOutcome {
            question_index: self.current_index,
            selected_index,
            correct,
        })
    }

    /// Moves past a revealed question. Returns whether anything changed.
    pub fn advance(&mut self) -> bool {
        let revealed = self
            .current()
            .map(|question| question.revealed)
            .unwrap_or(false);
        if !revealed {
            debug!("Ignoring advance on unrevealed question {}", self.current_index);
            return false;
        }

        self.generation += 1;
        self.current_index += 1;
        if self.current_index < self.questions.len() {
            let index = self.current_index;
            self.questions[index].prepare(index);
            debug!("Advanced to question {}", index);
        } else {
            let tier = Tier::classify(self.score, self.questions.len());
            self.tier = Some(tier);
            self.phase = Phase::Result;
            info!(
                "Quiz finished: {} / {} ({})",
                self.score,
                self.questions.len(),
                tier
            );
        }
        true
    }

    /// Draws a fresh sample from the whole bank and starts at question 0.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.questions = sample(&self.bank, &mut self.rng)
            .into_iter()
            .map(SessionQuestion::new)
            .collect();
        self.current_index = 0;
        self.score = 0;
        self.tier = None;

        match self.questions.first_mut() {
            Some(first) => {
                first.prepare(0);
                self.phase = Phase::Quiz;
                info!(
                    "New quiz: {} of {} questions",
                    self.questions.len(),
                    self.bank.len()
                );
            }
            None => {
                self.phase = Phase::EmptyBank;
                info!("Question bank is empty, waiting for a reload");
            }
        }
    }
}

fn bank_or_empty(loaded: Result<QuestionBank, BankError>) -> Vec<Question> {
    match loaded {
        Ok(bank) => bank.questions,
        Err(err) => {
            warn!("No questions available: {}", err);
            Vec::new()
        }
    }
}
