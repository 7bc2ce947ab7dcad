use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::quiz::bank::QuestionBank;
use crate::quiz::session::{Phase, QuizSession, RevealTicket};

/// What the user typed, before the current phase gives it a meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Option(usize),
    Next,
    Reset,
    Quit,
    Other,
}

impl Input {
    /// `1`-`4` or `a`-`d` pick an option, `n` advances, `r` resets, `q` quits.
    pub fn parse(line: &str) -> Input {
        let line = line.trim().to_lowercase();
        match line.as_str() {
            "n" | "next" => Input::Next,
            "r" | "reset" => Input::Reset,
            "q" | "quit" => Input::Quit,
            "1" | "a" => Input::Option(0),
            "2" | "b" => Input::Option(1),
            "3" | "c" => Input::Option(2),
            "4" | "d" => Input::Option(3),
            _ => Input::Other,
        }
    }
}

pub trait Presenter {
    fn render(&mut self, session: &QuizSession);
}

/// Owns the session and feeds it one event at a time: user input from the
/// presenter and reveal tickets coming back from timer tasks.
pub struct Driver<P> {
    session: QuizSession,
    presenter: P,
    bank_path: PathBuf,
    reveal_delay: Duration,
    reveal_timer: Option<JoinHandle<()>>,
    reveal_tx: UnboundedSender<RevealTicket>,
    reveal_rx: UnboundedReceiver<RevealTicket>,
}

impl<P: Presenter> Driver<P> {
    pub fn new(session: QuizSession, presenter: P, config: &Config) -> Self {
        let (reveal_tx, reveal_rx) = mpsc::unbounded_channel();
        Self {
            session,
            presenter,
            bank_path: config.bank_path.clone(),
            reveal_delay: config.reveal_delay,
            reveal_timer: None,
            reveal_tx,
            reveal_rx,
        }
    }

    /// Runs until `Input::Quit` or until the input side hangs up.
    pub async fn run(mut self, mut inputs: UnboundedReceiver<Input>) -> (QuizSession, P) {
        self.presenter.render(&self.session);
        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    None | Some(Input::Quit) => break,
                    Some(input) => self.dispatch(input),
                },
                Some(ticket) = self.reveal_rx.recv() => {
                    let Some(outcome) = self.session.reveal_timer_fires(ticket) else {
                        continue;
                    };
                    info!(
                        "Question {}: option {} is {}",
                        outcome.question_index + 1,
                        outcome.selected_index + 1,
                        if outcome.correct { "correct" } else { "wrong" }
                    );
                    self.reveal_timer = None;
                }
            }
            self.presenter.render(&self.session);
        }
        self.cancel_reveal();
        info!("Quiz closed with score {}", self.session.score());
        (self.session, self.presenter)
    }

    fn dispatch(&mut self, input: Input) {
        debug!("Input {:?} in phase {:?}", input, self.session.phase());
        match (self.session.phase(), input) {
            (Phase::EmptyBank, _) => self.reload(),
            (Phase::Result, _) => self.reset(),
            (Phase::Quiz, Input::Option(index)) => {
                if let Some(ticket) = self.session.select_option(index) {
                    self.schedule_reveal(ticket);
                }
            }
            (Phase::Quiz, Input::Next) => {
                if self.session.advance() {
                    self.cancel_reveal();
                }
            }
            (Phase::Quiz, Input::Reset) => self.reset(),
            (Phase::Quiz, Input::Quit | Input::Other) => {}
        }
    }

    fn reset(&mut self) {
        self.cancel_reveal();
        self.session.reset();
    }

    fn reload(&mut self) {
        self.cancel_reveal();
        info!("Reloading question bank from {}", self.bank_path.display());
        self.session.reload(QuestionBank::open(&self.bank_path));
    }

    fn schedule_reveal(&mut self, ticket: RevealTicket) {
        self.cancel_reveal();
        let tx = self.reveal_tx.clone();
        let delay = self.reveal_delay;
        self.reveal_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // the driver may be gone already
            let _ = tx.send(ticket);
        }));
    }

    fn cancel_reveal(&mut self) {
        if let Some(timer) = self.reveal_timer.take() {
            timer.abort();
        }
    }
}
