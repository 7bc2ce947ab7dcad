use std::io::BufRead;

use dotenv::dotenv;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tokio::sync::mpsc;

use quiz_presenter::config::Config;
use quiz_presenter::driver::{Driver, Input, Presenter};
use quiz_presenter::quiz::bank::QuestionBank;
use quiz_presenter::quiz::session::{OptionStatus, Phase, QuizSession, SessionQuestion};

type MainResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> MainResult {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting quiz...");

    let config = Config::from_env()?;
    let rng = match config.seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_entropy(),
    };
    let session = QuizSession::from_load(QuestionBank::open(&config.bank_path), rng);

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    // Blocking stdin lives on its own thread so it never holds up shutdown.
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(Input::parse(&line)).is_err() {
                break;
            }
        }
    });

    let presenter = TerminalPresenter {
        bank_path: config.bank_path.display().to_string(),
    };
    let (session, _) = Driver::new(session, presenter, &config).run(input_rx).await;
    println!("Bye! Final score: {}", session.score());
    Ok(())
}

const CORRECT_TEXT: &str = "Correct!";
const WRONG_TEXT: &str = "Wrong!";
const CHOOSE_HINT: &str = "Choose an option (1-4 or a-d)";
const NEXT_HINT: &str = "Next question (n)";
const FINISH_HINT: &str = "See results (n)";
const KEYS_HINT: &str = "r: restart, q: quit";
const RESTART_HINT: &str = "Press Enter to play again, q to quit.";

struct TerminalPresenter {
    bank_path: String,
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, session: &QuizSession) {
        let screen = match session.phase() {
            Phase::EmptyBank => empty_screen(&self.bank_path),
            Phase::Quiz => match session.current() {
                Some(question) => question_screen(session, question),
                None => return,
            },
            Phase::Result => result_screen(session),
        };
        println!("\n{}", screen);
    }
}

fn empty_screen(bank_path: &str) -> String {
    format!(
        "The question bank is still loading or has no questions.\n\
         Check that `{}` exists, then press Enter to reload (q to quit).",
        bank_path
    )
}

fn question_screen(session: &QuizSession, question: &SessionQuestion) -> String {
    let mut lines = vec![
        format!(
            "Question {}/{}    score {}",
            session.current_index() + 1,
            session.total(),
            session.score()
        ),
        question.text().to_string(),
    ];
    for (index, option) in question.presented_options.iter().enumerate() {
        let mark = match question.option_status(index) {
            OptionStatus::Neutral => "  ",
            OptionStatus::Pending => "> ",
            OptionStatus::Correct => "✓ ",
            OptionStatus::Wrong => "✗ ",
        };
        lines.push(format!("{}{}. {}", mark, option.label, option.text));
    }
    match question.answered_correctly() {
        Some(true) => lines.push(CORRECT_TEXT.to_string()),
        Some(false) => lines.push(WRONG_TEXT.to_string()),
        None => {}
    }
    let hint = if !question.revealed {
        CHOOSE_HINT
    } else if session.current_index() + 1 < session.total() {
        NEXT_HINT
    } else {
        FINISH_HINT
    };
    lines.push(format!("[{}]  {}", hint, KEYS_HINT));
    lines.join("\n")
}

fn result_screen(session: &QuizSession) -> String {
    let message = session.tier().map(|tier| tier.message()).unwrap_or_default();
    format!(
        "Quiz finished!\nScore: {} / {}\n{}\n{}",
        session.score(),
        session.total(),
        message,
        RESTART_HINT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_presenter::quiz::Question;

    fn session() -> QuizSession {
        let questions = (0..5)
            .map(|i| {
                Question::new(
                    format!("Question {}", i),
                    ["one".into(), "two".into(), "three".into(), "four".into()],
                    "c",
                )
            })
            .collect();
        QuizSession::with_seed(questions, 21)
    }

    #[test]
    fn question_screen_lists_all_options() {
        let session = session();
        let screen = question_screen(&session, session.current().unwrap());
        assert!(screen.starts_with("Question 1/5    score 0"));
        for label in ["A. ", "B. ", "C. ", "D. "] {
            assert!(screen.contains(label));
        }
        assert!(screen.contains(CHOOSE_HINT));
    }

    #[test]
    fn revealed_question_marks_the_answer() {
        let mut session = session();
        let ticket = session.select_option(0).unwrap();
        session.reveal_timer_fires(ticket).unwrap();
        let screen = question_screen(&session, session.current().unwrap());
        assert!(screen.contains("✓ "));
        assert!(screen.contains(NEXT_HINT));
        let question = session.current().unwrap();
        let verdict = if question.is_option_correct(0) { CORRECT_TEXT } else { WRONG_TEXT };
        assert!(screen.lines().any(|line| line == verdict));
    }

    #[test]
    fn unrevealed_question_has_no_verdict() {
        let mut session = session();
        session.select_option(1).unwrap();
        let screen = question_screen(&session, session.current().unwrap());
        assert!(screen.contains("> "));
        assert!(!screen.lines().any(|line| line == CORRECT_TEXT || line == WRONG_TEXT));
    }

    #[test]
    fn result_screen_shows_score_and_message() {
        let mut session = session();
        while session.phase() == Phase::Quiz {
            let ticket = session.select_option(0).unwrap();
            session.reveal_timer_fires(ticket);
            session.advance();
        }
        let screen = result_screen(&session);
        assert!(screen.contains(&format!("Score: {} / 5", session.score())));
        assert!(screen.contains(session.tier().unwrap().message()));
    }

    #[test]
    fn empty_screen_names_the_bank() {
        assert!(empty_screen("data/questions.csv").contains("`data/questions.csv`"));
    }
}
