use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{info, warn};

use crate::quiz::{KeyMatch, Question};

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("unable to open question bank {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to read question bank: {0}")]
    Csv(#[from] csv::Error),
    #[error("question bank has no questions")]
    Empty,
}

/// One CSV row as it appears on disk. Short rows and missing columns
/// deserialize to `None`, which becomes an empty string.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
struct RawQuestion {
    question: Option<String>,
    #[serde(rename = "optionA")]
    option_a: Option<String>,
    #[serde(rename = "optionB")]
    option_b: Option<String>,
    #[serde(rename = "optionC")]
    option_c: Option<String>,
    #[serde(rename = "optionD")]
    option_d: Option<String>,
    answer: Option<String>,
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        Question::new(
            raw.question.unwrap_or_default(),
            [
                raw.option_a.unwrap_or_default(),
                raw.option_b.unwrap_or_default(),
                raw.option_c.unwrap_or_default(),
                raw.option_d.unwrap_or_default(),
            ],
            &raw.answer.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn open(path: &Path) -> Result<Self, BankError> {
        let file = File::open(path).map_err(|source| BankError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let bank = Self::from_reader(file)?;
        info!(
            "Loaded {} questions from {}",
            bank.questions.len(),
            path.display()
        );
        Ok(bank)
    }

    /// Parses a headed CSV table. Rows that fail to deserialize are skipped;
    /// a table without a single usable row is `BankError::Empty`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BankError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        // a missing header row is as good as an empty bank
        csv_reader.headers()?;

        let mut questions = Vec::new();
        for (row, record) in csv_reader.deserialize::<RawQuestion>().enumerate() {
            match record {
                Ok(raw) => questions.push(Question::from(raw)),
                Err(err) => warn!("Skipping question bank row {}: {}", row + 1, err),
            }
        }

        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        for issue in validate(&questions) {
            warn!("{}", issue);
        }

        return Ok(Self { questions });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankIssue {
    #[error("question {index} ({text:?}) is unanswerable: answer {key:?} matches no letter and no option")]
    Unanswerable {
        index: usize,
        text: String,
        key: String,
    },
    #[error("question {index} ({text:?}) is ambiguous: answer {key:?} matches {matches} options")]
    Ambiguous {
        index: usize,
        text: String,
        key: String,
        matches: usize,
    },
}

/// Data-quality pass over a loaded bank. Findings never stop a session:
/// an unanswerable question is simply never graded correct.
pub fn validate(questions: &[Question]) -> Vec<BankIssue> {
    questions
        .iter()
        .enumerate()
        .filter_map(|(index, question)| {
            let matches: Vec<KeyMatch> = question.correct_key.resolve(&question.options);
            match matches.len() {
                0 => Some(BankIssue::Unanswerable {
                    index,
                    text: question.text.clone(),
                    key: question.correct_key.to_string(),
                }),
                1 => None,
                n => Some(BankIssue::Ambiguous {
                    index,
                    text: question.text.clone(),
                    key: question.correct_key.to_string(),
                    matches: n,
                }),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = "\
question,optionA,optionB,optionC,optionD,answer
Capital of France?,Berlin,Paris,Rome,Madrid, b
Water formula?,CO2,H2O,NaCl,O2,H2O
Largest planet?,Mars,Venus,Jupiter,Mercury,X
";

    #[test]
    fn rows_load_in_input_order() {
        let bank = QuestionBank::from_reader(BANK.as_bytes()).unwrap();
        assert_eq!(bank.questions.len(), 3);
        assert_eq!(bank.questions[0].text, "Capital of France?");
        assert_eq!(bank.questions[0].correct_key.as_str(), "B");
        assert_eq!(bank.questions[1].correct_key.as_str(), "H2O");
        assert_eq!(bank.questions[2].options[2], "Jupiter");
    }

    #[test]
    fn missing_cells_default_to_empty() {
        let csv = "question,optionA,optionB,optionC,optionD,answer\nOnly two?,yes,no\n";
        let bank = QuestionBank::from_reader(csv.as_bytes()).unwrap();
        let q = &bank.questions[0];
        assert_eq!(q.options, ["yes".to_string(), "no".to_string(), String::new(), String::new()]);
        assert_eq!(q.correct_key.as_str(), "");
    }

    #[test]
    fn missing_columns_default_to_empty() {
        let csv = "question,answer\nNo options?,a\n";
        let bank = QuestionBank::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(bank.questions[0].options, <[String; 4]>::default());
        assert_eq!(bank.questions[0].correct_key.as_str(), "A");
    }

    #[test]
    fn empty_table_is_empty_bank() {
        let header_only = "question,optionA,optionB,optionC,optionD,answer\n";
        assert!(matches!(
            QuestionBank::from_reader(header_only.as_bytes()),
            Err(BankError::Empty)
        ));
        assert!(matches!(
            QuestionBank::from_reader("".as_bytes()),
            Err(BankError::Empty)
        ));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let result = QuestionBank::open(Path::new("/definitely/not/here/questions.csv"));
        assert!(matches!(result, Err(BankError::Open { .. })));
    }

    #[test]
    fn validation_flags_unanswerable_questions() {
        let bank = QuestionBank::from_reader(BANK.as_bytes()).unwrap();
        let issues = validate(&bank.questions);
        assert_eq!(
            issues,
            vec![BankIssue::Unanswerable {
                index: 2,
                text: "Largest planet?".to_string(),
                key: "X".to_string(),
            }]
        );
    }

    #[test]
    fn validation_flags_ambiguous_text_answers() {
        let q = Question::new(
            "Pick one".to_string(),
            ["same".into(), "same".into(), "other".into(), "else".into()],
            "same",
        );
        assert!(matches!(
            validate(&[q]).as_slice(),
            [BankIssue::Ambiguous { matches: 2, .. }]
        ));
    }
}
