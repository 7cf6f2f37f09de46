//! Question-bank loading from delimited text.
//!
//! The bank file is tabular text with a header row naming the columns
//! `id` (or `no`), `category`, `answer` (or `correctanswer`), `question`
//! and optionally `description`. Tab- and comma-delimited files are both
//! accepted; fields may be double-quoted. Localized answer glyphs are
//! mapped to the core alphabet here so the engine never sees them.

use std::fmt;
use std::fs;
use std::path::Path;

use quiz_core::model::{AnswerChoice, Category, Question, QuestionBank, QuestionId};

#[derive(Debug)]
pub enum BankError {
    Io(std::io::Error),
    MissingHeader,
    MissingColumn(&'static str),
    BadRow { line: usize, message: String },
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankError::Io(err) => write!(f, "cannot read bank file: {err}"),
            BankError::MissingHeader => write!(f, "bank file has no header row"),
            BankError::MissingColumn(name) => {
                write!(f, "bank file header is missing the {name} column")
            }
            BankError::BadRow { line, message } => write!(f, "bank file line {line}: {message}"),
        }
    }
}

impl std::error::Error for BankError {}

impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        BankError::Io(err)
    }
}

/// Load and parse a question bank file.
pub fn load_bank(path: &Path) -> Result<QuestionBank, BankError> {
    let text = fs::read_to_string(path)?;
    parse_bank(&text)
}

/// Parse delimited bank text into a `QuestionBank`.
pub fn parse_bank(text: &str) -> Result<QuestionBank, BankError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Err(BankError::MissingHeader);
    };
    let delimiter = if header_line.contains('\t') { '\t' } else { ',' };
    let columns = resolve_columns(&split_line(header_line, delimiter))?;

    let mut questions = Vec::new();
    for (index, line) in lines {
        let line_no = index + 1;
        let fields = split_line(line, delimiter);
        questions.push(parse_row(&fields, &columns, line_no)?);
    }

    Ok(QuestionBank::new(questions))
}

struct Columns {
    id: usize,
    category: usize,
    answer: usize,
    question: usize,
    description: Option<usize>,
}

fn resolve_columns(header: &[String]) -> Result<Columns, BankError> {
    let find = |names: &[&str]| {
        header
            .iter()
            .position(|cell| names.contains(&cell.trim().to_ascii_lowercase().as_str()))
    };

    Ok(Columns {
        id: find(&["id", "no"]).ok_or(BankError::MissingColumn("id"))?,
        category: find(&["category"]).ok_or(BankError::MissingColumn("category"))?,
        answer: find(&["answer", "correctanswer"]).ok_or(BankError::MissingColumn("answer"))?,
        question: find(&["question"]).ok_or(BankError::MissingColumn("question"))?,
        description: find(&["description", "explanation"]),
    })
}

fn parse_row(fields: &[String], columns: &Columns, line_no: usize) -> Result<Question, BankError> {
    let cell = |index: usize, name: &str| {
        fields.get(index).map(String::as_str).ok_or_else(|| BankError::BadRow {
            line: line_no,
            message: format!("missing {name} field"),
        })
    };

    let id: QuestionId = cell(columns.id, "id")?
        .parse()
        .map_err(|_| BankError::BadRow {
            line: line_no,
            message: format!("invalid id {:?}", fields[columns.id]),
        })?;
    let category = Category::new(cell(columns.category, "category")?).map_err(|err| {
        BankError::BadRow {
            line: line_no,
            message: err.to_string(),
        }
    })?;
    let answer = parse_answer(cell(columns.answer, "answer")?).ok_or_else(|| BankError::BadRow {
        line: line_no,
        message: format!("invalid answer {:?}", fields[columns.answer]),
    })?;
    let description = columns
        .description
        .and_then(|index| fields.get(index))
        .map(|text| text.to_string());

    Question::new(id, category, cell(columns.question, "question")?, answer, description)
        .map_err(|err| BankError::BadRow {
            line: line_no,
            message: err.to_string(),
        })
}

/// Map an answer cell to the core alphabet, accepting the localized glyphs
/// the bank data is authored with.
fn parse_answer(raw: &str) -> Option<AnswerChoice> {
    if let Ok(answer) = raw.parse::<AnswerChoice>() {
        return Some(answer);
    }
    match raw.trim() {
        "正" | "○" | "◯" | "o" | "O" => Some(AnswerChoice::True),
        "誤" | "×" | "x" | "X" => Some(AnswerChoice::False),
        _ => None,
    }
}

/// Split one line on the delimiter, honoring double-quoted fields.
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' && field.is_empty() {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }
    fields.push(field);
    fields
}
