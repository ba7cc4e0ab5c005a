//! the paragraph-stream parser for question pool documents

use std::collections::BTreeMap;

use crate::pool::{Pool, Question};

macro_rules! regex {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}

/// Classification of a single paragraph. Pool documents carry no markup;
/// structure has to be recovered from the shape of each line, and several
/// shapes compete. classify() tries the rules in priority order and the
/// first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'i> {
    /// "SUBELEMENT T1 - FCC Rules, descriptions and definitions"
    Subelement { id: String, title: &'i str },
    /// "T1A01 (C) [97.1]" with question text possibly following on the
    /// same line
    Question {
        id: String,
        correct: char,
        remainder: &'i str,
    },
    /// "T1A - Purpose and permissible use of the Amateur Radio Service"
    Group { id: String, title: String },
    /// "A. Some answer text"
    Answer { choice: char, text: &'i str },
    /// anything else; question prose when a question is being collected
    Content(&'i str),
}

pub fn classify(line: &str) -> Line<'_> {
    // Subelement headers. The separating dash shows up as a plain hyphen,
    // en dash, or em dash depending on which year's pool the document is,
    // and is sometimes missing altogether.
    if let Some(found) =
        regex!(r"(?i)^\s*SUBELEMENT\s+([TEG]\d)\s*[-–—]?\s*(.+)$").captures(line)
    {
        return Line::Subelement {
            id: found[1].to_uppercase(),
            title: found
                .get(2)
                .unwrap()
                .as_str()
                .trim(),
        };
    }

    // Question id with the correct answer indicator, e.g. "T1A01 (C)".
    // Tested ahead of the group rule so a question id can never be
    // shadowed by it.
    if let Some(found) = regex!(r"(?i)^\s*([TEG]\d[A-Z]\d{2})\s*\(([A-D])\)").captures(line) {
        let end = found
            .get(0)
            .unwrap()
            .end();
        return Line::Question {
            id: found[1].to_uppercase(),
            correct: (found[2].as_bytes()[0] as char).to_ascii_uppercase(),
            remainder: line[end..].trim(),
        };
    }

    // Group headers, e.g. "T1A - Purpose and permissible use". The second
    // capture stands in for a (?!\d) lookahead, which the regex crate does
    // not support: an id followed directly by a digit is an errata line
    // like "G1A04 – question deleted", never a group header.
    if let Some(found) = regex!(r"(?i)^\s*([TEG]\d[A-Z])([^0-9].*)?$").captures(line) {
        let rest = found
            .get(2)
            .map(|m| m.as_str())
            .unwrap_or("");
        let body = regex!(r"^\s*[-–—]?\s*").replace(rest, "");
        if !body.is_empty() {
            // strip a question count suffix like "[4 Exam Questions - 4 Groups]"
            let title = regex!(r"\s*\[.*\]\s*$").replace(&body, "");
            return Line::Group {
                id: found[1].to_uppercase(),
                title: title
                    .trim()
                    .to_string(),
            };
        }
    }

    // Answer choices, e.g. "A. Some answer text" or "D.No space"
    if let Some(found) = regex!(r"^\s*([A-D])\.\s*(.+)$").captures(line) {
        return Line::Answer {
            choice: found[1].as_bytes()[0] as char,
            text: found
                .get(2)
                .unwrap()
                .as_str(),
        };
    }

    Line::Content(line)
}

/// Figure references appear in question text as "Figure T-1", "figure
/// E5-1", "Figure E73" and so on.
pub fn figure_reference(text: &str) -> Option<String> {
    regex!(r"(?i)figure\s+([TEG]\d*-?\d+)")
        .captures(text)
        .map(|found| found[1].to_string())
}

/// Where the parser is within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// before the first subelement header; everything is discarded
    Preamble,
    /// between questions
    Scanning,
    /// after a question id line, before its first answer choice
    CollectingText,
    /// after the first answer choice of the current question
    CollectingAnswers,
}

/// The state carried across paragraphs: the position within the document,
/// the subelement and group context established by the most recent header
/// or question id, the question being accumulated, and the pool built so
/// far. One Parser instance per document; feed it paragraphs in document
/// order with consume() and take the result with finish().
#[derive(Debug)]
pub struct Parser {
    mode: Mode,
    subelement: Option<String>,
    group: Option<String>,
    current: Option<Question>,
    pool: Pool,
}

impl Parser {
    pub fn new() -> Parser {
        Parser {
            mode: Mode::Preamble,
            subelement: None,
            group: None,
            current: None,
            pool: Pool::new(),
        }
    }

    pub fn consume(&mut self, paragraph: &str) {
        let line = paragraph.trim();
        if line.is_empty() {
            return;
        }

        let classified = classify(line);

        // Title pages and errata sheets precede the first subelement
        // header and contain lines of every shape, including ones that
        // look like questions. None of it belongs to the pool.
        if self.mode == Mode::Preamble && !matches!(classified, Line::Subelement { .. }) {
            return;
        }

        match classified {
            Line::Subelement { id, title } => {
                self.finalize();
                self.mode = Mode::Scanning;
                self.pool
                    .ensure_subelement(&id, title);
                self.subelement = Some(id);
            }
            Line::Question {
                id,
                correct,
                remainder,
            } => self.open_question(id, correct, remainder),
            Line::Group { id, title } => {
                // A group header is only believed when it belongs to the
                // subelement we are in; anything else is an errata line or
                // stray prose and falls through to content handling. The
                // question-id derivation in open_question() recovers the
                // structure if a real header was ignored this way.
                if self
                    .subelement
                    .as_deref()
                    .is_some_and(|subelement| id.starts_with(subelement))
                {
                    self.finalize();
                    self.mode = Mode::Scanning;
                    let subelement = self
                        .subelement
                        .clone()
                        .unwrap();
                    self.pool
                        .ensure_group(&subelement, &id, &title);
                    self.group = Some(id);
                } else {
                    self.content(line);
                }
            }
            Line::Answer { choice, text } => {
                if let Some(question) = self
                    .current
                    .as_mut()
                {
                    self.mode = Mode::CollectingAnswers;
                    // a letter seen twice overwrites; last write wins
                    question
                        .answers
                        .insert(choice, text.trim().to_string());
                }
            }
            Line::Content(text) => self.content(text),
        }
    }

    /// Close out any in-progress question and hand back the pool.
    pub fn finish(mut self) -> Pool {
        self.finalize();
        self.pool
    }

    /// The subelement and group context currently in effect. Headers and
    /// question ids both move this; it is exposed so transitions can be
    /// observed from tests.
    pub fn context(&self) -> (Option<&str>, Option<&str>) {
        (
            self.subelement
                .as_deref(),
            self.group
                .as_deref(),
        )
    }

    /// Start a new question from an id line. The subelement and group are
    /// always derived from the id itself, taking precedence over whatever
    /// the headers established; missing entries are created with empty
    /// titles so that structure survives even when header lines were
    /// mangled or absent.
    fn open_question(&mut self, id: String, correct: char, remainder: &str) {
        self.finalize();

        let subelement = id[..2].to_string();
        let group = id[..3].to_string();
        self.pool
            .ensure_subelement(&subelement, "");
        self.pool
            .ensure_group(&subelement, &group, "");

        // A trailing bracketed token is a regulatory citation like [97.1],
        // not question text.
        let mut text = remainder;
        let mut reference = None;
        if let Some(found) = regex!(r"\[(.+?)\]\s*$").captures(text) {
            reference = Some(found[1].to_string());
            text = text[..found
                .get(0)
                .unwrap()
                .start()]
                .trim();
        }

        self.current = Some(Question {
            id,
            subelement: subelement.clone(),
            group: group.clone(),
            question: text.to_string(),
            answers: BTreeMap::new(),
            correct_answer: correct,
            reference,
            figure: None,
            figure_image: None,
        });
        self.subelement = Some(subelement);
        self.group = Some(group);
        self.mode = Mode::CollectingText;
    }

    /// Continuation lines between the question id and the first answer
    /// choice: more question prose, or a figure caption. Anything arriving
    /// outside that window is dropped.
    fn content(&mut self, line: &str) {
        if self.mode != Mode::CollectingText {
            return;
        }
        let Some(question) = self
            .current
            .as_mut()
        else {
            return;
        };

        if question
            .figure
            .is_none()
        {
            question.figure = figure_reference(line);
        }

        if question
            .question
            .is_empty()
        {
            question.question = line.to_string();
        } else {
            question
                .question
                .push(' ');
            question
                .question
                .push_str(line);
        }
    }

    /// Finish the in-progress question, if any, and adopt it into the
    /// pool. The accumulated text is scanned for a figure mention one more
    /// time: a caption arriving as a continuation line was caught there,
    /// but a mention embedded in the id line's own remainder was not.
    fn finalize(&mut self) {
        let Some(mut question) = self
            .current
            .take()
        else {
            return;
        };

        if question
            .figure
            .is_none()
        {
            question.figure = figure_reference(&question.question);
        }

        self.pool
            .adopt(question);
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}
