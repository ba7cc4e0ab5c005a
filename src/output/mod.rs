//! JSON output for parsed question pools

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::pool::{Group, Pool, Question, Subelement};

/// The serialized form of a parsed pool. Subelements, groups, and questions
/// are each sorted by id here; this is a presentation ordering only, the
/// Pool itself stays in document order.
#[derive(Debug, Serialize)]
pub struct PoolDocument {
    exam_class: Option<String>,
    pool_year: Option<String>,
    subelements: Vec<SubelementDocument>,
}

#[derive(Debug, Serialize)]
struct SubelementDocument {
    id: String,
    title: String,
    groups: Vec<GroupDocument>,
}

#[derive(Debug, Serialize)]
struct GroupDocument {
    id: String,
    title: String,
    questions: Vec<QuestionDocument>,
}

#[derive(Debug, Serialize)]
struct QuestionDocument {
    id: String,
    question: String,
    answers: BTreeMap<String, String>,
    correct_answer: char,
    figure: Option<String>,
    figure_image_base64: Option<String>,
}

/// Arrange a pool into its output form. The exam class falls back to the
/// one detected from the pool itself when the caller does not supply one;
/// the pool year is pass-through.
pub fn assemble(
    pool: &Pool,
    exam_class: Option<String>,
    pool_year: Option<String>,
) -> PoolDocument {
    let mut subelements = pool
        .subelements()
        .iter()
        .map(|subelement| assemble_subelement(pool, subelement))
        .collect::<Vec<_>>();
    subelements.sort_by(|a, b| {
        a.id
            .cmp(&b.id)
    });

    PoolDocument {
        exam_class: exam_class.or_else(|| {
            pool.exam_class()
                .map(String::from)
        }),
        pool_year,
        subelements,
    }
}

fn assemble_subelement(pool: &Pool, subelement: &Subelement) -> SubelementDocument {
    let mut groups = subelement
        .groups()
        .iter()
        .map(|group| assemble_group(pool, group))
        .collect::<Vec<_>>();
    groups.sort_by(|a, b| {
        a.id
            .cmp(&b.id)
    });

    SubelementDocument {
        id: subelement
            .id
            .clone(),
        title: subelement
            .title
            .clone(),
        groups,
    }
}

fn assemble_group(pool: &Pool, group: &Group) -> GroupDocument {
    let mut questions = pool
        .questions_of(group)
        .map(assemble_question)
        .collect::<Vec<_>>();
    questions.sort_by(|a, b| {
        a.id
            .cmp(&b.id)
    });

    GroupDocument {
        id: group
            .id
            .clone(),
        title: group
            .title
            .clone(),
        questions,
    }
}

fn assemble_question(question: &Question) -> QuestionDocument {
    QuestionDocument {
        id: question
            .id
            .clone(),
        question: question
            .question
            .clone(),
        answers: question
            .answers
            .iter()
            .map(|(choice, text)| (choice.to_string(), text.clone()))
            .collect(),
        correct_answer: question.correct_answer,
        figure: question
            .figure
            .clone(),
        figure_image_base64: question
            .figure_image
            .as_deref()
            .map(|image| STANDARD.encode(image)),
    }
}

/// Serialize the document to JSON text. These types cannot fail to
/// serialize, so the panic branch is unreachable in practice.
pub fn render(document: &PoolDocument, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    };
    result.expect("Serializing a question pool")
}

/// Write the rendered JSON to the given file, or to standard output when no
/// target is supplied.
pub fn write(document: &PoolDocument, target: Option<&Path>, pretty: bool) -> std::io::Result<()> {
    let json = render(document, pretty);
    match target {
        Some(target) => std::fs::write(target, json),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(json.as_bytes())?;
            handle.write_all(b"\n")
        }
    }
}
