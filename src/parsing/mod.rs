//! parser for question pool paragraph streams

use tracing::debug;

use crate::pool::Pool;

pub mod parser;

/// Run the paragraph parser over an ordered sequence of paragraph texts, as
/// extracted from the pool document. Malformed content never fails the
/// parse; unrecognizable lines are skipped and missing headers are rebuilt
/// from question ids.
pub fn parse<I, S>(paragraphs: I) -> Pool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut input = parser::Parser::new();
    for paragraph in paragraphs {
        input.consume(paragraph.as_ref());
    }
    let pool = input.finish();

    let questions = pool
        .questions()
        .len();
    let subelements = pool
        .subelements()
        .len();
    debug!(
        "Found {} question{} in {} subelement{}",
        questions,
        if questions == 1 { "" } else { "s" },
        subelements,
        if subelements == 1 { "" } else { "s" }
    );

    pool
}
