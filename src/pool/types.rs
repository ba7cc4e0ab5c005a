//! Types representing a question pool: subelements containing groups
//! containing questions.

use std::collections::BTreeMap;
use tracing::debug;

/// A single exam question. The five character id encodes where the question
/// belongs: the first two characters name the subelement, the first three
/// the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub subelement: String,
    pub group: String,
    pub question: String,
    pub answers: BTreeMap<char, String>,
    pub correct_answer: char,
    pub reference: Option<String>,
    pub figure: Option<String>,
    pub figure_image: Option<Vec<u8>>,
}

/// A group of questions within a subelement, identified by the subelement id
/// plus one letter. The title is empty when the group was derived from a
/// question id rather than declared by a header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub title: String,
    questions: Vec<usize>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.questions
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions
            .is_empty()
    }
}

/// A top-level exam topic area, identified by exam class letter plus digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subelement {
    pub id: String,
    pub title: String,
    groups: Vec<Group>,
}

impl Subelement {
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }
}

/// The result of parsing one pool document. Owns the subelement tree and the
/// flat list of questions in parse order; groups refer to questions by index
/// into that list. Both orderings preserve document order, sorting by id is
/// left to output assembly.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Pool {
    subelements: Vec<Subelement>,
    questions: Vec<Question>,
}

impl Pool {
    pub fn new() -> Pool {
        Pool {
            subelements: Vec::new(),
            questions: Vec::new(),
        }
    }

    /// Subelements in the order they were discovered.
    pub fn subelements(&self) -> &[Subelement] {
        &self.subelements
    }

    /// The flat question list, in parse order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions belonging to a group, in the order they were adopted.
    pub fn questions_of<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Question> {
        group
            .questions
            .iter()
            .map(|&index| &self.questions[index])
    }

    /// Derive the exam class from the leading letter of the first discovered
    /// subelement id.
    pub fn exam_class(&self) -> Option<&'static str> {
        let subelement = self
            .subelements
            .first()?;
        match subelement
            .id
            .as_bytes()
            .first()?
        {
            b'T' => Some("technician"),
            b'G' => Some("general"),
            b'E' => Some("extra"),
            _ => None,
        }
    }

    /// Record a subelement if it hasn't been seen yet. The first writer
    /// wins; a repeated header never overwrites an existing title.
    pub(crate) fn ensure_subelement(&mut self, id: &str, title: &str) {
        if self
            .subelements
            .iter()
            .any(|subelement| subelement.id == id)
        {
            return;
        }
        self.subelements
            .push(Subelement {
                id: id.to_string(),
                title: title.to_string(),
                groups: Vec::new(),
            });
    }

    /// Record a group under a subelement if it hasn't been seen yet. Does
    /// nothing when the subelement itself is unknown.
    pub(crate) fn ensure_group(&mut self, subelement: &str, id: &str, title: &str) {
        let Some(subelement) = self
            .subelements
            .iter_mut()
            .find(|candidate| candidate.id == subelement)
        else {
            return;
        };
        if subelement
            .groups
            .iter()
            .any(|group| group.id == id)
        {
            return;
        }
        subelement
            .groups
            .push(Group {
                id: id.to_string(),
                title: title.to_string(),
                questions: Vec::new(),
            });
    }

    /// Take ownership of a finished question, appending it to the flat list
    /// and to its owning group. Ids are unique within a pool: a restated
    /// question replaces the earlier version in place. A question whose
    /// group cannot be resolved is dropped.
    pub(crate) fn adopt(&mut self, question: Question) {
        if let Some(existing) = self
            .questions
            .iter_mut()
            .find(|candidate| candidate.id == question.id)
        {
            debug!("Duplicate id {}, keeping the later version", question.id);
            *existing = question;
            return;
        }

        let index = self
            .questions
            .len();
        let target = self
            .subelements
            .iter_mut()
            .find(|subelement| subelement.id == question.subelement)
            .and_then(|subelement| {
                subelement
                    .groups
                    .iter_mut()
                    .find(|group| group.id == question.group)
            });
        match target {
            Some(group) => {
                group
                    .questions
                    .push(index);
                self.questions
                    .push(question);
            }
            None => {
                debug!("No group {} for question {}, dropping", question.group, question.id);
            }
        }
    }

    /// Look up images for every question carrying a figure reference. The
    /// resolver returns None when an asset cannot be found or converted;
    /// such questions simply keep an empty image field.
    pub fn attach_figures<F>(&mut self, resolve: F)
    where
        F: Fn(&str) -> Option<Vec<u8>>,
    {
        for question in self
            .questions
            .iter_mut()
        {
            let Some(figure) = question
                .figure
                .as_deref()
            else {
                continue;
            };
            if let Some(image) = resolve(figure) {
                question.figure_image = Some(image);
            }
        }
    }
}
