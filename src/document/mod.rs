//! Extraction of paragraph text from .docx pool documents

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.problem, self.details)
    }
}

/// Open a .docx file and return its paragraphs as plain text, in document
/// order. A .docx is a zip archive; the document body lives in
/// word/document.xml with one <w:p> element per paragraph and the actual
/// text inside <w:t> runs. We pass ownership of the paragraph texts back to
/// the caller so the parse can borrow from them freely.
pub fn load(filename: &Path) -> Result<Vec<String>, LoadingError<'_>> {
    let file = match File::open(filename) {
        Ok(file) => file,
        Err(error) => {
            debug!(?error);
            return match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            };
        }
    };

    let mut archive = zip::ZipArchive::new(file).map_err(|error| LoadingError {
        problem: "Not a .docx file".to_string(),
        details: error.to_string(),
        filename,
    })?;

    let mut content = Vec::new();
    archive
        .by_name("word/document.xml")
        .map_err(|error| LoadingError {
            problem: "No document body in archive".to_string(),
            details: error.to_string(),
            filename,
        })?
        .read_to_end(&mut content)
        .map_err(|error| LoadingError {
            problem: "Failed reading document body".to_string(),
            details: error.to_string(),
            filename,
        })?;

    extract(&content).map_err(|details| LoadingError {
        problem: "Malformed document body".to_string(),
        details,
        filename,
    })
}

/// Stream the document body XML and accumulate the text runs of each
/// paragraph. Tabs and breaks inside a paragraph become whitespace; empty
/// paragraphs are emitted as empty strings and skipped later by the parser.
pub fn extract(xml: &[u8]) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_reader(xml);

    let mut paragraphs = Vec::new();
    let mut paragraph = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => match element
                .local_name()
                .as_ref()
            {
                b"p" => {
                    in_paragraph = true;
                    paragraph.clear();
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(element)) => match element
                .local_name()
                .as_ref()
            {
                b"p" => paragraphs.push(String::new()),
                b"tab" if in_paragraph => paragraph.push('\t'),
                b"br" | b"cr" if in_paragraph => paragraph.push(' '),
                _ => {}
            },
            Ok(Event::Text(text)) if in_text => {
                let text = text
                    .unescape()
                    .map_err(|error| error.to_string())?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(element)) => match element
                .local_name()
                .as_ref()
            {
                b"p" => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut paragraph));
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(error) => return Err(error.to_string()),
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn paragraphs_in_document_order() {
        let xml = br#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>SUBELEMENT T1 - FCC Rules</w:t></w:r></w:p>
                <w:p><w:r><w:t>T1A01 (C) [97.1]</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;

        let paragraphs = extract(xml).unwrap();
        assert_eq!(
            paragraphs,
            vec!["SUBELEMENT T1 - FCC Rules", "T1A01 (C) [97.1]"]
        );
    }

    #[test]
    fn runs_merge_within_a_paragraph() {
        // Word splits a paragraph into multiple runs whenever formatting
        // changes; the text must come back out joined.
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:p>
              <w:r><w:t>What is the </w:t></w:r>
              <w:r><w:t>purpose?</w:t></w:r>
            </w:p>
          </w:document>"#;

        let paragraphs = extract(xml).unwrap();
        assert_eq!(paragraphs, vec!["What is the purpose?"]);
    }

    #[test]
    fn tabs_and_empty_paragraphs() {
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:p><w:r><w:t>A.</w:t><w:tab/><w:t>First choice</w:t></w:r></w:p>
            <w:p/>
            <w:p><w:r><w:t>B. Second choice</w:t></w:r></w:p>
          </w:document>"#;

        let paragraphs = extract(xml).unwrap();
        assert_eq!(
            paragraphs,
            vec!["A.\tFirst choice", "", "B. Second choice"]
        );
    }
}
