#[cfg(test)]
mod verify {
    use std::collections::BTreeMap;

    use hampool::parsing::{self, parser::Parser};
    use hampool::pool::Question;

    fn answers(choices: &[(char, &str)]) -> BTreeMap<char, String> {
        choices
            .iter()
            .map(|&(choice, text)| (choice, text.to_string()))
            .collect()
    }

    #[test]
    fn example_from_the_pool() {
        let pool = parsing::parse([
            "SUBELEMENT T1 - FCC Rules",
            "T1A - Purpose",
            "T1A01 (C) [97.1]",
            "What is...?",
            "A. Choice1",
            "B. Choice2",
            "C. Choice3",
            "D. Choice4",
        ]);

        assert_eq!(
            pool.subelements()
                .len(),
            1
        );
        let subelement = &pool.subelements()[0];
        assert_eq!(subelement.id, "T1");
        assert_eq!(subelement.title, "FCC Rules");

        let group = &subelement.groups()[0];
        assert_eq!(group.id, "T1A");
        assert_eq!(group.title, "Purpose");

        assert_eq!(
            pool.questions(),
            &[Question {
                id: "T1A01".to_string(),
                subelement: "T1".to_string(),
                group: "T1A".to_string(),
                question: "What is...?".to_string(),
                answers: answers(&[
                    ('A', "Choice1"),
                    ('B', "Choice2"),
                    ('C', "Choice3"),
                    ('D', "Choice4")
                ]),
                correct_answer: 'C',
                reference: Some("97.1".to_string()),
                figure: None,
                figure_image: None,
            }]
        );
    }

    #[test]
    fn preamble_is_discarded() {
        let pool = parsing::parse([
            "2022-2026 Technician Class Question Pool",
            "Errata as of February 2023:",
            "T8B09 corrected to read as follows",
            "A. This looks like an answer but belongs to the errata sheet",
            "SUBELEMENT T1 - FCC Rules",
            "T1A01 (C) What is...?",
            "A. Choice1",
        ]);

        assert_eq!(
            pool.questions()
                .len(),
            1
        );
        assert_eq!(pool.questions()[0].id, "T1A01");
        assert_eq!(
            pool.questions()[0]
                .answers
                .len(),
            1
        );
    }

    #[test]
    fn structure_recovered_from_question_ids() {
        // No T5 header and no T5B header anywhere, yet the question lands
        // nested correctly, in entries created with empty titles.
        let pool = parsing::parse([
            "SUBELEMENT T1 - FCC Rules",
            "T5B03 (A) How many volts?",
            "A. Twelve",
            "B. Ten",
        ]);

        let subelement = pool
            .subelements()
            .iter()
            .find(|subelement| subelement.id == "T5")
            .unwrap();
        assert_eq!(subelement.title, "");

        let group = &subelement.groups()[0];
        assert_eq!(group.id, "T5B");
        assert_eq!(group.title, "");

        let question = &pool.questions()[0];
        assert_eq!(question.id, "T5B03");
        assert_eq!(question.subelement, "T5");
        assert_eq!(question.group, "T5B");
    }

    #[test]
    fn question_ids_override_header_context() {
        let mut input = Parser::new();
        input.consume("SUBELEMENT T1 - FCC Rules");
        assert_eq!(input.context(), (Some("T1"), None));

        input.consume("T1A - Purpose");
        assert_eq!(input.context(), (Some("T1"), Some("T1A")));

        input.consume("G2B05 (B) On which bands?");
        assert_eq!(input.context(), (Some("G2"), Some("G2B")));

        let pool = input.finish();
        assert_eq!(pool.questions()[0].group, "G2B");
    }

    #[test]
    fn errata_never_becomes_a_group() {
        let pool = parsing::parse([
            "SUBELEMENT G1 - Commission's Rules",
            "G1A - General class frequencies",
            "G1A04 – question deleted",
            "G1A05 (C) Which band?",
            "A. 60 meters",
        ]);

        let subelement = &pool.subelements()[0];
        assert_eq!(
            subelement
                .groups()
                .len(),
            1
        );
        assert_eq!(subelement.groups()[0].id, "G1A");

        // the deleted question left no trace
        assert_eq!(
            pool.questions()
                .len(),
            1
        );
        assert_eq!(pool.questions()[0].id, "G1A05");
    }

    #[test]
    fn foreign_group_header_is_question_text() {
        // While question text is being collected, a group-shaped line for
        // some other subelement is not structure; it joins the prose.
        let pool = parsing::parse([
            "SUBELEMENT T1 - FCC Rules",
            "T1A01 (C) What is",
            "E5A special about this line?",
            "A. Nothing",
        ]);

        assert_eq!(
            pool.questions()[0].question,
            "What is E5A special about this line?"
        );
        assert_eq!(
            pool.subelements()
                .len(),
            1
        );
    }

    #[test]
    fn figure_found_on_caption_line() {
        let pool = parsing::parse([
            "SUBELEMENT T7 - Station equipment",
            "T7D09 (B)",
            "Refer to Figure T-1 for the following question",
            "What is component 3?",
            "A. A resistor",
        ]);

        let question = &pool.questions()[0];
        assert_eq!(question.figure, Some("T-1".to_string()));
        assert_eq!(
            question.question,
            "Refer to Figure T-1 for the following question What is component 3?"
        );
    }

    #[test]
    fn figure_found_at_finalize() {
        // The mention sits in the id line's own remainder, which the
        // continuation-line scan never sees; the rescan when the question
        // is finished picks it up.
        let pool = parsing::parse([
            "SUBELEMENT E6 - Circuit components",
            "E6X01 (A) In Figure E6-3, what is the schematic symbol?",
            "A. A transistor",
        ]);

        assert_eq!(
            pool.questions()[0].figure,
            Some("E6-3".to_string())
        );
    }

    #[test]
    fn duplicate_answer_letters_overwrite() {
        let pool = parsing::parse([
            "SUBELEMENT T1 - FCC Rules",
            "T1A01 (C) What is...?",
            "A. First version",
            "A. Second version",
            "B. Something else",
        ]);

        assert_eq!(
            pool.questions()[0].answers,
            answers(&[('A', "Second version"), ('B', "Something else")])
        );
    }

    #[test]
    fn reference_stripped_from_question_text() {
        let pool = parsing::parse([
            "SUBELEMENT T1 - FCC Rules",
            "T1A03 (D) What part governs this? [97.3(a)(23)]",
            "A. Part 97",
        ]);

        let question = &pool.questions()[0];
        assert_eq!(question.reference, Some("97.3(a)(23)".to_string()));
        assert_eq!(question.question, "What part governs this?");
    }

    #[test]
    fn last_question_is_flushed() {
        let pool = parsing::parse([
            "SUBELEMENT T1 - FCC Rules",
            "T1A01 (C) What is...?",
            "A. Choice1",
            "B. Choice2",
        ]);

        assert_eq!(
            pool.questions()
                .len(),
            1
        );
    }

    #[test]
    fn prose_after_answers_is_dropped() {
        let pool = parsing::parse([
            "SUBELEMENT T1 - FCC Rules",
            "T1A01 (C) What is...?",
            "A. Choice1",
            "This trailing note is not part of any answer",
            "T1A02 (B) Another?",
            "A. Choice1",
        ]);

        assert_eq!(pool.questions()[0].question, "What is...?");
        assert_eq!(
            pool.questions()
                .len(),
            2
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let paragraphs = [
            "SUBELEMENT T1 - FCC Rules",
            "T1A - Purpose",
            "T1A01 (C) [97.1]",
            "What is...?",
            "A. Choice1",
            "B. Choice2",
        ];

        let first = parsing::parse(paragraphs);
        let second = parsing::parse(paragraphs);
        assert_eq!(first, second);

        let first = hampool::output::render(&hampool::output::assemble(&first, None, None), true);
        let second = hampool::output::render(&hampool::output::assemble(&second, None, None), true);
        assert_eq!(first, second);
    }
}
