//! Checks submitted answers against the word they belong to.
//!
//! Both the server and the local guest backend grade answers with these functions.

use crate::types::{Phase, Word};

/// The answer a student is expected to give for `word` in `phase`.
pub fn expected_answer(word: &Word, phase: Phase) -> &str {
    match phase {
        Phase::Recognition => &word.meaning,
        Phase::CuedRecall | Phase::FreeProduction => &word.word,
    }
}

/// Grades an answer given during a battery phase.
///
/// Chosen answers (phases 1 and 2) are trimmed before comparing, typed answers are compared as is.
pub fn is_correct(word: &Word, phase: Phase, answer: &str) -> bool {
    let expected = expected_answer(word, phase);
    if phase.is_typed() {
        equals(answer, expected, word.case_sensitive)
    } else {
        equals(answer.trim(), expected.trim(), word.case_sensitive)
    }
}

/// Grades a typed answer outside of a battery, i.e. in the final round or difficult words practice.
pub fn is_correct_typed(word: &Word, answer: &str) -> bool {
    equals(answer, &word.word, word.case_sensitive)
}

fn equals(left: &str, right: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        left == right
    } else {
        left.to_lowercase() == right.to_lowercase()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn word(case_sensitive: bool) -> Word {
        Word {
            id: 1,
            word: "Brussel".to_string(),
            meaning: "hoofdstad van België".to_string(),
            example_sentence: "We gaan naar *Brussel*.".to_string(),
            case_sensitive,
            module_id: None,
            position_in_module: None,
        }
    }

    #[test]
    fn recognition_checks_meaning() {
        let word = word(false);
        assert!(is_correct(&word, Phase::Recognition, " Hoofdstad van België "));
        assert!(!is_correct(&word, Phase::Recognition, "Brussel"));
    }

    #[test]
    fn cued_recall_checks_word() {
        let word = word(false);
        assert!(is_correct(&word, Phase::CuedRecall, "brussel "));
        assert!(!is_correct(&word, Phase::CuedRecall, "hoofdstad van België"));
    }

    #[test]
    fn typed_answers_are_not_trimmed() {
        let word = word(false);
        assert!(is_correct(&word, Phase::FreeProduction, "brussel"));
        assert!(!is_correct(&word, Phase::FreeProduction, "brussel "));
    }

    #[test]
    fn respects_case_sensitivity() {
        let word = word(true);
        assert!(!is_correct(&word, Phase::FreeProduction, "brussel"));
        assert!(is_correct(&word, Phase::FreeProduction, "Brussel"));
        assert!(!is_correct_typed(&word, "BRUSSEL"));
    }

    #[test]
    fn expected_answer_follows_phase() {
        let word = word(false);
        assert_eq!(expected_answer(&word, Phase::Recognition), "hoofdstad van België");
        assert_eq!(expected_answer(&word, Phase::FreeProduction), "Brussel");
    }
}
