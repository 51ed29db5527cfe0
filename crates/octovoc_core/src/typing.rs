//! Decides whether a free-text answer should be submitted while the student is still typing.
//!
//! The matcher runs on every input change, so it stays a cheap pure function.

/// Minimum number of characters before a wrong answer may be submitted.
pub const MIN_INPUT_LEN: usize = 3;

/// Number of mistakes at which a full-length answer is rejected.
pub const MISTAKE_THRESHOLD: usize = 3;

/// What to do with the current input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decision {
    pub correct: bool,
    pub submit: bool,
}

impl Decision {
    const WAIT: Self = Self {
        correct: false,
        submit: false,
    };
    const ACCEPT: Self = Self {
        correct: true,
        submit: true,
    };
    const REJECT: Self = Self {
        correct: false,
        submit: true,
    };
}

/// Evaluates `input` against `target`.
///
/// An exact match (ignoring case unless `case_sensitive`) is submitted as correct right away.
/// Otherwise the input is submitted as wrong only once it is at least as long as the target and
/// carries [`MISTAKE_THRESHOLD`] or more mistakes, see [`count_mistakes`].
pub fn should_submit(input: &str, target: &str, case_sensitive: bool) -> Decision {
    let (input, target) = if case_sensitive {
        (input.to_string(), target.to_string())
    } else {
        (input.to_lowercase(), target.to_lowercase())
    };

    if input == target {
        return Decision::ACCEPT;
    }

    let input_len = input.chars().count();
    if input_len < MIN_INPUT_LEN {
        return Decision::WAIT;
    }

    let target_len = target.chars().count();
    let mistakes = count_mistakes(&input, &target);
    if mistakes >= MISTAKE_THRESHOLD && input_len >= target_len {
        Decision::REJECT
    } else {
        Decision::WAIT
    }
}

/// Counts the positions where the two strings differ over their shared length, plus the
/// difference in length.
///
/// A length difference is counted on top of the positional mismatches, so a missing or extra
/// trailing character weighs in even though no shared position covers it.
pub fn count_mistakes(input: &str, target: &str) -> usize {
    let mismatches = input
        .chars()
        .zip(target.chars())
        .filter(|(i, t)| i != t)
        .count();
    let input_len = input.chars().count();
    let target_len = target.chars().count();
    mismatches + input_len.abs_diff(target_len)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exact_match_submits_as_correct() {
        let decision = should_submit("kat", "kat", false);
        assert_eq!(
            decision,
            Decision {
                correct: true,
                submit: true
            }
        );
    }

    #[test]
    fn short_input_waits() {
        assert!(!should_submit("k", "kat", false).submit);
        assert!(!should_submit("ka", "kat", false).submit);
        assert!(!should_submit("xy", "kat", false).submit);
    }

    #[test]
    fn three_mismatches_reject() {
        let decision = should_submit("xyz", "kat", false);
        assert_eq!(
            decision,
            Decision {
                correct: false,
                submit: true
            }
        );
    }

    #[test]
    fn case_insensitive_by_default() {
        assert_eq!(
            should_submit("KAT", "kat", false),
            Decision {
                correct: true,
                submit: true
            }
        );
    }

    #[test]
    fn case_sensitive_counts_case_as_mistakes() {
        let decision = should_submit("KAT", "kat", true);
        assert_eq!(count_mistakes("KAT", "kat"), 3);
        assert_eq!(
            decision,
            Decision {
                correct: false,
                submit: true
            }
        );

        // a single differing letter is not enough to give up on the answer
        let decision = should_submit("Kat", "kat", true);
        assert!(!decision.submit);
    }

    #[test]
    fn tolerates_typos_in_progress() {
        let decision = should_submit("ambivalen", "ambivalent", false);
        assert_eq!(count_mistakes("ambivalen", "ambivalent"), 1);
        assert!(!decision.submit);

        let decision = should_submit("ambivalent", "ambivalent", false);
        assert!(decision.submit);
        assert!(decision.correct);
    }

    #[test]
    fn does_not_reject_before_full_length() {
        // plenty of mistakes, but the student is still typing
        let decision = should_submit("xyzxy", "ambivalent", false);
        assert!(!decision.submit);
    }

    #[test]
    fn length_difference_counts_twice_over_a_shifted_word() {
        // shared positions: k=k, a=a, a!=t, plus one for the extra character
        assert_eq!(count_mistakes("kaat", "kat"), 2);
        assert!(!should_submit("kaat", "kat", false).submit);

        // one extra character after two wrong ones reaches the threshold
        assert_eq!(count_mistakes("kxyt", "kat"), 3);
        assert_eq!(
            should_submit("kxyt", "kat", false),
            Decision {
                correct: false,
                submit: true
            }
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(count_mistakes("café", "cafe"), 1);
        assert!(!should_submit("café", "cafe", false).submit);
        assert!(should_submit("CAFÉ", "café", false).correct);
    }

    #[test]
    fn is_deterministic() {
        let inputs = [("kat", "kat"), ("xyz", "kat"), ("ka", "kat"), ("Kat", "kat")];
        for (input, target) in inputs {
            for case_sensitive in [false, true] {
                assert_eq!(
                    should_submit(input, target, case_sensitive),
                    should_submit(input, target, case_sensitive)
                );
            }
        }
    }
}
