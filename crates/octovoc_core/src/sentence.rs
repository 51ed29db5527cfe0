//! Rendering of example sentences.
//!
//! Every example sentence marks the word being practised with single asterisks,
//! e.g. `Ze *liepen* naar huis.` Depending on the phase the marked term is underlined
//! or replaced by a blank.

use crate::types::Phase;
use std::fmt;

/// The placeholder shown instead of the marked term.
pub const BLANK: &str = "_________";

/// An example sentence split around its marked term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkedSentence<'a> {
    pub before: &'a str,
    /// The term as it appears in the sentence, possibly inflected.
    pub term: &'a str,
    pub after: &'a str,
}

impl<'a> MarkedSentence<'a> {
    /// Finds the first `*term*` span with a non-empty term.
    pub fn parse(sentence: &'a str) -> Option<Self> {
        for (open, _) in sentence.match_indices('*') {
            let term_start = open + 1;
            let Some(len) = sentence[term_start..].find('*') else {
                // no closing marker anywhere after this one
                return None;
            };
            if len == 0 {
                // "**", try again from the second asterisk
                continue;
            }
            let term_end = term_start + len;
            return Some(Self {
                before: &sentence[..open],
                term: &sentence[term_start..term_end],
                after: &sentence[term_end + 1..],
            });
        }
        None
    }
}

/// How the marked term is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Underline,
    Blank,
}

impl Presentation {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Recognition => Self::Underline,
            Phase::CuedRecall | Phase::FreeProduction => Self::Blank,
        }
    }
}

/// A sentence ready to be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceView {
    /// The sentence had no usable marker and is shown as is.
    Plain(String),
    Underlined {
        before: String,
        term: String,
        after: String,
    },
    Blanked {
        before: String,
        /// The blank followed by the detected inflection suffix, if any.
        blank: String,
        after: String,
    },
}

impl SentenceView {
    /// Renders `sentence` for the given dictionary form of the word.
    pub fn render(sentence: &str, dictionary_form: &str, presentation: Presentation) -> Self {
        let Some(marked) = MarkedSentence::parse(sentence) else {
            return Self::Plain(sentence.to_string());
        };
        match presentation {
            Presentation::Underline => Self::Underlined {
                before: marked.before.to_string(),
                term: marked.term.to_string(),
                after: marked.after.to_string(),
            },
            Presentation::Blank => {
                let suffix = inflection_suffix(dictionary_form, marked.term);
                Self::Blanked {
                    before: marked.before.to_string(),
                    blank: format!("{BLANK}{suffix}"),
                    after: marked.after.to_string(),
                }
            }
        }
    }

    /// HTML for the sentence, the underlined term wrapped in `<span class="underline">`.
    pub fn to_html(&self) -> String {
        match self {
            Self::Plain(sentence) => escape_html(sentence),
            Self::Underlined {
                before,
                term,
                after,
            } => format!(
                r#"{}<span class="underline">{}</span>{}"#,
                escape_html(before),
                escape_html(term),
                escape_html(after)
            ),
            Self::Blanked {
                before,
                blank,
                after,
            } => format!(
                "{}{}{}",
                escape_html(before),
                escape_html(blank),
                escape_html(after)
            ),
        }
    }
}

impl fmt::Display for SentenceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(sentence) => write!(f, "{sentence}"),
            Self::Underlined {
                before,
                term,
                after,
            } => write!(f, "{before}{term}{after}"),
            Self::Blanked {
                before,
                blank,
                after,
            } => write!(f, "{before}{blank}{after}"),
        }
    }
}

/// Guesses the inflection suffix of `inflected` relative to `dictionary_form`.
///
/// The stem is the longest common prefix of both forms, compared case-insensitively. It has to
/// cover the whole dictionary form except for at most its last two characters
/// (`study` -> `studies`, `make` -> `making`), otherwise the forms are considered unrelated
/// (`lopen` -> `liep`) and no suffix is given.
pub fn inflection_suffix<'a>(dictionary_form: &str, inflected: &'a str) -> &'a str {
    let dictionary_len = dictionary_form.chars().count();
    let mut stem_len = 0;
    let mut stem_bytes = 0;
    for (d, i) in dictionary_form.chars().zip(inflected.chars()) {
        if !d.to_lowercase().eq(i.to_lowercase()) {
            break;
        }
        stem_len += 1;
        stem_bytes += i.len_utf8();
    }

    if stem_len == 0 || stem_len + 2 < dictionary_len {
        return "";
    }
    &inflected[stem_bytes..]
}

/// Removes the asterisk markers, for listing a sentence without any emphasis.
pub fn strip_markers(sentence: &str) -> String {
    sentence.replace('*', "")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}
