use crate::config::EligibilityConfig;
use std::fmt;

/// Raw answer to the willingness question.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Eligibility {
    Answered(String),
    #[default]
    Missing,
}

impl From<Option<&str>> for Eligibility {
    fn from(answer: Option<&str>) -> Self {
        match answer.map(str::trim) {
            Some(text) if !text.is_empty() => Eligibility::Answered(text.to_owned()),
            _ => Eligibility::Missing,
        }
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Eligibility::Answered(text) => write!(f, "{text}"),
            Eligibility::Missing => write!(f, "<no answer>"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Bucket {
    Strict,
    CanDo,
    Never,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Strict, Bucket::CanDo, Bucket::Never];

    /// NEVER students are excluded from restricted projects.
    pub fn may_take_restricted(self) -> bool {
        self != Bucket::Never
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Bucket::Strict => "STRICT",
            Bucket::CanDo => "CAN_DO",
            Bucket::Never => "NEVER",
        })
    }
}

/// Maps answers to buckets. STRICT signals are looked for before CAN_DO
/// signals, and an answer matching neither falls into NEVER.
#[derive(Clone, Debug)]
pub struct Classifier {
    strict: Vec<String>,
    can_do: Vec<String>,
}

impl Classifier {
    pub fn new<S: AsRef<str>>(strict: &[S], can_do: &[S]) -> Classifier {
        fn signals<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
            raw.iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        }
        Classifier {
            strict: signals(strict),
            can_do: signals(can_do),
        }
    }

    pub fn from_config(config: &EligibilityConfig) -> Classifier {
        Classifier::new(config.strict.as_slice(), config.can_do.as_slice())
    }

    pub fn classify(&self, answer: &Eligibility) -> Bucket {
        let Eligibility::Answered(text) = answer else {
            return Bucket::Never;
        };
        let text = text.to_lowercase();
        let matches = |signals: &[String]| signals.iter().any(|s| text.contains(s.as_str()));
        if matches(&self.strict) {
            Bucket::Strict
        } else if matches(&self.can_do) {
            Bucket::CanDo
        } else {
            Bucket::Never
        }
    }
}

impl Default for Classifier {
    fn default() -> Classifier {
        Classifier::from_config(&EligibilityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered(text: &str) -> Eligibility {
        Eligibility::from(Some(text))
    }

    #[test]
    fn test_survey_answers() {
        let c = Classifier::default();
        assert_eq!(c.classify(&answered("Yes, I would strictly prefer it")), Bucket::Strict);
        assert_eq!(c.classify(&answered("I can do it if unavoidable")), Bucket::CanDo);
        assert_eq!(c.classify(&answered("Never, please.")), Bucket::Never);
    }

    #[test]
    fn test_strict_takes_precedence() {
        let c = Classifier::default();
        let both = answered("I strictly prefer it, but it is unavoidable anyway");
        assert_eq!(c.classify(&both), Bucket::Strict);
    }

    #[test]
    fn test_missing_and_blank_answers_are_never() {
        let c = Classifier::default();
        assert_eq!(answered(""), Eligibility::Missing);
        assert_eq!(answered("   "), Eligibility::Missing);
        assert_eq!(c.classify(&Eligibility::Missing), Bucket::Never);
        assert_eq!(c.classify(&answered("maybe?")), Bucket::Never);
    }

    #[test]
    fn test_case_insensitive_signals() {
        let c = Classifier::new(&["Strictly Prefer"], &["UNAVOIDABLE"]);
        assert_eq!(c.classify(&answered("i STRICTLY prefer it")), Bucket::Strict);
        assert_eq!(c.classify(&answered("If Unavoidable")), Bucket::CanDo);
    }

    #[test]
    fn test_empty_signals_match_nothing() {
        let c = Classifier::new(&[""], &["  "]);
        assert_eq!(c.classify(&answered("anything")), Bucket::Never);
    }

    #[test]
    fn test_classification_is_stable() {
        let c = Classifier::default();
        let answer = answered("I can do it if unavoidable");
        let before = answer.clone();
        assert_eq!(c.classify(&answer), c.classify(&answer));
        assert_eq!(answer, before);
    }
}
