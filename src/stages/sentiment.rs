// src/stages/sentiment.rs
//
// Optional sentiment capability. Informational only: nothing downstream reads
// it for scoring or suspicion.

use rayon::prelude::*;

use crate::core::sanitize::fold;
use crate::error::StageError;
use crate::record::{ProductRecord, Sentiment, SentimentLabel};

pub trait SentimentModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Label plus a confidence in [0, 1] for one piece of text.
    fn score(&self, text: &str) -> Result<Sentiment, StageError>;
}

/// Default model: every title is neutral.
pub struct NeutralSentiment;

impl SentimentModel for NeutralSentiment {
    fn name(&self) -> &'static str { "none" }

    fn score(&self, _text: &str) -> Result<Sentiment, StageError> {
        Ok(Sentiment::NEUTRAL)
    }
}

/// Keyword-count model over folded titles. A keyword matches at a word start.
pub struct KeywordSentiment {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Default for KeywordSentiment {
    fn default() -> Self {
        let list = |xs: &[&str]| xs.iter().map(|x| fold(x)).collect::<Vec<_>>();
        Self {
            positive: list(&[
                "excellent", "parfait", "super", "top", "meilleur", "qualité", "rapide",
                "performant", "puissant", "fiable", "recommande", "génial", "incroyable",
                "fantastique", "premium", "pro", "nouveau", "récent", "moderne", "haute", "grand",
            ]),
            negative: list(&[
                "lent", "mauvais", "défectueux", "problème", "cassé", "décevant", "faible",
                "médiocre", "ancien", "obsolète", "bug", "erreur", "panne", "défaut", "occasion",
            ]),
        }
    }
}

impl KeywordSentiment {
    pub fn new(positive: Vec<String>, negative: Vec<String>) -> Self {
        Self {
            positive: positive.iter().map(|w| fold(w)).collect(),
            negative: negative.iter().map(|w| fold(w)).collect(),
        }
    }
}

fn hits(words: &[&str], keywords: &[String]) -> usize {
    keywords
        .iter()
        .filter(|k| !k.is_empty() && words.iter().any(|w| w.starts_with(k.as_str())))
        .count()
}

impl SentimentModel for KeywordSentiment {
    fn name(&self) -> &'static str { "keywords" }

    fn score(&self, text: &str) -> Result<Sentiment, StageError> {
        let folded = fold(text);
        let words: Vec<&str> = folded.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect();
        let pos = hits(&words, &self.positive);
        let neg = hits(&words, &self.negative);
        Ok(match pos.cmp(&neg) {
            std::cmp::Ordering::Greater => Sentiment { label: SentimentLabel::Positive, confidence: 0.7 },
            std::cmp::Ordering::Less => Sentiment { label: SentimentLabel::Negative, confidence: 0.3 },
            std::cmp::Ordering::Equal => Sentiment::NEUTRAL,
        })
    }
}

/// Scores every title. Records the model fails on stay neutral; the first
/// failure is returned so the runner can report it.
pub fn analyze(records: &mut [ProductRecord], model: &dyn SentimentModel) -> Result<(), StageError> {
    let failures: Vec<StageError> = records
        .par_iter_mut()
        .filter_map(|r| match model.score(&r.raw.title) {
            Ok(s) => {
                r.sentiment = Sentiment { label: s.label, confidence: s.confidence.clamp(0.0, 1.0) };
                None
            }
            Err(e) => {
                r.sentiment = Sentiment::NEUTRAL;
                Some(e)
            }
        })
        .collect();

    let positive = records.iter().filter(|r| r.sentiment.label == SentimentLabel::Positive).count();
    let negative = records.iter().filter(|r| r.sentiment.label == SentimentLabel::Negative).count();
    logf!("Sentiment ({}): {} positive, {} negative", model.name(), positive, negative);

    if !failures.is_empty() {
        logd!("Sentiment: {} titles fell back to neutral", failures.len());
    }
    failures.into_iter().next().map_or(Ok(()), Err)
}

pub fn neutral(records: &mut [ProductRecord]) {
    for r in records {
        r.sentiment = Sentiment::NEUTRAL;
    }
}
