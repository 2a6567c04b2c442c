//! Statistical named-entity recognition
//!
//! Candidates are maximal runs of capitalized tokens separated only by
//! whitespace. Each candidate gets a small binary feature vector that is
//! scored by a per-label log-linear model; probabilities come from a softmax
//! against an implicit "none" class fixed at zero.
//!
//! The recognizer labels PERSON, ORG, GPE and DATE spans. The detector
//! wrapping it emits PERSON only.

use super::{CharOffsets, PiiDetector};
use crate::analysis::config::NerConfig;
use crate::analysis::document::truncate_chars;
use crate::analysis::models::{DetectionMethod, PiiEntity, PiiLabel};
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_MODEL: &str = include_str!("../../../models/ner_en.toml");

/// Default cap on characters handed to the recognizer
pub const DEFAULT_MAX_CHARS: usize = 100_000;

const TOKEN_PATTERN: &str = r"\p{L}[\p{L}\p{M}'’-]*|\p{N}+";

const FEATURES: [&str; 9] = [
    "honorific",
    "given_name",
    "surname",
    "multi_token",
    "org_suffix",
    "place",
    "month",
    "numeric_neighbor",
    "sentence_initial",
];
const FEATURE_COUNT: usize = FEATURES.len();

/// A span labelled by a recognizer
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedSpan {
    pub text: String,
    pub label: PiiLabel,
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    pub probability: f64,
}

/// Named-entity recognition capability
pub trait EntityRecognizer: Send + Sync {
    /// Label entity spans in `text`
    fn recognize(&self, text: &str) -> Vec<RecognizedSpan>;

    /// Whether a model is loaded
    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Recognizer used when no model could be loaded
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecognizer;

impl EntityRecognizer for NoopRecognizer {
    fn recognize(&self, _text: &str) -> Vec<RecognizedSpan> {
        Vec::new()
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "none"
    }
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    model: ModelHeader,
    #[serde(default)]
    lexicon: LexiconFile,
    #[serde(default)]
    labels: BTreeMap<String, LabelFile>,
}

#[derive(Debug, Deserialize)]
struct ModelHeader {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

fn default_threshold() -> f64 {
    0.55
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LexiconFile {
    honorifics: Vec<String>,
    given_names: Vec<String>,
    surnames: Vec<String>,
    org_suffixes: Vec<String>,
    places: Vec<String>,
    months: Vec<String>,
    stopwords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LabelFile {
    #[serde(default)]
    bias: f64,
    #[serde(default)]
    weights: HashMap<String, f64>,
}

#[derive(Debug, Default)]
struct Lexicon {
    honorifics: HashSet<String>,
    given_names: HashSet<String>,
    surnames: HashSet<String>,
    org_suffixes: HashSet<String>,
    places: HashSet<String>,
    months: HashSet<String>,
    stopwords: HashSet<String>,
}

impl From<LexiconFile> for Lexicon {
    fn from(file: LexiconFile) -> Self {
        fn set(words: Vec<String>) -> HashSet<String> {
            words
                .into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        }

        Self {
            honorifics: set(file.honorifics),
            given_names: set(file.given_names),
            surnames: set(file.surnames),
            org_suffixes: set(file.org_suffixes),
            places: set(file.places),
            months: set(file.months),
            stopwords: set(file.stopwords),
        }
    }
}

impl Lexicon {
    fn is_known(&self, word: &str) -> bool {
        self.honorifics.contains(word)
            || self.given_names.contains(word)
            || self.surnames.contains(word)
            || self.org_suffixes.contains(word)
            || self.places.contains(word)
            || self.months.contains(word)
    }
}

#[derive(Debug, Clone)]
struct LabelModel {
    label: PiiLabel,
    bias: f64,
    weights: [f64; FEATURE_COUNT],
}

impl LabelModel {
    fn logit(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

/// Parsed recognizer model
#[derive(Debug)]
pub struct NerModel {
    name: String,
    version: String,
    threshold: f64,
    lexicon: Lexicon,
    labels: Vec<LabelModel>,
}

impl NerModel {
    /// Model embedded in the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml(DEFAULT_MODEL)
    }

    /// Load a model from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read NER model: {}", path.as_ref().display())
        })?;

        Self::from_toml(&content)
    }

    /// Parse a model from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ModelFile = toml::from_str(content).context("Failed to parse NER model TOML")?;

        if !(file.model.threshold > 0.0 && file.model.threshold <= 1.0) {
            anyhow::bail!(
                "NER model threshold must be in (0, 1], got {}",
                file.model.threshold
            );
        }
        if file.labels.is_empty() {
            anyhow::bail!("NER model '{}' defines no labels", file.model.name);
        }

        let mut labels = Vec::with_capacity(file.labels.len());
        for (name, label_file) in file.labels {
            let label: PiiLabel = name
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid label in NER model: {name}"))?;

            let mut weights = [0.0; FEATURE_COUNT];
            for (feature, weight) in label_file.weights {
                let idx = FEATURES
                    .iter()
                    .position(|f| *f == feature)
                    .with_context(|| format!("Unknown feature '{feature}' for label {name}"))?;
                weights[idx] = weight;
            }

            labels.push(LabelModel {
                label,
                bias: label_file.bias,
                weights,
            });
        }

        Ok(Self {
            name: file.model.name,
            version: file.model.version,
            threshold: file.model.threshold,
            lexicon: file.lexicon.into(),
            labels,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Best label and its probability, or `None` when "none" wins
    fn classify(&self, features: &[f64; FEATURE_COUNT]) -> Option<(PiiLabel, f64)> {
        let logits: Vec<f64> = self.labels.iter().map(|l| l.logit(features)).collect();
        let max = logits.iter().copied().fold(0.0_f64, f64::max);
        let none = (0.0 - max).exp();
        let total = none + logits.iter().map(|z| (z - max).exp()).sum::<f64>();

        let (best, best_logit) = logits
            .iter()
            .enumerate()
            .fold(None, |acc: Option<(usize, f64)>, (i, &z)| match acc {
                Some((_, bz)) if bz >= z => acc,
                _ => Some((i, z)),
            })?;

        if best_logit <= 0.0 {
            return None;
        }
        Some((self.labels[best].label, (best_logit - max).exp() / total))
    }
}

#[derive(Debug)]
struct Token {
    start: usize,
    end: usize,
    raw_end: usize,
    lower: String,
    capitalized: bool,
    numeric: bool,
    possessive: bool,
}

/// Log-linear recognizer over capitalized token runs
pub struct StatisticalRecognizer {
    model: NerModel,
    token_regex: Regex,
}

impl StatisticalRecognizer {
    pub fn new(model: NerModel) -> Result<Self> {
        let token_regex = Regex::new(TOKEN_PATTERN).context("Failed to compile token pattern")?;
        Ok(Self { model, token_regex })
    }

    pub fn model(&self) -> &NerModel {
        &self.model
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        self.token_regex
            .find_iter(text)
            .map(|m| {
                let raw = m.as_str();
                let (core, possessive) = match raw
                    .strip_suffix("'s")
                    .or_else(|| raw.strip_suffix("’s"))
                {
                    Some(stem) if !stem.is_empty() => (stem, true),
                    _ => (raw, false),
                };
                let core = core.trim_end_matches(&['-', '\'', '’'][..]);
                let first = core.chars().next().unwrap_or(' ');

                Token {
                    start: m.start(),
                    end: m.start() + core.len(),
                    raw_end: m.end(),
                    lower: core.to_lowercase(),
                    capitalized: first.is_uppercase(),
                    numeric: first.is_numeric(),
                    possessive,
                }
            })
            .collect()
    }

    fn is_sentence_start(text: &str, byte_offset: usize) -> bool {
        let before = &text[..byte_offset];
        let trimmed = before.trim_end();
        if trimmed.is_empty() {
            return true;
        }
        trimmed.len() < before.len()
            && trimmed.ends_with(&['.', '!', '?', ':', ';', '"', '“'][..])
    }

    fn numeric_neighbor(text: &str, tokens: &[Token], lo: usize, hi: usize) -> bool {
        let separated = |a: &Token, b: &Token| {
            text[a.raw_end..b.start]
                .chars()
                .all(|c| c.is_whitespace() || c == ',')
        };
        let before = lo > 0 && tokens[lo - 1].numeric && separated(&tokens[lo - 1], &tokens[lo]);
        let after =
            hi < tokens.len() && tokens[hi].numeric && separated(&tokens[hi - 1], &tokens[hi]);
        before || after
    }

    /// Classify the run `tokens[lo..hi]`
    fn classify_run(
        &self,
        text: &str,
        tokens: &[Token],
        mut lo: usize,
        hi: usize,
    ) -> Option<(usize, usize, PiiLabel, f64)> {
        let lexicon = &self.model.lexicon;

        let mut honorific = lo > 0
            && lexicon.honorifics.contains(&tokens[lo - 1].lower)
            && text[tokens[lo - 1].raw_end..tokens[lo].start]
                .trim_matches(|c: char| c == '.' || c.is_whitespace())
                .is_empty();

        // Capitalization of an unknown sentence-initial word carries no signal
        if !honorific
            && hi - lo > 1
            && Self::is_sentence_start(text, tokens[lo].start)
            && !lexicon.is_known(&tokens[lo].lower)
        {
            lo += 1;
        }

        while lo < hi {
            let word = &tokens[lo].lower;
            if lexicon.honorifics.contains(word) {
                honorific = true;
            } else if !lexicon.stopwords.contains(word) {
                break;
            }
            lo += 1;
        }
        if lo == hi {
            return None;
        }

        let run = &tokens[lo..hi];
        let span_text = text[run[0].start..run[run.len() - 1].end].to_lowercase();
        let sentence_initial =
            !honorific && run.len() == 1 && Self::is_sentence_start(text, run[0].start);

        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let features: [f64; FEATURE_COUNT] = [
            flag(honorific),
            flag(lexicon.given_names.contains(&run[0].lower)),
            flag(run.iter().any(|t| lexicon.surnames.contains(&t.lower))),
            flag(run.len() > 1),
            flag(lexicon.org_suffixes.contains(&run[run.len() - 1].lower)),
            flag(
                lexicon.places.contains(&span_text)
                    || run.iter().any(|t| lexicon.places.contains(&t.lower)),
            ),
            flag(run.iter().any(|t| lexicon.months.contains(&t.lower))),
            flag(Self::numeric_neighbor(text, tokens, lo, hi)),
            flag(sentence_initial),
        ];

        let (label, probability) = self.model.classify(&features)?;
        if probability < self.model.threshold {
            return None;
        }
        Some((run[0].start, run[run.len() - 1].end, label, probability))
    }
}

impl EntityRecognizer for StatisticalRecognizer {
    fn recognize(&self, text: &str) -> Vec<RecognizedSpan> {
        let tokens = self.tokenize(text);
        let offsets = CharOffsets::new(text);
        let mut spans = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            if !tokens[i].capitalized {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < tokens.len()
                && tokens[j].capitalized
                && !tokens[j - 1].possessive
                && text[tokens[j - 1].raw_end..tokens[j].start]
                    .chars()
                    .all(char::is_whitespace)
            {
                j += 1;
            }

            if let Some((start, end, label, probability)) = self.classify_run(text, &tokens, i, j)
            {
                spans.push(RecognizedSpan {
                    text: text[start..end].to_string(),
                    label,
                    start: offsets.char_offset(start),
                    end: offsets.char_offset(end),
                    probability,
                });
            }
            i = j;
        }

        spans
    }

    fn name(&self) -> &str {
        self.model.name()
    }
}

/// Build the recognizer described by `config`
///
/// Falls back to [`NoopRecognizer`] with a single warning when the model
/// cannot be loaded.
pub fn build_recognizer(config: &NerConfig) -> Arc<dyn EntityRecognizer> {
    if !config.enabled {
        tracing::info!("Statistical entity recognition disabled");
        return Arc::new(NoopRecognizer);
    }

    let loaded = match &config.model_path {
        Some(path) => NerModel::from_file(path),
        None => NerModel::builtin(),
    }
    .and_then(StatisticalRecognizer::new);

    match loaded {
        Ok(recognizer) => {
            tracing::debug!(
                model = %recognizer.model().name(),
                version = %recognizer.model().version(),
                "Loaded NER model"
            );
            Arc::new(recognizer)
        }
        Err(e) => {
            tracing::warn!(
                error = %format!("{e:#}"),
                "NER model unavailable, continuing with pattern detection only"
            );
            Arc::new(NoopRecognizer)
        }
    }
}

/// PII detector backed by an [`EntityRecognizer`]
///
/// Runs over at most `max_chars` characters and keeps PERSON spans only.
#[derive(Clone)]
pub struct StatisticalDetector {
    recognizer: Arc<dyn EntityRecognizer>,
    max_chars: usize,
}

impl StatisticalDetector {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, max_chars: usize) -> Self {
        Self {
            recognizer,
            max_chars,
        }
    }

    pub fn from_config(config: &NerConfig) -> Self {
        Self::new(build_recognizer(config), config.max_chars)
    }

    /// Detector using the embedded model and the default character cap
    pub fn with_default_model() -> Self {
        Self::from_config(&NerConfig::default())
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_available()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}

impl PiiDetector for StatisticalDetector {
    fn detect(&self, text: &str) -> Vec<PiiEntity> {
        if !self.recognizer.is_available() || text.is_empty() {
            return Vec::new();
        }

        let prefix = truncate_chars(text, self.max_chars);
        self.recognizer
            .recognize(prefix)
            .into_iter()
            .filter(|span| span.label == PiiLabel::Person)
            .map(|span| {
                PiiEntity::new(
                    span.text,
                    span.label,
                    span.start,
                    span.end,
                    DetectionMethod::StatisticalModel,
                )
            })
            .collect()
    }

    fn name(&self) -> &str {
        self.recognizer.name()
    }
}
