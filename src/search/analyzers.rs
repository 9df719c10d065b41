//! Text analysis pipelines for the file index
//!
//! Tantivy ships tokenizers, lowercasing, stemming and stop-word removal. The
//! pieces it lacks are implemented here as token filters and a char filter:
//!
//! - [`EdgeNgramFilter`]: emits the prefixes of every token (autocomplete)
//! - [`WordDelimiterFilter`]: splits letter/digit runs while keeping the original
//! - [`CharMappingFilter`]: per-character folding (digits, Arabic/Persian forms)
//! - [`MappingCharFilter`]: rewrites the raw text before tokenization
//!
//! The named analyzers built from them are assembled by [`build_analyzers`].

use std::collections::VecDeque;

use tantivy::tokenizer::{
    Language, LowerCaser, RawTokenizer, RemoveLongFilter, SimpleTokenizer, Stemmer,
    StopWordFilter, TextAnalyzer, Token, TokenFilter, TokenStream, Tokenizer,
};

use crate::utils::{AUTOCOMPLETE_MAX_GRAM, AUTOCOMPLETE_MIN_GRAM};

use super::schema::SchemaError;

/// Analyzer names registered with every index
pub const STANDARD_ANALYZER: &str = "standard";
pub const KEYWORD_ANALYZER: &str = "keyword";
pub const AUTOCOMPLETE_ANALYZER: &str = "autocomplete";
pub const NAME_AUTOCOMPLETE_ANALYZER: &str = "name_autocomplete";
pub const ENGLISH_ANALYZER: &str = "rebuilt_english";
pub const ARABIC_ANALYZER: &str = "rebuilt_arabic";
pub const PERSIAN_ANALYZER: &str = "rebuilt_persian";

/// Tokens longer than this many bytes are dropped by text analyzers
const MAX_TOKEN_BYTES: usize = 255;

const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';

const ARABIC_STOP_WORDS: &[&str] = &[
    "من", "ومن", "منها", "منه", "في", "وفي", "فيها", "فيه", "و", "ف", "ثم", "او", "أو", "ب",
    "بها", "به", "ا", "أ", "اى", "اي", "أي", "أى", "لا", "ولا", "الا", "ألا", "إلا", "لكن",
    "ما", "وما", "كما", "فما", "عن", "مع", "اذا", "إذا", "ان", "أن", "إن", "انها", "أنها",
    "إنها", "انه", "أنه", "إنه", "بان", "بأن", "فان", "فأن", "وان", "وأن", "وإن", "التى",
    "التي", "الذى", "الذي", "الذين", "الى", "الي", "إلى", "إلي", "على", "عليها", "عليه",
    "اما", "أما", "إما", "ايضا", "أيضا", "كل", "وكل", "لم", "ولم", "لن", "ولن", "هى", "هي",
    "هو", "وهى", "وهي", "وهو", "فهى", "فهي", "فهو", "انت", "أنت", "لك", "لها", "له", "هذه",
    "هذا", "تلك", "ذلك", "هناك", "كانت", "كان", "يكون", "تكون", "وكانت", "وكان", "غير",
    "بعض", "قد", "نحو", "بين", "بينما", "منذ", "ضمن", "حيث", "الان", "الآن", "خلال", "بعد",
    "قبل", "حتى", "عند", "عندما", "لدى", "جميع",
];

const PERSIAN_STOP_WORDS: &[&str] = &[
    "و", "در", "به", "از", "که", "این", "را", "با", "است", "برای", "آن", "یک", "خود", "تا",
    "کرد", "بر", "هم", "نیز", "می", "شود", "وی", "شد", "دارد", "ما", "اما", "یا", "شده",
    "باید", "هر", "آنها", "بود", "او", "دیگر", "دو", "مورد", "همه", "کند", "من", "بی",
    "های", "ها", "اند", "هیچ", "چه", "ای", "نه", "ولی", "پس", "اگر", "همین", "چون",
];

/// Expands one upstream token into zero or more output texts
///
/// Every emitted text keeps the offsets and position of its source token.
pub trait TokenExpansion: Clone + Send + Sync + 'static {
    fn expand(&self, text: &str, out: &mut VecDeque<String>);
}

/// Tokenizer wrapper applying a [`TokenExpansion`] to every upstream token
#[derive(Clone)]
pub struct ExpandingTokenizer<T, E> {
    inner: T,
    expansion: E,
}

impl<T: Tokenizer, E: TokenExpansion> Tokenizer for ExpandingTokenizer<T, E> {
    type TokenStream<'a> = ExpandingTokenStream<T::TokenStream<'a>, E>;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        ExpandingTokenStream {
            tail: self.inner.token_stream(text),
            expansion: self.expansion.clone(),
            pending: VecDeque::new(),
            token: Token::default(),
        }
    }
}

pub struct ExpandingTokenStream<S, E> {
    tail: S,
    expansion: E,
    pending: VecDeque<String>,
    token: Token,
}

impl<S: TokenStream, E: TokenExpansion> TokenStream for ExpandingTokenStream<S, E> {
    fn advance(&mut self) -> bool {
        loop {
            if let Some(text) = self.pending.pop_front() {
                self.token.text = text;
                return true;
            }
            if !self.tail.advance() {
                return false;
            }
            let source = self.tail.token();
            self.token.offset_from = source.offset_from;
            self.token.offset_to = source.offset_to;
            self.token.position = source.position;
            self.token.position_length = source.position_length;
            self.expansion.expand(&source.text, &mut self.pending);
        }
    }

    fn token(&self) -> &Token {
        &self.token
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }
}

/// Edge n-gram token filter: `report` becomes `r`, `re`, `rep`, ... `report`
///
/// Tokens shorter than `min_gram` characters produce nothing.
#[derive(Clone, Copy, Debug)]
pub struct EdgeNgramFilter {
    min_gram: usize,
    max_gram: usize,
}

impl EdgeNgramFilter {
    #[must_use]
    pub fn new(min_gram: usize, max_gram: usize) -> Self {
        let min_gram = min_gram.max(1);
        Self {
            min_gram,
            max_gram: max_gram.max(min_gram),
        }
    }
}

impl Default for EdgeNgramFilter {
    fn default() -> Self {
        Self::new(AUTOCOMPLETE_MIN_GRAM, AUTOCOMPLETE_MAX_GRAM)
    }
}

impl TokenExpansion for EdgeNgramFilter {
    fn expand(&self, text: &str, out: &mut VecDeque<String>) {
        let prefix_ends = text
            .char_indices()
            .map(|(start, c)| start + c.len_utf8())
            .skip(self.min_gram - 1)
            .take(self.max_gram - self.min_gram + 1);
        out.extend(prefix_ends.map(|end| text[..end].to_string()));
    }
}

impl TokenFilter for EdgeNgramFilter {
    type Tokenizer<T: Tokenizer> = ExpandingTokenizer<T, EdgeNgramFilter>;

    fn transform<T: Tokenizer>(self, tokenizer: T) -> Self::Tokenizer<T> {
        ExpandingTokenizer {
            inner: tokenizer,
            expansion: self,
        }
    }
}

/// Splits tokens on letter/digit boundaries, emitting the original first
///
/// `q1` yields `q1`, `q`, `1`; tokens made of a single run pass unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordDelimiterFilter;

impl TokenExpansion for WordDelimiterFilter {
    fn expand(&self, text: &str, out: &mut VecDeque<String>) {
        out.push_back(text.to_string());

        let mut runs: Vec<&str> = Vec::new();
        let mut run_start = 0;
        let mut previous: Option<bool> = None;
        for (index, c) in text.char_indices() {
            let numeric = c.is_numeric();
            if previous.is_some_and(|was_numeric| was_numeric != numeric) {
                runs.push(&text[run_start..index]);
                run_start = index;
            }
            previous = Some(numeric);
        }
        if runs.is_empty() {
            return;
        }
        runs.push(&text[run_start..]);
        out.extend(runs.into_iter().map(str::to_string));
    }
}

impl TokenFilter for WordDelimiterFilter {
    type Tokenizer<T: Tokenizer> = ExpandingTokenizer<T, WordDelimiterFilter>;

    fn transform<T: Tokenizer>(self, tokenizer: T) -> Self::Tokenizer<T> {
        ExpandingTokenizer {
            inner: tokenizer,
            expansion: self,
        }
    }
}

/// Maps every character of a token; `None` drops the character
///
/// Tokens left empty after mapping are removed from the stream.
#[derive(Clone, Copy)]
pub struct CharMappingFilter {
    map: fn(char) -> Option<char>,
}

impl CharMappingFilter {
    #[must_use]
    pub fn new(map: fn(char) -> Option<char>) -> Self {
        Self { map }
    }
}

impl TokenExpansion for CharMappingFilter {
    fn expand(&self, text: &str, out: &mut VecDeque<String>) {
        let mapped: String = text.chars().filter_map(self.map).collect();
        if !mapped.is_empty() {
            out.push_back(mapped);
        }
    }
}

impl TokenFilter for CharMappingFilter {
    type Tokenizer<T: Tokenizer> = ExpandingTokenizer<T, CharMappingFilter>;

    fn transform<T: Tokenizer>(self, tokenizer: T) -> Self::Tokenizer<T> {
        ExpandingTokenizer {
            inner: tokenizer,
            expansion: self,
        }
    }
}

/// Char filter: rewrites the input text before the wrapped tokenizer sees it
///
/// Offsets of emitted tokens refer to the rewritten text.
#[derive(Clone)]
pub struct MappingCharFilter<T> {
    inner: T,
    map: fn(char) -> char,
    buffer: String,
}

impl<T: Tokenizer> MappingCharFilter<T> {
    #[must_use]
    pub fn new(inner: T, map: fn(char) -> char) -> Self {
        Self {
            inner,
            map,
            buffer: String::new(),
        }
    }
}

impl<T: Tokenizer> Tokenizer for MappingCharFilter<T> {
    type TokenStream<'a> = T::TokenStream<'a>;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        let Self { inner, map, buffer } = self;
        buffer.clear();
        buffer.extend(text.chars().map(*map));
        let buffer: &'a String = buffer;
        inner.token_stream(buffer)
    }
}

/// Zero-width non-joiner becomes a plain space so Persian compounds split
pub fn zero_width_to_space(c: char) -> char {
    if c == ZERO_WIDTH_NON_JOINER { ' ' } else { c }
}

/// Arabic-Indic, extended Arabic-Indic and fullwidth digits fold to ASCII
pub fn fold_decimal_digit(c: char) -> Option<char> {
    let zero = match c {
        '\u{0660}'..='\u{0669}' => 0x0660,
        '\u{06F0}'..='\u{06F9}' => 0x06F0,
        '\u{FF10}'..='\u{FF19}' => 0xFF10,
        _ => return Some(c),
    };
    char::from_digit(c as u32 - zero, 10)
}

/// Arabic orthographic normalization
///
/// Alef variants fold to bare alef, teh marbuta to heh, alef maksura to yeh;
/// tatweel and harakat are removed.
pub fn normalize_arabic(c: char) -> Option<char> {
    match c {
        '\u{0622}' | '\u{0623}' | '\u{0625}' => Some('\u{0627}'),
        '\u{0629}' => Some('\u{0647}'),
        '\u{0649}' => Some('\u{064A}'),
        '\u{0640}' | '\u{064B}'..='\u{0652}' => None,
        _ => Some(c),
    }
}

/// Persian normalization on top of the Arabic one
pub fn normalize_persian(c: char) -> Option<char> {
    match c {
        '\u{06CC}' | '\u{06D2}' => Some('\u{064A}'),
        '\u{06A9}' => Some('\u{0643}'),
        '\u{06C0}' | '\u{06C1}' => Some('\u{0647}'),
        '\u{0654}' => None,
        _ => Some(c),
    }
}

fn persian_form(word: &str) -> String {
    word.chars()
        .filter_map(normalize_arabic)
        .filter_map(normalize_persian)
        .collect()
}

/// Every analyzer the index schema references, keyed by registration name
pub fn build_analyzers() -> Result<Vec<(&'static str, TextAnalyzer)>, SchemaError> {
    let english_stop = StopWordFilter::new(Language::English).ok_or_else(|| {
        SchemaError::AnalyzerRegistration {
            name: ENGLISH_ANALYZER.to_string(),
            reason: "no English stop-word list available".to_string(),
        }
    })?;
    let arabic_stop = StopWordFilter::remove(ARABIC_STOP_WORDS.iter().map(|w| (*w).to_string()));
    let persian_stop = StopWordFilter::remove(PERSIAN_STOP_WORDS.iter().map(|w| persian_form(w)));

    let standard = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
        .filter(LowerCaser)
        .build();

    let keyword = TextAnalyzer::builder(RawTokenizer::default()).build();

    let autocomplete = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
        .filter(LowerCaser)
        .filter(EdgeNgramFilter::default())
        .build();

    let name_autocomplete = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
        .filter(LowerCaser)
        .filter(EdgeNgramFilter::default())
        .filter(WordDelimiterFilter)
        .build();

    let english = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
        .filter(LowerCaser)
        .filter(english_stop)
        .filter(Stemmer::new(Language::English))
        .filter(EdgeNgramFilter::default())
        .build();

    let arabic = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
        .filter(LowerCaser)
        .filter(CharMappingFilter::new(fold_decimal_digit))
        .filter(arabic_stop)
        .filter(CharMappingFilter::new(normalize_arabic))
        .filter(Stemmer::new(Language::Arabic))
        .filter(EdgeNgramFilter::default())
        .build();

    let persian = TextAnalyzer::builder(MappingCharFilter::new(
        SimpleTokenizer::default(),
        zero_width_to_space,
    ))
    .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
    .filter(LowerCaser)
    .filter(CharMappingFilter::new(fold_decimal_digit))
    .filter(CharMappingFilter::new(normalize_arabic))
    .filter(CharMappingFilter::new(normalize_persian))
    .filter(persian_stop)
    .filter(EdgeNgramFilter::default())
    .build();

    Ok(vec![
        (STANDARD_ANALYZER, standard),
        (KEYWORD_ANALYZER, keyword),
        (AUTOCOMPLETE_ANALYZER, autocomplete),
        (NAME_AUTOCOMPLETE_ANALYZER, name_autocomplete),
        (ENGLISH_ANALYZER, english),
        (ARABIC_ANALYZER, arabic),
        (PERSIAN_ANALYZER, persian),
    ])
}

/// Run `text` through `analyzer` and collect the token texts
pub fn analyze(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while stream.advance() {
        tokens.push(stream.token().text.clone());
    }
    tokens
}
