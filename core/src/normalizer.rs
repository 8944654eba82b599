use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// Characters treated as noise rather than letters: digits and a fixed punctuation set.
pub const SYMBOLS: &str = "1234567890!@#$%^&*()[]{};':\".,<>/?`~-=+";

/// Tokens of this many characters or fewer are dropped.
pub const MIN_TERM_CHARS: usize = 4;

const MAX_STEM_PASSES: usize = 8;

const ENGLISH_STOPWORDS: &[&str] = &[
    "i","me","my","myself","we","our","ours","ourselves","you","you're","you've","you'll","you'd",
    "your","yours","yourself","yourselves","he","him","his","himself","she","she's","her","hers",
    "herself","it","it's","its","itself","they","them","their","theirs","themselves","what","which",
    "who","whom","this","that","that'll","these","those","am","is","are","was","were","be","been",
    "being","have","has","had","having","do","does","did","doing","a","an","the","and","but","if",
    "or","because","as","until","while","of","at","by","for","with","about","against","between",
    "into","through","during","before","after","above","below","to","from","up","down","in","out",
    "on","off","over","under","again","further","then","once","here","there","when","where","why",
    "how","all","any","both","each","few","more","most","other","some","such","no","nor","not",
    "only","own","same","so","than","too","very","s","t","can","will","just","don","don't","should",
    "should've","now","d","ll","m","o","re","ve","y","ain","aren","aren't","couldn","couldn't",
    "didn","didn't","doesn","doesn't","hadn","hadn't","hasn","hasn't","haven","haven't","isn",
    "isn't","ma","mightn","mightn't","mustn","mustn't","needn","needn't","shan","shan't","shouldn",
    "shouldn't","wasn","wasn't","weren","weren't","won","won't","wouldn","wouldn't",
];

lazy_static! {
    static ref DEFAULT: Normalizer = Normalizer::english();
}

/// Maps a word to its stem.
pub trait Stem {
    fn stem(&self, word: &str) -> String;
}

impl Stem for Stemmer {
    fn stem(&self, word: &str) -> String {
        Stemmer::stem(self, word).into_owned()
    }
}

/// Turns raw tokens into index terms: lowercase, symbol removal, length and
/// stopword filtering, then stemming.
pub struct Normalizer<S = Stemmer> {
    stopwords: HashSet<String>,
    stemmer: S,
}

impl Normalizer<Stemmer> {
    pub fn english() -> Self {
        Self::new(ENGLISH_STOPWORDS.iter().copied(), Stemmer::create(Algorithm::English))
    }
}

impl<S: Stem> Normalizer<S> {
    pub fn new<I, W>(stopwords: I, stemmer: S) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self { stopwords: stopwords.into_iter().map(Into::into).collect(), stemmer }
    }

    /// Normalize a token sequence, keeping order and dropping rejected tokens.
    pub fn normalize<I, T>(&self, tokens: I) -> Vec<String>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        tokens.into_iter().filter_map(|t| self.normalize_token(t.as_ref())).collect()
    }

    /// Normalize a single raw token; `None` if it is filtered out.
    pub fn normalize_token(&self, raw: &str) -> Option<String> {
        // Removing every symbol occurrence subsumes trimming them from the ends.
        let word: String = raw.to_lowercase().chars().filter(|c| !is_symbol(*c)).collect();
        if !self.admits(&word) {
            return None;
        }
        let stem = self.stem_to_fixpoint(&word);
        // A stem that would itself be rejected cannot be a stable term.
        if self.admits(&stem) { Some(stem) } else { Some(word) }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    fn admits(&self, word: &str) -> bool {
        word.chars().count() >= MIN_TERM_CHARS && !self.is_stopword(word)
    }

    fn stem_to_fixpoint(&self, word: &str) -> String {
        let mut current = self.stemmer.stem(word);
        for _ in 1..MAX_STEM_PASSES {
            let next = self.stemmer.stem(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

impl Default for Normalizer<Stemmer> {
    fn default() -> Self {
        Self::english()
    }
}

fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(c)
}

/// Normalize with the shared English stopword list and Snowball stemmer.
pub fn normalize<I, T>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    DEFAULT.normalize(tokens)
}

/// The shared English normalizer behind [`normalize`].
pub fn default_normalizer() -> &'static Normalizer {
    &DEFAULT
}
