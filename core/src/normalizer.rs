use lazy_static::lazy_static;
use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use unicode_normalization::UnicodeNormalization;

use crate::error::{CoreError, Result};

pub const DEFAULT_STEM_CACHE_CAPACITY: usize = 50_000;

lazy_static! {
    // ASCII punctuation and symbols, Unicode punctuation and decimal digits,
    // one character per match.
    static ref STRIP: Regex = Regex::new(r"[[:punct:]\p{P}\p{Nd}]").expect("valid regex");
}

const BUILTIN_STOPWORDS: &[&str] = &[
    "i","me","my","myself","we","our","ours","ourselves","you","you're","you've","you'll","you'd",
    "your","yours","yourself","yourselves","he","him","his","himself","she","she's","her","hers",
    "herself","it","it's","its","itself","they","them","their","theirs","themselves",
    "what","which","who","whom","this","that","that'll","these","those",
    "am","is","are","was","were","be","been","being","have","has","had","having","do","does","did","doing",
    "a","an","the","and","but","if","or","because","as","until","while",
    "of","at","by","for","with","about","against","between","into","through","during","before","after",
    "above","below","to","from","up","down","in","out","on","off","over","under",
    "again","further","then","once","here","there","when","where","why","how",
    "all","any","both","each","few","more","most","other","some","such",
    "no","nor","not","only","own","same","so","than","too","very",
    "s","t","can","will","just","don","don't","should","should've","now",
    "d","ll","m","o","re","ve","y","ain","aren","aren't","couldn","couldn't","didn","didn't",
    "doesn","doesn't","hadn","hadn't","hasn","hasn't","haven","haven't","isn","isn't","ma",
    "mightn","mightn't","mustn","mustn't","needn","needn't","shan","shan't","shouldn","shouldn't",
    "wasn","wasn't","weren","weren't","won","won't","wouldn","wouldn't",
];

/// Lower-cased stopword set. The empty string is always a member so that
/// empty tokens can never reach the index.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self { Self::builtin() }
}

impl Stopwords {
    /// Only the empty-string sentinel.
    pub fn empty() -> Self {
        let mut words = HashSet::new();
        words.insert(String::new());
        Self { words }
    }

    /// The built-in general English list.
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        set.extend(BUILTIN_STOPWORDS.iter().copied());
        set
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        set.extend(words);
        set
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
    }

    /// Read one stopword per line from `path` and merge them with the built-in list.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let mut set = Self::builtin();
        set.extend(content.lines());
        tracing::debug!(path = %path.display(), size = set.len(), "loaded stopwords");
        Ok(set)
    }

    /// `word` is expected to be lower-cased already.
    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

/// Bounded least-recently-used memo of stems keyed by the input token.
///
/// Eviction only costs a recomputation; the stem returned for a token never
/// depends on the capacity.
pub struct StemCache {
    entries: Mutex<LruCache<String, String>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl StemCache {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get_or_stem(&self, token: &str, stemmer: &Stemmer) -> String {
        let mut entries = self.entries.lock();
        if let Some(stem) = entries.get(token) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return stem.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let stem = stemmer.stem(token).into_owned();
        entries.put(token.to_string(), stem.clone());
        stem
    }

    pub fn len(&self) -> usize { self.entries.lock().len() }

    pub fn is_empty(&self) -> bool { self.entries.lock().is_empty() }

    pub fn capacity(&self) -> usize { self.entries.lock().cap().get() }

    pub fn hits(&self) -> u64 { self.hits.load(Ordering::Relaxed) }

    pub fn misses(&self) -> u64 { self.misses.load(Ordering::Relaxed) }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total > 0.0 { hits / total } else { 0.0 }
    }
}

/// Turns raw text into index terms: NFKC folding, punctuation and digit
/// stripping, lower-casing, stopword removal, Snowball English stemming and a final
/// stopword/length filter on the stems.
pub struct Normalizer {
    stopwords: Stopwords,
    stemmer: Stemmer,
    cache: StemCache,
}

impl Normalizer {
    pub fn new(stopwords: Stopwords, cache_capacity: usize) -> Self {
        Self {
            stopwords,
            stemmer: Stemmer::create(Algorithm::English),
            cache: StemCache::new(cache_capacity),
        }
    }

    pub fn stopwords(&self) -> &Stopwords { &self.stopwords }

    pub fn cache(&self) -> &StemCache { &self.cache }

    pub fn normalize(&self, raw: &str) -> Vec<String> {
        let folded: String = raw.nfkc().collect();
        let stripped = STRIP.replace_all(&folded, " ").to_lowercase();
        stripped
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(token))
            .map(|token| self.cache.get_or_stem(token, &self.stemmer))
            // stemming can land on a stopword or a fragment
            .filter(|stem| !self.stopwords.contains(stem) && stem.chars().count() > 2)
            .collect()
    }

    /// Normalize every entry of a raw ID -> text mapping.
    pub fn normalize_all<K: Ord + Copy>(&self, raw: &BTreeMap<K, String>) -> BTreeMap<K, Vec<String>> {
        raw.iter().map(|(id, text)| (*id, self.normalize(text))).collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self { Self::new(Stopwords::builtin(), DEFAULT_STEM_CACHE_CAPACITY) }
}
