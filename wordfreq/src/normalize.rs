use std::collections::HashSet;

/// Strips ASCII punctuation (``!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~``) without
/// leaving anything in its place.
pub fn remove_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Words a run is restricted to. Stored lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Punctuation removal, whitespace split and vocabulary filter.
///
/// Tokens keep their case. An empty vocabulary filters nothing, same as
/// passing `None`.
pub fn normalize(text: &str, filter: Option<&Vocabulary>) -> Vec<String> {
    let tokens = tokenize(&remove_punctuation(text));
    match filter {
        Some(vocab) if !vocab.is_empty() => tokens
            .into_iter()
            .filter(|token| vocab.contains(token))
            .collect(),
        _ => tokens,
    }
}
