//! Frequency Aggregator: tokens in, counts out.

use polycloud_types::Token;

use crate::analyzer::normalizer::fold_case;
use crate::frequency::FrequencyMap;

/// Token filtering and case handling applied while counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountOptions {
    /// Skip tokens flagged as stopwords.
    pub remove_stopwords: bool,
    /// Skip tokens flagged as punctuation.
    pub remove_punctuation: bool,
    /// Fold casing variants into one entry.
    pub case_insensitive: bool,
}

impl CountOptions {
    /// Returns `true` if `token` should not be counted.
    #[inline]
    pub fn skips(&self, token: &Token) -> bool {
        token.is_whitespace
            || token.text.trim().is_empty()
            || (self.remove_stopwords && token.is_stopword)
            || (self.remove_punctuation && token.is_punctuation)
    }
}

/// Counts every surviving token by surface text.
///
/// Whitespace tokens (flagged or not) are always skipped, so the result
/// never contains an empty or blank key.
pub fn aggregate<'a, I>(tokens: I, options: CountOptions) -> FrequencyMap
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut counts = FrequencyMap::new();
    for token in tokens {
        if !options.skips(token) {
            counts.increment(&token.text);
        }
    }
    if options.case_insensitive {
        fold_case(counts)
    } else {
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Vec<Token> {
        vec![
            Token::stopword("The"),
            Token::whitespace(" "),
            Token::word("cloud"),
            Token::punctuation("."),
            Token::whitespace(" "),
            Token::stopword("the"),
            Token::word("cloud"),
            Token::word("\u{a0}"),
            Token::word(""),
            Token::punctuation("."),
        ]
    }

    #[test]
    fn counts_everything_but_whitespace_by_default() {
        let counts = aggregate(&sample(), CountOptions::default());
        assert_eq!(
            counts,
            FrequencyMap::from([("The", 1), ("the", 1), ("cloud", 2), (".", 2)])
        );
    }

    #[test]
    fn removes_stopwords() {
        let options = CountOptions {
            remove_stopwords: true,
            ..Default::default()
        };
        let counts = aggregate(&sample(), options);
        assert_eq!(counts, FrequencyMap::from([("cloud", 2), (".", 2)]));
    }

    #[test]
    fn removes_punctuation() {
        let options = CountOptions {
            remove_punctuation: true,
            ..Default::default()
        };
        let counts = aggregate(&sample(), options);
        assert_eq!(counts.get("."), None);
        assert_eq!(counts.get("cloud"), Some(2));
    }

    #[test]
    fn case_insensitive_folds() {
        let mut tokens = Vec::new();
        tokens.extend((0..3).map(|_| Token::word("The")));
        tokens.extend((0..5).map(|_| Token::word("the")));
        let options = CountOptions {
            case_insensitive: true,
            ..Default::default()
        };
        assert_eq!(aggregate(&tokens, options), FrequencyMap::from([("the", 8)]));
    }

    #[test]
    fn all_filtered_is_empty() {
        let tokens = vec![Token::stopword("a"), Token::punctuation("!"), Token::whitespace("\n")];
        let options = CountOptions {
            remove_stopwords: true,
            remove_punctuation: true,
            case_insensitive: true,
        };
        assert!(aggregate(&tokens, options).is_empty());
    }

    fn words_and_shuffle() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
        prop::collection::vec("[a-dA-D.]{1,2}", 0..50)
            .prop_flat_map(|words| (Just(words.clone()), Just(words).prop_shuffle()))
    }

    proptest! {
        #[test]
        fn order_independent((words, shuffled) in words_and_shuffle()) {
            let tokens: Vec<Token> = words.iter().map(|w| Token::word(w.as_str())).collect();
            let shuffled: Vec<Token> = shuffled.iter().map(|w| Token::word(w.as_str())).collect();
            for case_insensitive in [false, true] {
                let options = CountOptions { case_insensitive, ..Default::default() };
                prop_assert_eq!(aggregate(&tokens, options), aggregate(&shuffled, options));
            }
        }
    }
}
