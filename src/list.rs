//! Delimited list encodings packed into single OPML attributes/elements.
//!
//! Categories are joined with a bare comma and split on every comma, with no
//! escaping. Expansion states are joined with `", "` but split on `","` with
//! per-token trimming; the asymmetry is what existing OPML producers expect.

use crate::error::OpmlError;

const CATEGORY_SEPARATOR: &str = ",";
const INTEGER_JOIN_SEPARATOR: &str = ", ";
const INTEGER_SPLIT_SEPARATOR: char = ',';

/// Joins categories with a literal comma.
///
/// A category containing a comma will not survive [`split_categories`].
pub fn join_categories(categories: &[String]) -> String {
    categories.join(CATEGORY_SEPARATOR)
}

/// Splits a `category` attribute on every comma. Tokens are not trimmed.
pub fn split_categories(value: &str) -> Vec<String> {
    value.split(CATEGORY_SEPARATOR).map(str::to_string).collect()
}

/// Joins integers with `", "`, e.g. `1, 6, 13`.
pub fn join_integers(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(INTEGER_JOIN_SEPARATOR)
}

/// Splits a comma-delimited integer list, trimming tokens and skipping empty ones.
///
/// # Errors
///
/// Returns [`OpmlError::MalformedIntegerList`] for the first token that does not
/// parse as an integer.
pub fn split_integers(value: &str) -> Result<Vec<i64>, OpmlError> {
    value
        .split(INTEGER_SPLIT_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|source| OpmlError::MalformedIntegerList {
                    token: token.to_string(),
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_join_categories() {
        let categories = vec![
            "/Philosophy/Baseball/Mets".to_string(),
            "/Tourism/New York".to_string(),
        ];
        assert_eq!(
            join_categories(&categories),
            "/Philosophy/Baseball/Mets,/Tourism/New York"
        );
    }

    #[test]
    fn test_split_categories_preserves_order_and_spaces() {
        let got = split_categories("/Philosophy/Baseball/Mets,/Tourism/New York");
        assert_eq!(got, vec!["/Philosophy/Baseball/Mets", "/Tourism/New York"]);

        let got = split_categories("a, b");
        assert_eq!(got, vec!["a", " b"]);
    }

    #[test]
    fn test_join_integers_uses_comma_space() {
        assert_eq!(join_integers(&[1, 6, 13, 16, 18, 20]), "1, 6, 13, 16, 18, 20");
        assert_eq!(join_integers(&[]), "");
    }

    #[test]
    fn test_split_integers_lenient_whitespace() {
        assert_eq!(split_integers("1,6 ,  13,,").unwrap(), vec![1, 6, 13]);
        assert_eq!(split_integers(" , ").unwrap(), Vec::<i64>::new());
        assert_eq!(split_integers("-3").unwrap(), vec![-3]);
    }

    #[test]
    fn test_split_integers_rejects_first_bad_token() {
        let err = split_integers("1, a, b").unwrap_err();
        match err {
            OpmlError::MalformedIntegerList { token, .. } => assert_eq!(token, "a"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_categories_without_commas_survive(categories in prop::collection::vec("[^,]{0,12}", 1..8)) {
            let joined = join_categories(&categories);
            prop_assert_eq!(split_categories(&joined), categories);
        }

        #[test]
        fn prop_integers_survive(values in prop::collection::vec(any::<i64>(), 0..16)) {
            let joined = join_integers(&values);
            prop_assert_eq!(split_integers(&joined).unwrap(), values);
        }
    }
}
