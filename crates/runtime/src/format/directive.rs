//! Directive grammar: `base ["P"] ["." digits]`, `base := NICK | LVL | IV`.

use std::str::FromStr;

use strum::{Display, EnumIter, IntoEnumIterator};
use thiserror::Error;

/// Largest fractional precision accepted by `LVL.<n>` / `IV.<n>`.
pub const MAX_FRACTION_DIGITS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Base {
    Nick,
    Lvl,
    Iv,
}

/// A parsed `%...%` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub base: Base,
    /// The `P` suffix: widen the integer part.
    pub percentile: bool,
    /// The `.<n>` suffix: truncation length for `NICK`, fraction digits otherwise.
    pub precision: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("unknown directive base in `{0}`")]
    UnknownBase(String),

    #[error("unexpected `{rest}` after {base}")]
    UnexpectedSuffix { base: Base, rest: String },

    #[error("invalid precision `{0}`")]
    InvalidPrecision(String),
}

impl FromStr for Directive {
    type Err = DirectiveError;

    /// Parses the text between two `%` delimiters, case-insensitively.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let upper = text.to_uppercase();
        let (base, rest) = parse_base(&upper)?;
        let (percentile, rest) = match rest.strip_prefix('P') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let precision = parse_precision(base, rest)?;

        Ok(Directive {
            base,
            percentile,
            precision,
        })
    }
}

fn parse_base(text: &str) -> Result<(Base, &str), DirectiveError> {
    Base::iter()
        .find_map(|base| {
            text.strip_prefix(base.to_string().as_str())
                .map(|rest| (base, rest))
        })
        .ok_or_else(|| DirectiveError::UnknownBase(text.to_owned()))
}

fn parse_precision(base: Base, rest: &str) -> Result<Option<u32>, DirectiveError> {
    if rest.is_empty() {
        return Ok(None);
    }
    let Some(digits) = rest.strip_prefix('.') else {
        return Err(DirectiveError::UnexpectedSuffix {
            base,
            rest: rest.to_owned(),
        });
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DirectiveError::InvalidPrecision(digits.to_owned()));
    }
    digits
        .parse()
        .map(Some)
        .map_err(|_| DirectiveError::InvalidPrecision(digits.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Directive, DirectiveError> {
        text.parse()
    }

    #[test]
    fn parses_bare_bases() {
        for (text, base) in [("NICK", Base::Nick), ("lvl", Base::Lvl), ("Iv", Base::Iv)] {
            assert_eq!(
                parse(text),
                Ok(Directive {
                    base,
                    percentile: false,
                    precision: None
                })
            );
        }
    }

    #[test]
    fn parses_suffixes() {
        assert_eq!(
            parse("ivp.2"),
            Ok(Directive {
                base: Base::Iv,
                percentile: true,
                precision: Some(2)
            })
        );
        assert_eq!(
            parse("NICK.3"),
            Ok(Directive {
                base: Base::Nick,
                percentile: false,
                precision: Some(3)
            })
        );
        assert_eq!(
            parse("LVLP"),
            Ok(Directive {
                base: Base::Lvl,
                percentile: true,
                precision: None
            })
        );
    }

    #[test]
    fn rejects_malformed_directives() {
        assert!(matches!(parse("BOGUS"), Err(DirectiveError::UnknownBase(_))));
        assert!(matches!(parse(""), Err(DirectiveError::UnknownBase(_))));
        assert!(matches!(
            parse("IVX"),
            Err(DirectiveError::UnexpectedSuffix { base: Base::Iv, .. })
        ));
        assert!(matches!(parse("LVL."), Err(DirectiveError::InvalidPrecision(_))));
        assert!(matches!(parse("LVL.-1"), Err(DirectiveError::InvalidPrecision(_))));
        assert!(matches!(parse("LVL.+1"), Err(DirectiveError::InvalidPrecision(_))));
        assert!(matches!(
            parse("IV.99999999999"),
            Err(DirectiveError::InvalidPrecision(_))
        ));
    }
}
