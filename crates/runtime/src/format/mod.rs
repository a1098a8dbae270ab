//! Nickname template engine.
//!
//! A template is free text with `%`-delimited directives that expand to values
//! taken from [`DerivedStats`]:
//!
//! | directive | output |
//! |---|---|
//! | `%NICK%` | display name |
//! | `%NICK.n%` | first `n` characters of the display name |
//! | `%LVL%` / `%LVLP%` | level, 1 / 2 integer digits, 1 fraction digit |
//! | `%IV%` / `%IVP%` | IV percentage, 1 / 3 integer digits, 1 fraction digit |
//! | `%LVL.n%`, `%IVP.n%`, ... | same widths with `n` fraction digits |
//!
//! Text between two `%` that contains a space is not a directive and is
//! copied as is, so ordinary prose like `100% off` needs no escaping. Any
//! directive that cannot be resolved is emitted verbatim, delimiters included.
//!
//! Parsing ([`Template::parse`]) and rendering ([`Template::render`]) are
//! separate so a template can be parsed once and rendered per creature.

mod decimal;
mod directive;

pub use decimal::format_decimal;
pub use directive::{Base, Directive, DirectiveError, MAX_FRACTION_DIGITS};

use tracing::trace;

use crate::stats::DerivedStats;

/// Parses `template` and renders it against `stats`.
pub fn format(template: &str, stats: &DerivedStats) -> String {
    Template::parse(template).render(stats)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Directive {
        directive: Directive,
        /// Text between the delimiters as written, used for the fallback.
        source: String,
    },
}

/// A parsed nickname template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Splits `template` into literal runs and directives. Never fails:
    /// malformed directives become literal text.
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while !rest.is_empty() {
            let Some(body) = rest.strip_prefix('%') else {
                let end = rest.find('%').unwrap_or(rest.len());
                literal.push_str(&rest[..end]);
                rest = &rest[end..];
                continue;
            };

            let Some(close) = body.find('%') else {
                // Unpaired trailing delimiter.
                literal.push_str(rest);
                break;
            };

            let candidate = &body[..close];
            if candidate.contains(' ') {
                // Prose: keep the opening `%` and text; the closing `%` may
                // open the next directive.
                literal.push('%');
                literal.push_str(candidate);
                rest = &body[close..];
                continue;
            }

            match candidate.parse::<Directive>() {
                Ok(directive) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Directive {
                        directive,
                        source: candidate.to_owned(),
                    });
                }
                Err(error) => {
                    trace!(target: "runtime::format", directive = candidate, %error, "Unresolved directive");
                    literal.push('%');
                    literal.push_str(candidate);
                    literal.push('%');
                }
            }
            rest = &body[close + 1..];
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    /// Renders the template against one creature's stats.
    pub fn render(&self, stats: &DerivedStats) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Directive { directive, source } => match resolve(directive, stats) {
                    Some(value) => out.push_str(&value),
                    None => {
                        trace!(target: "runtime::format", directive = %source, "Directive did not resolve");
                        out.push('%');
                        out.push_str(source);
                        out.push('%');
                    }
                },
            }
        }
        out
    }

    /// Whether the template contains at least one well-formed directive.
    pub fn has_directives(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Directive { .. }))
    }
}

/// Expands one directive. `None` means the fallback text is emitted.
fn resolve(directive: &Directive, stats: &DerivedStats) -> Option<String> {
    let value = match directive.base {
        Base::Nick => {
            if directive.percentile {
                return None;
            }
            match directive.precision {
                None => stats.name.clone(),
                Some(0) => return None,
                Some(length) => stats.name.chars().take(length as usize).collect(),
            }
        }
        Base::Lvl => {
            let width = if directive.percentile { 2 } else { 1 };
            number(f64::from(stats.level), width, directive.precision)?
        }
        Base::Iv => {
            let width = if directive.percentile { 3 } else { 1 };
            number(stats.iv_percentage(), width, directive.precision)?
        }
    };
    (!value.is_empty()).then_some(value)
}

fn number(value: f64, width: usize, precision: Option<u32>) -> Option<String> {
    let fraction_digits = precision.unwrap_or(1);
    if fraction_digits > MAX_FRACTION_DIGITS {
        return None;
    }
    format_decimal(value, width, fraction_digits as usize)
}
