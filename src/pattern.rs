//! This module provides symbol patterns for transition lookups. A pattern is a tuple with one
//! entry per tape, each entry either a concrete tape symbol or the wildcard meta-symbol.
//! Patterns can be matched against scanned tuples, intersected with each other for ambiguity
//! checks, and used as write masks that copy the scanned symbol through wildcard positions.

use crate::types::WILDCARD_SYMBOL;
use std::fmt;

/// A single position of a [`Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternSymbol {
    Concrete(char),
    Wildcard,
}

impl PatternSymbol {
    fn matches(self, symbol: char) -> bool {
        match self {
            PatternSymbol::Concrete(c) => c == symbol,
            PatternSymbol::Wildcard => true,
        }
    }
}

impl From<char> for PatternSymbol {
    fn from(c: char) -> Self {
        if c == WILDCARD_SYMBOL {
            PatternSymbol::Wildcard
        } else {
            PatternSymbol::Concrete(c)
        }
    }
}

/// A tuple of pattern symbols, one per tape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<PatternSymbol>);

impl Pattern {
    /// Parses a pattern from its string form, one character per tape.
    ///
    /// ```
    /// use tm_engine::pattern::{Pattern, PatternSymbol};
    ///
    /// let pattern = Pattern::parse("a?");
    /// assert_eq!(pattern.symbols(), &[PatternSymbol::Concrete('a'), PatternSymbol::Wildcard]);
    /// ```
    pub fn parse(s: &str) -> Self {
        Pattern(s.chars().map(PatternSymbol::from).collect())
    }

    /// Builds a wildcard-free pattern from a concrete tuple.
    pub fn concrete(tuple: &[char]) -> Self {
        Pattern(tuple.iter().copied().map(PatternSymbol::Concrete).collect())
    }

    pub fn symbols(&self) -> &[PatternSymbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_wildcard(&self) -> bool {
        self.0.contains(&PatternSymbol::Wildcard)
    }

    /// Returns the concrete tuple this pattern denotes, or `None` if it contains a wildcard.
    pub fn to_concrete(&self) -> Option<Vec<char>> {
        self.0
            .iter()
            .map(|s| match s {
                PatternSymbol::Concrete(c) => Some(*c),
                PatternSymbol::Wildcard => None,
            })
            .collect()
    }

    /// Checks whether the concrete `tuple` is matched by this pattern.
    pub fn matches(&self, tuple: &[char]) -> bool {
        self.0.len() == tuple.len() && self.0.iter().zip(tuple).all(|(p, &c)| p.matches(c))
    }

    /// Materializes the write tuple of a transition: wildcard positions copy the scanned
    /// `input` symbol at the same position, concrete positions are written as is.
    pub fn mask(&self, input: &[char]) -> Vec<char> {
        self.0
            .iter()
            .zip(input)
            .map(|(p, &c)| match p {
                PatternSymbol::Concrete(w) => *w,
                PatternSymbol::Wildcard => c,
            })
            .collect()
    }

    /// Returns the number of concrete tuples over an alphabet of `alphabet_size` symbols that
    /// match both patterns, or `None` when the patterns cannot match a common tuple.
    ///
    /// The count saturates at `usize::MAX`.
    pub fn intersection_size(&self, other: &Pattern, alphabet_size: usize) -> Option<usize> {
        if self.len() != other.len() {
            return None;
        }

        let mut size: usize = 1;
        for (a, b) in self.0.iter().zip(&other.0) {
            match (a, b) {
                (PatternSymbol::Wildcard, PatternSymbol::Wildcard) => {
                    size = size.saturating_mul(alphabet_size);
                }
                (PatternSymbol::Concrete(x), PatternSymbol::Concrete(y)) if x != y => {
                    return None;
                }
                _ => {}
            }
        }

        Some(size)
    }

    /// Enumerates every concrete tuple over `alphabet` matched by both patterns.
    ///
    /// Positions where both patterns are wildcards range over the whole alphabet, a wildcard
    /// facing a concrete symbol fixes that symbol, and two concrete symbols must be equal.
    pub fn intersection(&self, other: &Pattern, alphabet: &[char]) -> Vec<Vec<char>> {
        let mut tuples = Vec::new();
        if self.len() == other.len() {
            let mut prefix = Vec::with_capacity(self.len());
            intersect_from(&self.0, &other.0, alphabet, &mut prefix, &mut tuples);
        }
        tuples
    }
}

fn intersect_from(
    a: &[PatternSymbol],
    b: &[PatternSymbol],
    alphabet: &[char],
    prefix: &mut Vec<char>,
    out: &mut Vec<Vec<char>>,
) {
    let (Some(&x), Some(&y)) = (a.first(), b.first()) else {
        out.push(prefix.clone());
        return;
    };

    let choices: Vec<char> = match (x, y) {
        (PatternSymbol::Wildcard, PatternSymbol::Wildcard) => alphabet.to_vec(),
        (PatternSymbol::Wildcard, PatternSymbol::Concrete(c))
        | (PatternSymbol::Concrete(c), PatternSymbol::Wildcard) => vec![c],
        (PatternSymbol::Concrete(c), PatternSymbol::Concrete(d)) if c == d => vec![c],
        _ => return,
    };

    for c in choices {
        prefix.push(c);
        intersect_from(&a[1..], &b[1..], alphabet, prefix, out);
        prefix.pop();
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            match symbol {
                PatternSymbol::Concrete(c) => write!(f, "{c}")?,
                PatternSymbol::Wildcard => write!(f, "{WILDCARD_SYMBOL}")?,
            }
        }
        Ok(())
    }
}
