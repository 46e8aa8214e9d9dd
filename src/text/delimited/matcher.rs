//! Incremental record delimiter matching.

/// Tracks how much of the record delimiter the most recent characters match.
///
/// On a mismatch the match falls back to the longest delimiter prefix that is
/// still a suffix of the input, so `"\r\r\n"` completes a CRLF delimiter.
#[derive(Debug, Clone)]
pub(crate) struct DelimiterMatcher {
    pattern: Vec<char>,
    // fallback[i]: length of the longest proper prefix of pattern[..=i] that is also its suffix
    fallback: Vec<usize>,
    matched: usize,
}

impl DelimiterMatcher {
    pub fn new(delimiter: &str) -> Self {
        let pattern: Vec<char> = delimiter.chars().collect();
        let mut fallback = vec![0; pattern.len()];
        let mut k = 0;
        for i in 1..pattern.len() {
            while k > 0 && pattern[i] != pattern[k] {
                k = fallback[k - 1];
            }
            if pattern[i] == pattern[k] {
                k += 1;
            }
            fallback[i] = k;
        }

        DelimiterMatcher {
            pattern,
            fallback,
            matched: 0,
        }
    }

    /// Number of characters in the delimiter.
    #[inline]
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// Feed one character, returning how many delimiter characters are now matched.
    pub fn advance(&mut self, c: char) -> usize {
        if self.matched == self.pattern.len() {
            self.matched = self.fallback.last().copied().unwrap_or(0);
        }
        while self.matched > 0 && self.pattern[self.matched] != c {
            self.matched = self.fallback[self.matched - 1];
        }
        if self.pattern.get(self.matched) == Some(&c) {
            self.matched += 1;
        }
        self.matched
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        !self.pattern.is_empty() && self.matched == self.pattern.len()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.matched = 0;
    }
}
