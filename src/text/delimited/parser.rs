//! Character level state machine that splits one record into tokens.
//!
//! The grammar is the one the writers produce: every quote inside a token is
//! doubled, and tokens that contain the token delimiter or the record
//! delimiter are wrapped in quotes. Reading is lenient; input that no writer
//! would produce still yields a best effort token instead of an error.
//!
//! The record delimiter is matched alongside the main state on every
//! character. Its characters are appended to the token as they arrive and
//! removed again once the full delimiter terminates the record.

use super::config::DelimitedConfig;
use super::matcher::DelimiterMatcher;

/// Position of the parser within the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No character of the current token consumed yet.
    TokenStart,
    /// The token opened with this many quotes. An odd run opens a quoted
    /// token, an even run is a sequence of escaped quotes.
    LeadingQuotes(usize),
    Unquoted,
    /// A quote inside an unquoted token, waiting for its escape partner.
    UnquotedQuote,
    Quoted,
    /// A quote inside a quoted token: half of an escape, or the closing quote.
    QuotedQuote,
    /// A quote inside a quoted token followed by this many characters of the
    /// record delimiter. Completing the delimiter makes the quote a closing
    /// quote; anything else makes it content.
    ClosingQuote(usize),
    /// The record delimiter terminated the record. The token is final.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Quote,
    TokenDelimiter,
    Other,
}

/// Outcome of feeding one character to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    RecordEnd,
}

/// Parses a single record. Create one per record; all state is local to it.
#[derive(Debug)]
pub(crate) struct RecordParser {
    token_delimiter: char,
    quote: char,
    matcher: DelimiterMatcher,
    state: State,
    token: String,
    tokens: Vec<String>,
}

impl RecordParser {
    pub fn new(config: &DelimitedConfig) -> Self {
        RecordParser {
            token_delimiter: config.token_delimiter,
            quote: config.quote,
            matcher: DelimiterMatcher::new(&config.record_delimiter),
            state: State::TokenStart,
            token: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Feed the next character of the record.
    ///
    /// Must not be called again after it returned [`Step::RecordEnd`].
    pub fn push(&mut self, c: char) -> Step {
        debug_assert_ne!(self.state, State::Ended, "record already complete");

        let matched = self.matcher.advance(c);
        let class = self.classify(c);
        self.state = self.transition(self.state, class, c, matched);

        if !self.matcher.is_complete() {
            return Step::Continue;
        }

        let delimiter_len = self.matcher.len();
        match self.state {
            State::Unquoted => {
                self.truncate(delimiter_len);
                self.state = State::Ended;
                Step::RecordEnd
            },
            State::ClosingQuote(k) if k == delimiter_len => {
                self.truncate(delimiter_len + 1);
                self.state = State::Ended;
                Step::RecordEnd
            },
            _ => {
                // Delimiter inside a quoted token is content
                self.matcher.reset();
                Step::Continue
            },
        }
    }

    /// Finish the record at end of stream (or after [`Step::RecordEnd`]) and
    /// return its tokens. There is always at least one token.
    pub fn finish(mut self) -> Vec<String> {
        match self.state {
            // Odd runs drop their opening quote, even runs are all escapes
            State::LeadingQuotes(n) => self.push_quotes(n / 2),
            State::UnquotedQuote => self.token.push(self.quote),
            // Unterminated quoted tokens keep what they have
            State::TokenStart
            | State::Unquoted
            | State::Quoted
            | State::QuotedQuote
            | State::ClosingQuote(_)
            | State::Ended => {},
        }
        self.end_token();
        self.tokens
    }

    fn classify(&self, c: char) -> CharClass {
        if c == self.quote {
            CharClass::Quote
        } else if c == self.token_delimiter {
            CharClass::TokenDelimiter
        } else {
            CharClass::Other
        }
    }

    fn transition(&mut self, state: State, class: CharClass, c: char, matched: usize) -> State {
        match (state, class) {
            (State::TokenStart, CharClass::Quote) => State::LeadingQuotes(1),
            (State::TokenStart, CharClass::TokenDelimiter) => {
                self.end_token();
                State::TokenStart
            },
            (State::TokenStart, CharClass::Other) => {
                self.token.push(c);
                State::Unquoted
            },

            (State::LeadingQuotes(n), CharClass::Quote) => State::LeadingQuotes(n + 1),
            (State::LeadingQuotes(n), _) => {
                self.push_quotes(n / 2);
                let resolved = if n % 2 == 0 { State::Unquoted } else { State::Quoted };
                self.transition(resolved, class, c, matched)
            },

            (State::Unquoted, CharClass::Quote) => State::UnquotedQuote,
            (State::Unquoted, CharClass::TokenDelimiter) => {
                self.end_token();
                State::TokenStart
            },
            (State::Unquoted, CharClass::Other) => {
                self.token.push(c);
                State::Unquoted
            },

            (State::UnquotedQuote, CharClass::Quote) => {
                self.token.push(self.quote);
                State::Unquoted
            },
            (State::UnquotedQuote, _) => {
                // Unpaired quote in an unquoted token is kept as is
                self.token.push(self.quote);
                self.transition(State::Unquoted, class, c, matched)
            },

            (State::Quoted, CharClass::Quote) => State::QuotedQuote,
            (State::Quoted, _) => {
                self.token.push(c);
                State::Quoted
            },

            (State::QuotedQuote, CharClass::Quote) => {
                self.token.push(self.quote);
                State::Quoted
            },
            (State::QuotedQuote, CharClass::TokenDelimiter) => {
                self.end_token();
                State::TokenStart
            },
            (State::QuotedQuote, CharClass::Other) => {
                self.token.push(self.quote);
                self.token.push(c);
                if matched == 1 {
                    State::ClosingQuote(1)
                } else {
                    State::Quoted
                }
            },

            (State::ClosingQuote(k), CharClass::Other) => {
                self.token.push(c);
                if matched == k + 1 {
                    State::ClosingQuote(matched)
                } else {
                    State::Quoted
                }
            },
            (State::ClosingQuote(_), _) => self.transition(State::Quoted, class, c, matched),

            (State::Ended, _) => State::Ended,
        }
    }

    fn push_quotes(&mut self, count: usize) {
        self.token.extend(std::iter::repeat_n(self.quote, count));
    }

    fn truncate(&mut self, chars: usize) {
        for _ in 0..chars {
            self.token.pop();
        }
    }

    fn end_token(&mut self) {
        self.tokens.push(std::mem::take(&mut self.token));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds `input` and returns the tokens plus how many characters were consumed.
    fn parse(config: &DelimitedConfig, input: &str) -> (Vec<String>, usize) {
        let mut parser = RecordParser::new(config);
        let mut consumed = 0;
        for c in input.chars() {
            consumed += 1;
            if parser.push(c) == Step::RecordEnd {
                break;
            }
        }
        (parser.finish(), consumed)
    }

    fn tokens(input: &str) -> Vec<String> {
        parse(&DelimitedConfig::csv(), input).0
    }

    #[test]
    fn test_plain_tokens() {
        assert_eq!(tokens("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(tokens(""), vec![""]);
        assert_eq!(tokens(","), vec!["", ""]);
        assert_eq!(tokens("a,,"), vec!["a", "", ""]);
    }

    #[test]
    fn test_record_delimiter_stops_parsing() {
        let (parsed, consumed) = parse(&DelimitedConfig::csv(), "a,b\r\nc,d");
        assert_eq!(parsed, vec!["a", "b"]);
        assert_eq!(consumed, 5);

        let (parsed, consumed) = parse(&DelimitedConfig::csv(), "\r\nrest");
        assert_eq!(parsed, vec![""]);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_partial_record_delimiter_in_token() {
        assert_eq!(tokens("a\r\r\nb"), vec!["a\r"]);
        assert_eq!(tokens("a\rb,\n"), vec!["a\rb", "\n"]);
    }

    #[test]
    fn test_quoted_tokens() {
        assert_eq!(tokens("\"a,b\",c"), vec!["a,b", "c"]);
        assert_eq!(tokens("\"te,st3\"\r\nnext"), vec!["te,st3"]);
        assert_eq!(tokens("\"line\r\nbreak\",x"), vec!["line\r\nbreak", "x"]);
        assert_eq!(tokens("\"end\r\n\"\r\n"), vec!["end\r\n"]);
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(tokens("te\"\"st2"), vec!["te\"st2"]);
        assert_eq!(tokens("\"\""), vec!["\""]);
        assert_eq!(tokens("\"\"\"\""), vec!["\"\""]);
        assert_eq!(tokens("\"\"\"\"\"\""), vec!["\"\"\""]);
        assert_eq!(tokens("\"\"x"), vec!["\"x"]);
        assert_eq!(tokens("\"\"\",\""), vec!["\","]);
        assert_eq!(tokens("\"a,\"\"\",b"), vec!["a,\"", "b"]);
        assert_eq!(tokens("\"a,\"\"\"\r\nb"), vec!["a,\""]);
    }

    #[test]
    fn test_lenient_input() {
        // Lone quote in an unquoted token
        assert_eq!(tokens("a\"b"), vec!["a\"b"]);
        assert_eq!(tokens("ab\""), vec!["ab\""]);
        // Unterminated quoted token
        assert_eq!(tokens("\"a,b"), vec!["a,b"]);
        assert_eq!(tokens("\""), vec![""]);
        // Quote inside a quoted token followed by ordinary content
        assert_eq!(tokens("\"a,\"x\""), vec!["a,\"x"]);
        // Quote followed by a partial record delimiter
        assert_eq!(tokens("\"a,\"\rx\""), vec!["a,\"\rx"]);
        assert_eq!(tokens("\"a,\"\r"), vec!["a,\"\r"]);
    }

    #[test]
    fn test_single_char_record_delimiter() {
        let config = DelimitedConfig::new('|', '\'', "\n");
        assert_eq!(parse(&config, "'a|b'\nc").0, vec!["a|b"]);
        assert_eq!(parse(&config, "x|''y\n").0, vec!["x", "'y"]);
    }

    #[test]
    fn test_multi_char_record_delimiter() {
        let config = DelimitedConfig::new(',', '"', "<EOR>");
        assert_eq!(parse(&config, "a,b<EOR>c").0, vec!["a", "b"]);
        assert_eq!(parse(&config, "\"x<EOR>y\",z<EO<EOR>").0, vec!["x<EOR>y", "z<EO"]);
    }
}
