//! Token catalog for the class diagram notation
//!
//! A token is a bare tag; the text it covers is recovered from the source
//! through its [`TokenPosition`] span. The catalog is an ordered list of
//! matchers, each of which reports how many bytes it matches at the start of
//! a span.

use std::fmt;

/// Class diagram token tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `#`
    Hash,
    /// `~`
    Tilde,
    /// `$`
    Dollar,
    /// `*`
    Asterisk,
    /// `:`
    Colon,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `,`
    Comma,
    /// `<`
    OpenAngle,
    /// `>`
    CloseAngle,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `?`
    Question,
    /// `<<`; the closing `>>` lexes as two [`Token::CloseAngle`]s so that
    /// nested generics such as `Map<K, List<V>>` close correctly
    AnnotationStart,
    /// `<|--`
    InheritsLeft,
    /// `--|>`
    InheritsRight,
    /// `..|>`
    RealizesRight,
    /// `<|..`
    RealizesLeft,
    /// `classDiagram`
    ClassDiagram,
    /// `class`
    Class,
    /// `note`
    Note,
    /// `for`
    For,
    /// `\n` or `\r\n`
    Newline,
    /// Run of spaces and tabs
    Whitespace,
    /// `%%` up to the end of the line
    Comment,
    /// `"..."` on a single line
    QuotedString,
    /// Identifier, optionally dotted (`System.String`)
    Word,
    /// Span no catalog entry recognized
    RawText,
}

impl Token {
    /// Whether the parser never sees this token
    pub fn is_trivia(self) -> bool {
        matches!(self, Token::Whitespace | Token::Comment)
    }

    /// Human readable description used in parse errors
    pub fn describe(self) -> &'static str {
        match self {
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Hash => "'#'",
            Token::Tilde => "'~'",
            Token::Dollar => "'$'",
            Token::Asterisk => "'*'",
            Token::Colon => "':'",
            Token::OpenBrace => "'{'",
            Token::CloseBrace => "'}'",
            Token::OpenParen => "'('",
            Token::CloseParen => "')'",
            Token::Comma => "','",
            Token::OpenAngle => "'<'",
            Token::CloseAngle => "'>'",
            Token::OpenBracket => "'['",
            Token::CloseBracket => "']'",
            Token::Question => "'?'",
            Token::AnnotationStart => "'<<'",
            Token::InheritsLeft => "'<|--'",
            Token::InheritsRight => "'--|>'",
            Token::RealizesRight => "'..|>'",
            Token::RealizesLeft => "'<|..'",
            Token::ClassDiagram => "'classDiagram'",
            Token::Class => "'class'",
            Token::Note => "'note'",
            Token::For => "'for'",
            Token::Newline => "newline",
            Token::Whitespace => "whitespace",
            Token::Comment => "comment",
            Token::QuotedString => "quoted string",
            Token::Word => "identifier",
            Token::RawText => "unrecognized text",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexed unit: where it starts, how long it is, and what it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPosition {
    /// Byte offset into the source
    pub offset: usize,
    /// Length in bytes
    pub len: usize,
    pub token: Token,
}

impl TokenPosition {
    pub fn new(offset: usize, len: usize, token: Token) -> Self {
        Self { offset, len, token }
    }

    /// Byte offset one past the end of the token
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The source text covered by this token
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.offset..self.end()]
    }
}

/// How a catalog entry recognizes its token
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Exact text
    Literal(&'static str),
    /// Custom scanner returning the matched byte length, 0 for no match
    Scan(fn(&str) -> usize),
}

impl Matcher {
    pub fn match_len(&self, source: &str) -> usize {
        match self {
            Matcher::Literal(text) => {
                if source.starts_with(text) {
                    text.len()
                } else {
                    0
                }
            }
            Matcher::Scan(scan) => scan(source),
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, Copy)]
pub struct TokenMatcher {
    pub token: Token,
    pub matcher: Matcher,
}

impl TokenMatcher {
    pub const fn literal(token: Token, text: &'static str) -> Self {
        Self {
            token,
            matcher: Matcher::Literal(text),
        }
    }

    pub const fn scan(token: Token, scan: fn(&str) -> usize) -> Self {
        Self {
            token,
            matcher: Matcher::Scan(scan),
        }
    }
}

/// Ordered set of token matchers
///
/// The longest match wins; on equal length the entry registered later wins.
/// Entries must therefore be registered from least to most specific: keywords
/// come after [`Token::Word`] so that `class` is a keyword while `classes` is
/// an identifier. Nothing checks this ordering, keep it when adding entries.
#[derive(Debug, Clone)]
pub struct TokenCatalog {
    entries: Vec<TokenMatcher>,
}

impl TokenCatalog {
    pub fn new(entries: Vec<TokenMatcher>) -> Self {
        Self { entries }
    }

    /// The catalog for the class diagram notation
    pub fn class_diagram() -> Self {
        Self::new(vec![
            TokenMatcher::scan(Token::Word, scan_word),
            TokenMatcher::scan(Token::Whitespace, scan_whitespace),
            TokenMatcher::literal(Token::Newline, "\n"),
            TokenMatcher::literal(Token::Newline, "\r\n"),
            TokenMatcher::literal(Token::Plus, "+"),
            TokenMatcher::literal(Token::Minus, "-"),
            TokenMatcher::literal(Token::Hash, "#"),
            TokenMatcher::literal(Token::Tilde, "~"),
            TokenMatcher::literal(Token::Dollar, "$"),
            TokenMatcher::literal(Token::Asterisk, "*"),
            TokenMatcher::literal(Token::Colon, ":"),
            TokenMatcher::literal(Token::OpenBrace, "{"),
            TokenMatcher::literal(Token::CloseBrace, "}"),
            TokenMatcher::literal(Token::OpenParen, "("),
            TokenMatcher::literal(Token::CloseParen, ")"),
            TokenMatcher::literal(Token::Comma, ","),
            TokenMatcher::literal(Token::OpenAngle, "<"),
            TokenMatcher::literal(Token::CloseAngle, ">"),
            TokenMatcher::literal(Token::OpenBracket, "["),
            TokenMatcher::literal(Token::CloseBracket, "]"),
            TokenMatcher::literal(Token::Question, "?"),
            TokenMatcher::literal(Token::AnnotationStart, "<<"),
            TokenMatcher::literal(Token::InheritsLeft, "<|--"),
            TokenMatcher::literal(Token::InheritsRight, "--|>"),
            TokenMatcher::literal(Token::RealizesRight, "..|>"),
            TokenMatcher::literal(Token::RealizesLeft, "<|.."),
            TokenMatcher::scan(Token::Comment, scan_comment),
            TokenMatcher::scan(Token::QuotedString, scan_quoted),
            TokenMatcher::literal(Token::ClassDiagram, "classDiagram"),
            TokenMatcher::literal(Token::Class, "class"),
            TokenMatcher::literal(Token::Note, "note"),
            TokenMatcher::literal(Token::For, "for"),
        ])
    }

    pub fn entries(&self) -> &[TokenMatcher] {
        &self.entries
    }

    /// Best matching token at the start of `source`, with its byte length
    pub fn best_match(&self, source: &str) -> Option<(Token, usize)> {
        let mut best: Option<(Token, usize)> = None;
        for entry in &self.entries {
            let len = entry.matcher.match_len(source);
            if len == 0 {
                continue;
            }
            match best {
                Some((_, best_len)) if len < best_len => {}
                _ => best = Some((entry.token, len)),
            }
        }
        best
    }
}

impl Default for TokenCatalog {
    fn default() -> Self {
        Self::class_diagram()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn scan_word(source: &str) -> usize {
    let mut len = 0;
    let mut chars = source.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if is_word_char(c) {
            len = idx + c.len_utf8();
            continue;
        }
        // Dots only join two word characters
        let joins = c == '.'
            && len > 0
            && len == idx
            && chars.peek().is_some_and(|&(_, next)| is_word_char(next));
        if !joins {
            break;
        }
    }
    len
}

fn scan_whitespace(source: &str) -> usize {
    source
        .find(|c: char| c != ' ' && c != '\t' && c != '\r')
        .unwrap_or(source.len())
}

fn scan_comment(source: &str) -> usize {
    if !source.starts_with("%%") {
        return 0;
    }
    let line_end = source.find('\n').unwrap_or(source.len());
    source[..line_end].trim_end_matches('\r').len()
}

fn scan_quoted(source: &str) -> usize {
    let Some(rest) = source.strip_prefix('"') else {
        return 0;
    };
    match rest.find(['"', '\n']) {
        Some(end) if rest[end..].starts_with('"') => end + 2,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best(source: &str) -> Option<(Token, usize)> {
        TokenCatalog::class_diagram().best_match(source)
    }

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(best("<|-- B"), Some((Token::InheritsLeft, 4)));
        assert_eq!(best("<<interface>>"), Some((Token::AnnotationStart, 2)));
        assert_eq!(best("<T>"), Some((Token::OpenAngle, 1)));
        assert_eq!(best(">> Shape"), Some((Token::CloseAngle, 1)));
        assert_eq!(best("..|> C"), Some((Token::RealizesRight, 4)));
        assert_eq!(best("--|> C"), Some((Token::InheritsRight, 4)));
        assert_eq!(best("-TestField"), Some((Token::Minus, 1)));
    }

    #[test]
    fn test_keyword_wins_tie_over_word() {
        assert_eq!(best("class A"), Some((Token::Class, 5)));
        assert_eq!(best("classDiagram\n"), Some((Token::ClassDiagram, 12)));
        assert_eq!(best("note \"x\""), Some((Token::Note, 4)));
    }

    #[test]
    fn test_longer_word_beats_keyword_prefix() {
        assert_eq!(best("classes"), Some((Token::Word, 7)));
        assert_eq!(best("notebook"), Some((Token::Word, 8)));
        assert_eq!(best("format"), Some((Token::Word, 6)));
    }

    #[test]
    fn test_word_scanning() {
        assert_eq!(scan_word("System.String x"), 13);
        assert_eq!(scan_word("Int32"), 5);
        assert_eq!(scan_word("_private"), 8);
        assert_eq!(scan_word("a..|>b"), 1);
        assert_eq!(scan_word("end."), 3);
        assert_eq!(scan_word(".leading"), 0);
        assert_eq!(scan_word("Größe "), "Größe".len());
    }

    #[test]
    fn test_whitespace_and_newlines() {
        assert_eq!(best("  \tA"), Some((Token::Whitespace, 3)));
        assert_eq!(best("\r\nA"), Some((Token::Newline, 2)));
        assert_eq!(best("\nA"), Some((Token::Newline, 1)));
    }

    #[test]
    fn test_comment_stops_at_line_end() {
        assert_eq!(best("%% hello\nclass"), Some((Token::Comment, 8)));
        assert_eq!(best("%% hello\r\nclass"), Some((Token::Comment, 8)));
        assert_eq!(best("%%"), Some((Token::Comment, 2)));
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(best("\"A, B not found\" x"), Some((Token::QuotedString, 16)));
        assert_eq!(scan_quoted("\"unterminated"), 0);
        assert_eq!(scan_quoted("\"broken\nline\""), 0);
    }

    #[test]
    fn test_array_and_nullable_suffixes() {
        assert_eq!(best("[] Ids"), Some((Token::OpenBracket, 1)));
        assert_eq!(best("] Ids"), Some((Token::CloseBracket, 1)));
        assert_eq!(best("? Label"), Some((Token::Question, 1)));
    }

    #[test]
    fn test_unmatched_character() {
        assert_eq!(best("@foo"), None);
        assert_eq!(best("|"), None);
    }

    #[test]
    fn test_token_position_text() {
        let source = "class A";
        let pos = TokenPosition::new(6, 1, Token::Word);
        assert_eq!(pos.text(source), "A");
        assert_eq!(pos.end(), 7);
    }
}
