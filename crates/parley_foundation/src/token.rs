//! Path tokens and path assembly.
//!
//! A rule is addressed by one flat token sequence: its pattern words, a
//! `<that>` marker, the prior-response words, a `<topic>` marker, the topic
//! words, a `<botid>` marker, and finally the bot identity word. The markers
//! are structural; they never appear as rule content. Queries are assembled
//! through the same routine so the matcher walks rule and query paths with
//! identical token semantics.

use std::fmt;

/// One element of a rule or query path.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Token {
    /// A literal word.
    Word(String),
    /// The `*` wildcard. Tried after literal branches; absorbs one or more
    /// words.
    Star,
    /// The `_` wildcard. Tried before literal branches; absorbs one or more
    /// words.
    Underscore,
    /// The `<that>` segment marker.
    That,
    /// The `<topic>` segment marker.
    Topic,
    /// The `<botid>` segment marker.
    Bot,
}

impl Token {
    /// Converts one whitespace-split word into a token.
    ///
    /// The words `*` and `_` denote wildcards; everything else is literal.
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        match word {
            "*" => Self::Star,
            "_" => Self::Underscore,
            _ => Self::Word(word.to_string()),
        }
    }

    /// Returns true if this token is one of the three segment markers.
    #[must_use]
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::That | Self::Topic | Self::Bot)
    }

    /// Renders the token the way it appears in rule text.
    ///
    /// Wildcards render as `*` and `_`; markers render in angle brackets.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Word(w) => w,
            Self::Star => "*",
            Self::Underscore => "_",
            Self::That => "<that>",
            Self::Topic => "<topic>",
            Self::Bot => "<botid>",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Which part of the path a search is currently walking.
///
/// Transitions happen only at marker tokens, in fixed order:
/// input → that → topic → bot id.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    /// Matching the input-pattern part of the path.
    Input,
    /// Matching the prior-response part of the path.
    That,
    /// Matching the topic part of the path.
    Topic,
    /// Matching the bot-identity part of the path.
    BotId,
}

/// Splits text into words on whitespace.
///
/// Empty input produces an empty vector; runs of whitespace collapse.
#[must_use]
pub fn word_split(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Assembles the flat path for a rule from its four addressing parts.
///
/// Empty pattern/that/topic parts become a single `*` token, so a rule that
/// leaves a part unspecified matches anything there.
#[must_use]
pub fn rule_path(pattern: &str, that: &str, topic: &str, bot_id: &str) -> Vec<Token> {
    assemble_path(
        &word_split(pattern),
        &word_split(that),
        &word_split(topic),
        bot_id,
    )
}

/// Assembles the flat path for a query from pre-split word lists.
///
/// Shares the rule-path shape: empty segments are filled with a single `*`,
/// which a stored `*` branch matches literally.
#[must_use]
pub fn query_path(
    input_words: &[&str],
    that_words: &[&str],
    topic_words: &[&str],
    bot_id: &str,
) -> Vec<Token> {
    assemble_path(input_words, that_words, topic_words, bot_id)
}

fn assemble_path(input: &[&str], that: &[&str], topic: &[&str], bot_id: &str) -> Vec<Token> {
    let mut path = Vec::with_capacity(input.len() + that.len() + topic.len() + 4);

    push_segment(&mut path, input);
    path.push(Token::That);
    push_segment(&mut path, that);
    path.push(Token::Topic);
    push_segment(&mut path, topic);
    path.push(Token::Bot);
    path.push(Token::Word(bot_id.to_string()));

    path
}

fn push_segment(path: &mut Vec<Token>, words: &[&str]) {
    if words.is_empty() {
        path.push(Token::Star);
    } else {
        path.extend(words.iter().map(|w| Token::from_word(w)));
    }
}
