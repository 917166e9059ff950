//! The wildcard-precedence matcher.
//!
//! Matching walks the query path depth-first against the trie. At every
//! node the branch order is fixed: the `_` wildcard first, then the exact
//! branch for the head token, then the `*` wildcard, and finally - when the
//! node itself is a wildcard branch - absorption of one more word at the
//! same node. That order makes the most specific registered rule win
//! whenever several paths could match, and it is the entire precedence
//! contract.
//!
//! Segment markers are ordinary branch keys here, so a wildcard can never
//! stand in for one: a search that absorbs a marker can no longer line up
//! the remaining markers and dies as a dead end.
//!
//! The whole walk is bounded by an absolute deadline checked at every
//! step. Running out of time fails the branch the same way a dead end
//! does; the caller sees an ordinary no-match.

use std::sync::Arc;
use std::time::{Duration, Instant};

use im::Vector;

use parley_foundation::{Error, Result, Segment, Token, query_path, word_split};

use crate::arena::NodeId;
use crate::branch::Branch;
use crate::graph::RuleGraph;

/// A successful match.
#[derive(Clone, Debug)]
pub struct Match {
    /// The winning terminal node.
    pub node: NodeId,
    /// The winning template markup.
    pub template: Arc<str>,
    /// Every source that contributed to the template.
    pub sources: Vec<Arc<str>>,
    /// Wildcard captures from the input segment, left to right.
    pub input_stars: Vec<String>,
    /// Wildcard captures from the that segment, left to right.
    pub that_stars: Vec<String>,
    /// Wildcard captures from the topic segment, left to right.
    pub topic_stars: Vec<String>,
    /// The pattern as walked, wildcards rendered as `*`/`_`.
    pub matched_pattern: String,
    /// The that part as walked.
    pub matched_that: String,
    /// The topic part as walked.
    pub matched_topic: String,
    /// The bot id as walked.
    pub matched_bot_id: String,
}

impl RuleGraph {
    /// Matches pre-split query words against the graph.
    ///
    /// Empty word lists match rules with `*` at that part. The search
    /// aborts once `timeout` has elapsed.
    ///
    /// # Errors
    /// Returns a no-match error when no registered path satisfies the
    /// query before the deadline; a timed-out search is indistinguishable
    /// from a genuine non-match.
    pub fn match_words(
        &self,
        input_words: &[&str],
        that_words: &[&str],
        topic_words: &[&str],
        bot_id: &str,
        timeout: Duration,
    ) -> Result<Match> {
        let query = query_path(input_words, that_words, topic_words, bot_id);
        let search = Search {
            graph: self,
            deadline: Instant::now() + timeout,
        };

        let candidate = search
            .walk(
                self.root(),
                self.root(),
                &query,
                Vector::new(),
                Vector::new(),
                Segment::Input,
            )
            .ok_or_else(|| Error::no_match(input_words.join(" ")))?;

        let rule = self.rule(candidate.node)?;
        Ok(Match {
            node: candidate.node,
            template: rule.template.clone(),
            sources: rule.sources.clone(),
            input_stars: candidate.input_stars,
            that_stars: candidate.that_stars,
            topic_stars: candidate.topic_stars,
            matched_pattern: candidate.pattern.unwrap_or_default(),
            matched_that: candidate.that.unwrap_or_default(),
            matched_topic: candidate.topic.unwrap_or_default(),
            matched_bot_id: candidate.bot_id.unwrap_or_default(),
        })
    }

    /// Convenience form: splits the query strings on whitespace and uses
    /// the configured response timeout.
    ///
    /// # Errors
    /// See [`match_words`](Self::match_words).
    pub fn match_input(
        &self,
        input: &str,
        that: &str,
        topic: &str,
        bot_id: &str,
    ) -> Result<Match> {
        self.match_words(
            &word_split(input),
            &word_split(that),
            &word_split(topic),
            bot_id,
            self.settings().response_timeout,
        )
    }
}

/// One successful path, assembled bottom-up as the recursion unwinds.
struct Candidate {
    node: NodeId,
    input_stars: Vec<String>,
    that_stars: Vec<String>,
    topic_stars: Vec<String>,
    pattern: Option<String>,
    that: Option<String>,
    topic: Option<String>,
    bot_id: Option<String>,
}

impl Candidate {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            input_stars: Vec::new(),
            that_stars: Vec::new(),
            topic_stars: Vec::new(),
            pattern: None,
            that: None,
            topic: None,
            bot_id: None,
        }
    }
}

/// A single deadline-bounded search over one graph.
struct Search<'graph> {
    graph: &'graph RuleGraph,
    deadline: Instant,
}

impl Search<'_> {
    /// The recursive walk.
    ///
    /// `absorbed` is the open wildcard's content so far; `walked` is the
    /// resolved text of the current segment. Both are persistent values, so
    /// sibling branches explored from one node never observe each other's
    /// state.
    fn walk(
        &self,
        node: NodeId,
        parent: NodeId,
        remaining: &[Token],
        absorbed: Vector<String>,
        walked: Vector<String>,
        segment: Segment,
    ) -> Option<Candidate> {
        if Instant::now() >= self.deadline {
            return None;
        }

        let current = self.graph.arena().get(node).ok()?;

        // No template under this node is close enough to reach.
        if remaining.len() < current.height {
            return None;
        }

        if remaining.is_empty() {
            if current.rule.is_some() {
                let mut found = Candidate::new(node);
                found.bot_id = Some(join_words(&walked));
                return Some(found);
            }
            return None;
        }

        let head = &remaining[0];
        let tail = &remaining[1..];

        // `_` comes first in the branch order.
        if let Some(&child) = current.children.get(&Branch::Underscore) {
            let opened = Vector::unit(head.as_text().to_string());
            if let Some(mut found) =
                self.walk(child, node, tail, opened, step(&walked, "_"), segment)
            {
                push_capture(&mut found, segment, &absorbed);
                return Some(found);
            }
        }

        // The exact branch for the head token. Markers transition the
        // segment state and close the open wildcard; ordinary words carry
        // it forward.
        if let Some(branch) = Branch::lookup(head, self.graph.words()) {
            if let Some(&child) = current.children.get(&branch) {
                if let Some(next) = next_segment(head) {
                    if let Some(mut found) =
                        self.walk(child, node, tail, Vector::new(), Vector::new(), next)
                    {
                        push_capture(&mut found, segment, &absorbed);
                        set_resolved(&mut found, segment, join_words(&walked));
                        return Some(found);
                    }
                } else if let Some(found) = self.walk(
                    child,
                    node,
                    tail,
                    absorbed.clone(),
                    step(&walked, head.as_text()),
                    segment,
                ) {
                    return Some(found);
                }
            }
        }

        // `*` is the most general branch, tried last.
        if let Some(&child) = current.children.get(&Branch::Star) {
            let opened = Vector::unit(head.as_text().to_string());
            if let Some(mut found) =
                self.walk(child, node, tail, opened, step(&walked, "*"), segment)
            {
                push_capture(&mut found, segment, &absorbed);
                return Some(found);
            }
        }

        // Already standing on a wildcard branch: absorb the head and retry
        // at the same node. This is what lets a wildcard span several words.
        let parent_node = self.graph.arena().get(parent).ok()?;
        let bound_to = |branch: Branch| parent_node.children.get(&branch).copied() == Some(node);
        if bound_to(Branch::Star) || bound_to(Branch::Underscore) {
            let mut extended = absorbed;
            extended.push_back(head.as_text().to_string());
            return self.walk(node, parent, tail, extended, walked, segment);
        }

        None
    }
}

/// Maps a marker token to the segment it opens.
fn next_segment(token: &Token) -> Option<Segment> {
    match token {
        Token::That => Some(Segment::That),
        Token::Topic => Some(Segment::Topic),
        Token::Bot => Some(Segment::BotId),
        _ => None,
    }
}

/// Prepends the closed wildcard's content to the segment's capture list.
fn push_capture(found: &mut Candidate, segment: Segment, absorbed: &Vector<String>) {
    if absorbed.is_empty() {
        return;
    }
    let content = join_words(absorbed);
    match segment {
        Segment::Input => found.input_stars.insert(0, content),
        Segment::That => found.that_stars.insert(0, content),
        Segment::Topic => found.topic_stars.insert(0, content),
        // Bot ids are single literal words; nothing can be captured there.
        Segment::BotId => {}
    }
}

/// Records the resolved text of a completed segment.
fn set_resolved(found: &mut Candidate, segment: Segment, text: String) {
    match segment {
        Segment::Input => found.pattern = Some(text),
        Segment::That => found.that = Some(text),
        Segment::Topic => found.topic = Some(text),
        Segment::BotId => {}
    }
}

fn step(walked: &Vector<String>, text: &str) -> Vector<String> {
    let mut next = walked.clone();
    next.push_back(text.to_string());
    next
}

fn join_words(words: &Vector<String>) -> String {
    words.iter().cloned().collect::<Vec<_>>().join(" ")
}
