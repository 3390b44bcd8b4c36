//! Query parsing.
//!
//! Turns a query string into a [`QueryNode`] tree. The grammar, informally:
//!
//! ```text
//! query   := or
//! or      := and ( "OR" and )*
//! and     := not+                      (adjacency is implicit AND; "AND" accepted)
//! not     := ( "NOT" | "-" ) not | primary
//! primary := "(" or ")" | quoted | word
//! ```
//!
//! - `"a b"` is a phrase: its tokenized terms must be positionally adjacent.
//! - `term~` / `term~2` marks typo tolerance (max edit distance; bare `~` = 1).
//! - `field:term` and `field:"a b"` restrict a clause to one indexed field.
//! - `NOT` binds tightest, then AND, then `OR`. `-term` is shorthand for
//!   `NOT term`. Operators are recognized in upper case only.
//!
//! Every literal is tokenized through the exact pipeline the index was built
//! with. A word that tokenizes into several terms (hyphenation, CJK n-grams)
//! becomes a phrase; a word that tokenizes to nothing (a stop word) is
//! dropped from its clause. Dropping is not an error - but an operator left
//! with no operand at all is, with the byte position attached.

use crate::error::{ConfigError, QuerySyntaxError};
use crate::fuzzy::MAX_TOLERANCE;
use crate::tokenizer::{tokenize_terms, TokenizerConfig};
use crate::types::Index;

/// A parsed query: a tree of term/phrase leaves under boolean combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// Match one term, optionally within an edit-distance tolerance,
    /// optionally restricted to one field.
    Term {
        term: String,
        tolerance: u8,
        field: Option<String>,
    },
    /// Match consecutive terms in order (positions adjacent, same field).
    Phrase {
        terms: Vec<String>,
        field: Option<String>,
    },
    /// All children must match; scores sum.
    And(Vec<QueryNode>),
    /// Any child may match; scores sum.
    Or(Vec<QueryNode>),
    /// Matches every document the child does not.
    Not(Box<QueryNode>),
}

impl QueryNode {
    /// An empty query - matches nothing.
    pub fn empty() -> Self {
        QueryNode::And(Vec::new())
    }

    /// True if this tree can never match anything.
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryNode::And(c) if c.is_empty())
    }
}

// =============================================================================
// LEXER
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Word { text: String, pos: usize },
    Quoted { text: String, pos: usize },
    Or { pos: usize },
    And { pos: usize },
    Not { pos: usize },
    Minus { pos: usize },
    LParen { pos: usize },
    RParen { pos: usize },
}

fn lex(query: &str) -> Result<Vec<Tok>, QuerySyntaxError> {
    let mut toks = Vec::new();
    let mut chars = query.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                toks.push(Tok::LParen { pos });
            }
            ')' => {
                chars.next();
                toks.push(Tok::RParen { pos });
            }
            '-' => {
                chars.next();
                toks.push(Tok::Minus { pos });
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, qc)) = chars.next() {
                    match qc {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                text.push(escaped);
                            }
                        }
                        _ => text.push(qc),
                    }
                }
                if !closed {
                    return Err(QuerySyntaxError::UnbalancedQuote { position: pos });
                }
                toks.push(Tok::Quoted { text, pos });
            }
            _ => {
                let mut text = String::new();
                while let Some(&(_, wc)) = chars.peek() {
                    if wc.is_whitespace() || matches!(wc, '(' | ')' | '"') {
                        break;
                    }
                    text.push(wc);
                    chars.next();
                }
                match text.as_str() {
                    "OR" => toks.push(Tok::Or { pos }),
                    "AND" => toks.push(Tok::And { pos }),
                    "NOT" => toks.push(Tok::Not { pos }),
                    _ => toks.push(Tok::Word { text, pos }),
                }
            }
        }
    }
    Ok(toks)
}

// =============================================================================
// PARSER
// =============================================================================

struct Parser<'a> {
    toks: Vec<Tok>,
    cursor: usize,
    tokenizer: &'a TokenizerConfig,
}

/// Parse a query string against the tokenizer configuration the target index
/// was built with.
///
/// An all-stop-word or whitespace-only query parses to [`QueryNode::empty`],
/// which executes to an empty result list - only structural problems are
/// errors.
pub fn parse(query: &str, tokenizer: &TokenizerConfig) -> Result<QueryNode, QuerySyntaxError> {
    let toks = lex(query)?;
    let mut parser = Parser {
        toks,
        cursor: 0,
        tokenizer,
    };
    let node = parser.parse_or()?;
    // Anything left over can only be a stray ')'.
    if let Some(Tok::RParen { pos }) = parser.peek() {
        return Err(QuerySyntaxError::UnexpectedParen { position: *pos });
    }
    Ok(node.unwrap_or_else(QueryNode::empty))
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.cursor)
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn at_clause_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Tok::Word { .. }
                    | Tok::Quoted { .. }
                    | Tok::Minus { .. }
                    | Tok::Not { .. }
                    | Tok::LParen { .. }
            )
        )
    }

    fn parse_or(&mut self) -> Result<Option<QueryNode>, QuerySyntaxError> {
        let (first, saw_first) = self.parse_and()?;
        let mut children: Vec<QueryNode> = first.into_iter().collect();
        let mut saw_any = saw_first;

        while let Some(Tok::Or { pos }) = self.peek() {
            let pos = *pos;
            if !saw_any {
                // "OR x" - nothing on the left.
                return Err(QuerySyntaxError::EmptyClause { position: pos });
            }
            self.bump();
            let (rhs, saw_rhs) = self.parse_and()?;
            if !saw_rhs {
                return Err(QuerySyntaxError::EmptyClause { position: pos });
            }
            children.extend(rhs);
            saw_any = true;
        }

        Ok(match children.len() {
            0 => None,
            1 => Some(children.pop().unwrap_or_else(QueryNode::empty)),
            _ => Some(QueryNode::Or(children)),
        })
    }

    /// Returns the AND group plus whether any clause *tokens* were seen -
    /// a group whose clauses were all tokenizer-dropped is `(None, true)`,
    /// which is fine; `(None, false)` next to an operator is a syntax error
    /// the caller reports.
    fn parse_and(&mut self) -> Result<(Option<QueryNode>, bool), QuerySyntaxError> {
        let mut children = Vec::new();
        let mut saw_clause = false;

        loop {
            if self.at_clause_start() {
                saw_clause = true;
                if let Some(node) = self.parse_not()? {
                    children.push(node);
                }
            } else if let Some(Tok::And { pos }) = self.peek() {
                let pos = *pos;
                if !saw_clause {
                    return Err(QuerySyntaxError::EmptyClause { position: pos });
                }
                self.bump();
                if !self.at_clause_start() {
                    return Err(QuerySyntaxError::EmptyClause { position: pos });
                }
            } else {
                break;
            }
        }

        let node = match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(QueryNode::And(children)),
        };
        Ok((node, saw_clause))
    }

    fn parse_not(&mut self) -> Result<Option<QueryNode>, QuerySyntaxError> {
        match self.peek() {
            Some(Tok::Not { pos } | Tok::Minus { pos }) => {
                let pos = *pos;
                self.bump();
                if !self.at_clause_start() {
                    return Err(QuerySyntaxError::EmptyClause { position: pos });
                }
                // A negated stop word drops the whole negation.
                Ok(self.parse_not()?.map(|child| QueryNode::Not(Box::new(child))))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Option<QueryNode>, QuerySyntaxError> {
        match self.bump() {
            Some(Tok::LParen { pos }) => {
                let inner = self.parse_or()?;
                match self.bump() {
                    Some(Tok::RParen { .. }) => Ok(inner),
                    _ => Err(QuerySyntaxError::UnclosedParen { position: pos }),
                }
            }
            Some(Tok::Quoted { text, .. }) => Ok(self.make_phrase(&text, None)),
            Some(Tok::Word { text, pos }) => self.parse_word(&text, pos),
            // parse_primary is only entered at a clause start.
            _ => Ok(None),
        }
    }

    fn parse_word(
        &mut self,
        text: &str,
        pos: usize,
    ) -> Result<Option<QueryNode>, QuerySyntaxError> {
        // Tolerance marker comes off first: field:term~2 ends with ~2.
        let (base, tolerance) = match text.rfind('~') {
            Some(idx) => {
                let marker = &text[idx + 1..];
                let tolerance = match marker {
                    "" => 1,
                    "0" => 0,
                    "1" => 1,
                    "2" => 2,
                    _ => {
                        return Err(QuerySyntaxError::BadTolerance {
                            position: pos + idx,
                            found: marker.to_string(),
                        })
                    }
                };
                (&text[..idx], tolerance.min(MAX_TOLERANCE))
            }
            None => (text, 0),
        };

        // Field restriction: "title:fox" or "title:" followed by a phrase.
        let (field, rest) = match base.find(':') {
            Some(colon) if colon > 0 => {
                let field = base[..colon].to_string();
                let rest = &base[colon + 1..];
                if rest.is_empty() {
                    if matches!(self.peek(), Some(Tok::Quoted { .. })) {
                        if let Some(Tok::Quoted { text, .. }) = self.bump() {
                            return Ok(self.make_phrase(&text, Some(field)));
                        }
                    }
                    return Err(QuerySyntaxError::EmptyClause {
                        position: pos + colon,
                    });
                }
                (Some(field), rest)
            }
            _ => (None, base),
        };

        if rest.is_empty() {
            // A bare "~" or "~2": nothing to match, nothing to report.
            return Ok(None);
        }

        let terms = tokenize_terms(rest, self.tokenizer);
        Ok(match terms.len() {
            0 => None,
            1 => Some(QueryNode::Term {
                term: terms.into_iter().next().unwrap_or_default(),
                tolerance,
                field,
            }),
            // Multi-term words (hyphenation, CJK grams) need adjacency, which
            // is exactly what a phrase checks. Tolerance does not survive the
            // split - fuzzy phrases are not a thing here.
            _ => Some(QueryNode::Phrase { terms, field }),
        })
    }

    fn make_phrase(&self, text: &str, field: Option<String>) -> Option<QueryNode> {
        let terms = tokenize_terms(text, self.tokenizer);
        match terms.len() {
            0 => None,
            1 => Some(QueryNode::Term {
                term: terms.into_iter().next().unwrap_or_default(),
                tolerance: 0,
                field,
            }),
            _ => Some(QueryNode::Phrase { terms, field }),
        }
    }
}

/// Check every field restriction in the tree against the index.
///
/// Field names are configuration, so a bad one is a [`ConfigError`], not a
/// syntax error - the query was well-formed, it just asked for a field the
/// index was never built with.
pub fn validate_fields(node: &QueryNode, index: &Index) -> Result<(), ConfigError> {
    match node {
        QueryNode::Term { field, .. } | QueryNode::Phrase { field, .. } => {
            if let Some(name) = field {
                if index.field_ordinal(name).is_none() {
                    return Err(ConfigError::UnknownField {
                        field: name.clone(),
                    });
                }
            }
            Ok(())
        }
        QueryNode::And(children) | QueryNode::Or(children) => {
            children.iter().try_for_each(|c| validate_fields(c, index))
        }
        QueryNode::Not(child) => validate_fields(child, index),
    }
}
