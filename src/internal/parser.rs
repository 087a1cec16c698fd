//! Recursive-descent parser for the supported pattern grammar.
//!
//! Precedence, highest to lowest: grouping, atom, quantifier,
//! concatenation, alternation. Outside a character class the
//! metacharacters `^`, `-` and `]` are accepted as literals.

use std::collections::BTreeSet;

use crate::{Result, RgxError};

use super::{
    ast::{Ast, EMPTY_PATTERN},
    char_spec::WHITESPACE_CLASS,
    lexer::{tokenize, Token, TokenKind},
};

/// Parse a pattern into its AST.
pub(crate) fn parse(pattern: &str) -> Result<Ast> {
    let mut parser = Parser {
        tokens: tokenize(pattern),
        pos: 0,
    };
    let ast = parser.parse_expr()?;
    let trailing = parser.current();
    if trailing.kind != TokenKind::End {
        return Err(RgxError::parse(
            "unexpected token after expression",
            trailing.offset,
        ));
    }
    Ok(ast)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn current(&self) -> Token {
        self.tokens[self.pos]
    }

    fn peek(&self) -> Token {
        self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::End {
            self.pos += 1;
        }
        token
    }

    // expr := concat ('|' concat)*
    fn parse_expr(&mut self) -> Result<Ast> {
        let mut branches = vec![self.parse_concat()?];
        while self.current().kind == TokenKind::Pipe {
            self.bump();
            branches.push(self.parse_concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.swap_remove(0)
        } else {
            Ast::Alternation(branches)
        })
    }

    // concat := quantified+
    // An empty concat yields the empty-pattern sentinel.
    fn parse_concat(&mut self) -> Result<Ast> {
        let mut items = Vec::new();
        while self.at_atom_start() {
            items.push(self.parse_quantified()?);
        }
        Ok(match items.len() {
            0 => Ast::Literal(EMPTY_PATTERN),
            1 => items.swap_remove(0),
            _ => Ast::Concat(items),
        })
    }

    fn at_atom_start(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Literal
                | TokenKind::EscapedChar
                | TokenKind::Tab
                | TokenKind::Whitespace
                | TokenKind::Dot
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Caret
                | TokenKind::Hyphen
                | TokenKind::RBracket
        )
    }

    // quantified := atom ('*' | '+' | '?')?
    fn parse_quantified(&mut self) -> Result<Ast> {
        let atom = self.parse_atom()?;
        Ok(match self.current().kind {
            TokenKind::Star => {
                self.bump();
                Ast::Star(Box::new(atom))
            }
            TokenKind::Plus => {
                self.bump();
                Ast::Plus(Box::new(atom))
            }
            TokenKind::Question => {
                self.bump();
                Ast::Question(Box::new(atom))
            }
            _ => atom,
        })
    }

    fn parse_atom(&mut self) -> Result<Ast> {
        let token = self.current();
        match token.kind {
            // `^`, `-` and `]` are literals outside a character class.
            TokenKind::Literal | TokenKind::Caret | TokenKind::Hyphen | TokenKind::RBracket => {
                self.bump();
                Ok(Ast::Literal(token.ch))
            }
            TokenKind::EscapedChar => {
                self.bump();
                Ok(Ast::Escaped(token.ch))
            }
            TokenKind::Tab => {
                self.bump();
                Ok(Ast::Tab)
            }
            TokenKind::Whitespace => {
                self.bump();
                Ok(Ast::Whitespace)
            }
            TokenKind::Dot => {
                self.bump();
                Ok(Ast::AnyChar)
            }
            TokenKind::LParen => {
                let open = self.bump();
                let inner = self.parse_expr()?;
                if self.current().kind != TokenKind::RParen {
                    return Err(RgxError::parse("unmatched '('", open.offset));
                }
                self.bump();
                Ok(Ast::Group(Box::new(inner)))
            }
            TokenKind::LBracket => self.parse_char_class(),
            _ => Err(RgxError::parse("expected an atom", token.offset)),
        }
    }

    // charClass := '[' '^'? classItem+ ']'
    // classItem := classChar ('-' classChar)?
    //
    // The member set is fully enumerated here; ranges expand code point by
    // code point. `\s` contributes the whole whitespace class.
    fn parse_char_class(&mut self) -> Result<Ast> {
        let open = self.bump();
        let negated = if self.current().kind == TokenKind::Caret {
            self.bump();
            true
        } else {
            false
        };
        let mut set = BTreeSet::new();
        let mut saw_item = false;
        loop {
            match self.current().kind {
                TokenKind::RBracket => {
                    self.bump();
                    break;
                }
                TokenKind::End => {
                    return Err(RgxError::parse("unmatched '['", open.offset));
                }
                TokenKind::Whitespace => {
                    self.bump();
                    set.extend(WHITESPACE_CLASS);
                    saw_item = true;
                }
                _ => {
                    let lo = self.bump();
                    let is_range = self.current().kind == TokenKind::Hyphen
                        && !matches!(self.peek().kind, TokenKind::RBracket | TokenKind::End);
                    if is_range {
                        self.bump();
                        let hi = self.bump();
                        if lo.ch > hi.ch {
                            return Err(RgxError::parse(
                                format!(
                                    "descending range '{}-{}'",
                                    lo.ch.escape_default(),
                                    hi.ch.escape_default()
                                ),
                                lo.offset,
                            ));
                        }
                        set.extend(lo.ch..=hi.ch);
                    } else {
                        set.insert(lo.ch);
                    }
                    saw_item = true;
                }
            }
        }
        if !saw_item {
            return Err(RgxError::parse("empty character class", open.offset));
        }
        Ok(if negated {
            Ast::NegatedCharClass(set)
        } else {
            Ast::CharClass(set)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RgxErrorKind;

    fn parse_err(pattern: &str) -> (String, usize) {
        match *parse(pattern).unwrap_err().source {
            RgxErrorKind::ParseError { message, position } => (message, position),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_pattern_is_the_sentinel() {
        assert_eq!(parse("").unwrap(), Ast::Literal(EMPTY_PATTERN));
    }

    #[test]
    fn test_concat_is_left_to_right() {
        assert_eq!(
            parse("abc").unwrap(),
            Ast::Concat(vec![Ast::Literal('a'), Ast::Literal('b'), Ast::Literal('c')])
        );
    }

    #[test]
    fn test_alternation_binds_weaker_than_concat() {
        assert_eq!(
            parse("ab|c").unwrap(),
            Ast::Alternation(vec![
                Ast::Concat(vec![Ast::Literal('a'), Ast::Literal('b')]),
                Ast::Literal('c'),
            ])
        );
    }

    #[test]
    fn test_quantifier_binds_to_the_preceding_atom() {
        assert_eq!(
            parse("ab*").unwrap(),
            Ast::Concat(vec![
                Ast::Literal('a'),
                Ast::Star(Box::new(Ast::Literal('b'))),
            ])
        );
    }

    #[test]
    fn test_group_is_an_atom() {
        assert_eq!(
            parse("(ab)+").unwrap(),
            Ast::Plus(Box::new(Ast::Group(Box::new(Ast::Concat(vec![
                Ast::Literal('a'),
                Ast::Literal('b'),
            ])))))
        );
    }

    #[test]
    fn test_empty_alternation_branch_is_the_sentinel() {
        assert_eq!(
            parse("a|").unwrap(),
            Ast::Alternation(vec![Ast::Literal('a'), Ast::Literal(EMPTY_PATTERN)])
        );
    }

    #[test]
    fn test_class_with_range() {
        let expected: BTreeSet<char> = ('a'..='c').collect();
        assert_eq!(parse("[a-c]").unwrap(), Ast::CharClass(expected));
    }

    #[test]
    fn test_class_mixes_members_and_ranges() {
        let expected: BTreeSet<char> = ('0'..='9').chain(['x', '_']).collect();
        assert_eq!(parse("[x0-9_]").unwrap(), Ast::CharClass(expected));
    }

    #[test]
    fn test_negated_class() {
        assert_eq!(
            parse("[^ab]").unwrap(),
            Ast::NegatedCharClass(BTreeSet::from(['a', 'b']))
        );
    }

    #[test]
    fn test_caret_inside_class_body_is_a_member() {
        assert_eq!(
            parse("[a^]").unwrap(),
            Ast::CharClass(BTreeSet::from(['a', '^']))
        );
    }

    #[test]
    fn test_trailing_hyphen_is_a_member() {
        assert_eq!(
            parse("[a-]").unwrap(),
            Ast::CharClass(BTreeSet::from(['a', '-']))
        );
    }

    #[test]
    fn test_whitespace_escape_in_class_contributes_the_full_class() {
        assert_eq!(
            parse(r"[\sx]").unwrap(),
            Ast::CharClass(WHITESPACE_CLASS.iter().copied().chain(['x']).collect())
        );
    }

    #[test]
    fn test_unicode_range_enumerates_code_points() {
        assert_eq!(
            parse("[α-γ]").unwrap(),
            Ast::CharClass(BTreeSet::from(['α', 'β', 'γ']))
        );
    }

    #[test]
    fn test_metacharacter_literals_outside_class() {
        assert_eq!(
            parse("a^b-c]").unwrap(),
            Ast::Concat(vec![
                Ast::Literal('a'),
                Ast::Literal('^'),
                Ast::Literal('b'),
                Ast::Literal('-'),
                Ast::Literal('c'),
                Ast::Literal(']'),
            ])
        );
    }

    #[test]
    fn test_unmatched_paren() {
        let (message, position) = parse_err("a(bc");
        assert!(message.contains("unmatched '('"));
        assert_eq!(position, 1);
    }

    #[test]
    fn test_unmatched_bracket() {
        let (message, position) = parse_err("ab[cd");
        assert!(message.contains("unmatched '['"));
        assert_eq!(position, 2);
    }

    #[test]
    fn test_empty_class_is_an_error() {
        let (message, position) = parse_err("a[]");
        assert!(message.contains("empty character class"));
        assert_eq!(position, 1);
    }

    #[test]
    fn test_descending_range_is_an_error() {
        let (message, position) = parse_err("[z-a]");
        assert!(message.contains("descending range"));
        assert_eq!(position, 1);
    }

    #[test]
    fn test_trailing_garbage_is_an_error() {
        let (message, position) = parse_err("a)b");
        assert!(message.contains("unexpected token"));
        assert_eq!(position, 1);

        let (_, position) = parse_err("a**");
        assert_eq!(position, 2);
    }
}
