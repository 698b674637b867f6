use thiserror::Error;

use crate::ast::*;

/// Tokens in source file
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
enum Token {
    Left,
    Right,
    Add,
    Subtract,
    Input,
    Output,
    BeginLoop,
    EndLoop,
}

/// Parses source code, producing a stream of tokens.
fn lexer(source_code: &'_ [u8]) -> impl Iterator<Item = (usize, Token)> + '_ {
    // Tokenise and discard comments
    source_code
        .iter()
        .enumerate() // For keeping track of source location
        .filter_map(|(pos, c)| match c {
            b'<' => Some((pos, Token::Left)),
            b'>' => Some((pos, Token::Right)),
            b'+' => Some((pos, Token::Add)),
            b'-' => Some((pos, Token::Subtract)),
            b'.' => Some((pos, Token::Output)),
            b',' => Some((pos, Token::Input)),
            b'[' => Some((pos, Token::BeginLoop)),
            b']' => Some((pos, Token::EndLoop)),
            _ => None,
        })
}

/// Keeps track of parser state. The parser has a stack of these for dealing
/// with loops.
#[derive(Debug)]
struct ParseState {
    /// Where the `[` of this loop was (0 for the top level)
    pub start: usize,
    /// Nodes parsed so far in the current context
    pub nodes: Vec<Node>,
}

impl ParseState {
    fn new(start: usize) -> Self {
        Self {
            start,
            nodes: vec![],
        }
    }
}

/// Errors during parsing
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ParseError {
    /// To many `[` encountered.
    #[error("Too many start of loops ([) encountered, last unmatched at {0}")]
    TooManyStartLoop(usize),
    /// To many `]` encountered.
    #[error("Too many end of loops (]) encountered at {0}")]
    TooManyEndLoop(usize),
}

/// Build the primitive instruction tree.
fn build_ast(tokens: impl Iterator<Item = (usize, Token)>) -> Result<Vec<Node>, ParseError> {
    // This is a stack of parser state. We use a stack to be able to handle loops.
    let mut parse_stack = vec![ParseState::new(0)];

    for (pos, token) in tokens {
        let opcode = match token {
            Token::Left => Opcode::Left,
            Token::Right => Opcode::Right,
            Token::Add => Opcode::Increment,
            Token::Subtract => Opcode::Decrement,
            Token::Input => Opcode::Input,
            Token::Output => Opcode::Output,
            Token::BeginLoop => {
                parse_stack.push(ParseState::new(pos));
                continue;
            }
            Token::EndLoop => {
                if parse_stack.len() == 1 {
                    return Err(ParseError::TooManyEndLoop(pos));
                }
                // Cannot fail, checked above
                let Some(body) = parse_stack.pop() else {
                    unreachable!();
                };
                let loop_node = Node::new_loop(body.nodes, Span::new(body.start, pos + 1));
                if let Some(outer) = parse_stack.last_mut() {
                    outer.nodes.push(loop_node);
                }
                continue;
            }
        };
        if let Some(cstate) = parse_stack.last_mut() {
            cstate.nodes.push(Node::new(opcode, Span::at(pos)));
        }
    }
    if parse_stack.len() != 1 {
        let start = parse_stack.last().map(|s| s.start).unwrap_or_default();
        return Err(ParseError::TooManyStartLoop(start));
    }
    Ok(parse_stack.pop().map(|s| s.nodes).unwrap_or_default())
}

/// Parse source code into the primitive instruction tree
pub fn parse_source(source_code: &[u8]) -> Result<Vec<Node>, ParseError> {
    // Tokenise and discard unknown tokens
    let tokens = lexer(source_code);
    // Convert token stream to AST
    build_ast(tokens)
}

#[cfg(test)]
mod tests {
    use super::ParseError;
    use crate::ast::*;

    #[test]
    fn simple_parse() {
        super::parse_source(b"++>->,>.").unwrap();
        super::parse_source(b"++>->,>.>[-]").unwrap();
        super::parse_source(b"++>->,>.>[-[+>]]").unwrap();

        assert_eq!(
            super::parse_source(b"++>->,>.>[-]]"),
            Err(ParseError::TooManyEndLoop(12))
        );
        assert_eq!(
            super::parse_source(b"++>->,>.>[-]["),
            Err(ParseError::TooManyStartLoop(12))
        );
    }

    #[test]
    fn test_comments_and_spans() {
        let ast = super::parse_source(b"a+ [-]\n.").unwrap();
        assert_eq!(
            ast,
            vec![
                Node::new(Opcode::Increment, Span::new(1, 2)),
                Node::new_loop(
                    vec![Node::new(Opcode::Decrement, Span::new(4, 5))],
                    Span::new(3, 6)
                ),
                Node::new(Opcode::Output, Span::new(7, 8)),
            ]
        );
    }

    #[test]
    fn test_only_primitives() {
        fn check(nodes: &[Node]) {
            for n in nodes {
                assert!(n.opcode.is_primitive());
                if let Opcode::Loop(ref body) = n.opcode {
                    check(body);
                }
            }
        }
        check(&super::parse_source(b"+[>[-<+>]<,.]").unwrap());
    }
}
