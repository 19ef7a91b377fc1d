use crate::alang::{is_symbol_char, AlangRegex, AlangTree};
use crate::parser::{ParseError, ParseErrorKind};
use std::rc::Rc;

/// LL(1) recursive descent over a byte-offset cursor, one function per
/// precedence level. Every function leaves the cursor on the first character
/// it does not consume.
pub(super) fn parse(input: &str) -> Result<AlangRegex, ParseError> {
    let mut cursor = Cursor { input, pos: 0 };
    cursor.skip_whitespace();
    if cursor.at_end() {
        return Err(error(ParseErrorKind::EmptyInput, cursor.pos));
    }
    let tree = union(&mut cursor)?;
    cursor.skip_whitespace();
    match cursor.peek() {
        None => Ok(AlangRegex { tree }),
        Some(')') => Err(error(
            ParseErrorKind::UnexpectedClosingParenthesis,
            cursor.pos,
        )),
        // With this grammar every other character either extends the
        // expression or fails deeper down, so this arm is unreachable in
        // practice
        Some(_) => Err(error(
            ParseErrorKind::ExpectedBeginExpressionOrEoi,
            cursor.pos,
        )),
    }
}

fn error(kind: ParseErrorKind, offset: usize) -> ParseError {
    ParseError { kind, offset }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '|' | '&' | '-' | '?' | '*' | '+' | '~')
}

fn union(cursor: &mut Cursor) -> Result<AlangTree, ParseError> {
    let mut tree = difference(cursor)?;
    loop {
        cursor.skip_whitespace();
        if cursor.peek() != Some('|') {
            return Ok(tree);
        }
        cursor.bump();
        let rhs = infix_operand(cursor, difference)?;
        tree = AlangTree::Union(Box::new(tree), Box::new(rhs));
    }
}

fn difference(cursor: &mut Cursor) -> Result<AlangTree, ParseError> {
    let mut tree = intersection(cursor)?;
    loop {
        cursor.skip_whitespace();
        if cursor.peek() != Some('-') {
            return Ok(tree);
        }
        cursor.bump();
        let rhs = infix_operand(cursor, intersection)?;
        tree = AlangTree::Difference(Box::new(tree), Box::new(rhs));
    }
}

fn intersection(cursor: &mut Cursor) -> Result<AlangTree, ParseError> {
    let mut tree = concatenation(cursor)?;
    loop {
        cursor.skip_whitespace();
        if cursor.peek() != Some('&') {
            return Ok(tree);
        }
        cursor.bump();
        let rhs = infix_operand(cursor, concatenation)?;
        tree = AlangTree::Intersection(Box::new(tree), Box::new(rhs));
    }
}

/// Parses the right operand of an infix operator the cursor just passed.
/// Reports `missing-right-operand` at the position right after the operator
/// if what follows cannot begin an operand; anything deeper fails with its
/// own error.
fn infix_operand(
    cursor: &mut Cursor,
    next: fn(&mut Cursor) -> Result<AlangTree, ParseError>,
) -> Result<AlangTree, ParseError> {
    let after_operator = cursor.pos;
    cursor.skip_whitespace();
    match cursor.peek() {
        None | Some(')') => Err(error(ParseErrorKind::MissingRightOperand, after_operator)),
        Some(c) if is_operator_char(c) => {
            Err(error(ParseErrorKind::MissingRightOperand, after_operator))
        }
        Some(_) => next(cursor),
    }
}

fn concatenation(cursor: &mut Cursor) -> Result<AlangTree, ParseError> {
    let mut tree = unary(cursor)?;
    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            Some('(') | Some('.') => {}
            Some(c) if is_symbol_char(c) => {}
            _ => return Ok(tree),
        }
        let rhs = unary(cursor)?;
        tree = AlangTree::Concatenation(Box::new(tree), Box::new(rhs));
    }
}

fn unary(cursor: &mut Cursor) -> Result<AlangTree, ParseError> {
    let mut tree = primary(cursor)?;
    loop {
        cursor.skip_whitespace();
        let wrap = match cursor.peek() {
            Some('?') => AlangTree::Option,
            Some('*') => AlangTree::KleeneStar,
            Some('+') => AlangTree::KleenePlus,
            Some('~') => AlangTree::Complement,
            _ => return Ok(tree),
        };
        cursor.bump();
        tree = wrap(Box::new(tree));
    }
}

fn primary(cursor: &mut Cursor) -> Result<AlangTree, ParseError> {
    cursor.skip_whitespace();
    match cursor.peek() {
        Some('(') => {
            let open = cursor.pos;
            cursor.bump();
            cursor.skip_whitespace();
            match cursor.peek() {
                // `()` is the empty-language literal, not an empty group
                Some(')') => {
                    cursor.bump();
                    Ok(AlangTree::EmptyLang)
                }
                None => Err(error(ParseErrorKind::MissingClosingParenthesis, open + 1)),
                Some(_) => {
                    let tree = union(cursor)?;
                    cursor.skip_whitespace();
                    match cursor.peek() {
                        Some(')') => {
                            cursor.bump();
                            Ok(tree)
                        }
                        _ => Err(error(ParseErrorKind::MissingClosingParenthesis, open + 1)),
                    }
                }
            }
        }
        Some('.') => {
            cursor.bump();
            Ok(AlangTree::Wildcard)
        }
        Some(')') => Err(error(
            ParseErrorKind::UnexpectedClosingParenthesis,
            cursor.pos,
        )),
        Some(c) if is_operator_char(c) => {
            Err(error(ParseErrorKind::UnexpectedOperator, cursor.pos))
        }
        Some(_) => {
            let start = cursor.pos;
            while cursor.peek().is_some_and(is_symbol_char) {
                cursor.bump();
            }
            Ok(AlangTree::Symbol(Rc::from(&cursor.input[start..cursor.pos])))
        }
        // Callers only enter a primary when a token is present
        None => Err(error(
            ParseErrorKind::ExpectedBeginExpressionOrEoi,
            cursor.pos,
        )),
    }
}
