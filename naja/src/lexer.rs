//! Turns Naja source text into a `LexemeStream`.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, anychar, digit1},
    combinator::{map, map_opt, recognize},
    multi::many0,
    sequence::pair,
    IResult,
};
use parsegen::{Lexeme, LexemeStream};
use tracing::debug;

use crate::error::{CompileError, Result};

/// Lexeme categories of the Naja language. `name` is what grammar terminals
/// refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Def,
    As,
    Int,
    Return,
    Not,
    Identifier,
    IntLiteral,
    ParenOpen,
    ParenClose,
    Colon,
    Plus,
    Minus,
    Multiply,
    Divide,
    BitwiseComplement,
    NewLine,
    Tab,
    /// Four spaces at the start of a line.
    Indent,
    Space,
}

impl Category {
    pub const ALL: [Category; 19] = [
        Category::Def,
        Category::As,
        Category::Int,
        Category::Return,
        Category::Not,
        Category::Identifier,
        Category::IntLiteral,
        Category::ParenOpen,
        Category::ParenClose,
        Category::Colon,
        Category::Plus,
        Category::Minus,
        Category::Multiply,
        Category::Divide,
        Category::BitwiseComplement,
        Category::NewLine,
        Category::Tab,
        Category::Indent,
        Category::Space,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Def => "Def",
            Category::As => "As",
            Category::Int => "Int",
            Category::Return => "Return",
            Category::Not => "Not",
            Category::Identifier => "Identifier",
            Category::IntLiteral => "IntLiteral",
            Category::ParenOpen => "ParenOpen",
            Category::ParenClose => "ParenClose",
            Category::Colon => "Colon",
            Category::Plus => "Plus",
            Category::Minus => "Minus",
            Category::Multiply => "Multiply",
            Category::Divide => "Divide",
            Category::BitwiseComplement => "BitwiseComplement",
            Category::NewLine => "NewLine",
            Category::Tab => "Tab",
            Category::Indent => "Indent",
            Category::Space => "Space",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Categories the parser skips over.
    pub fn is_insignificant(self) -> bool {
        self == Category::Space
    }

    fn keyword(word: &str) -> Option<Category> {
        match word {
            "def" => Some(Category::Def),
            "as" => Some(Category::As),
            "int" => Some(Category::Int),
            "return" => Some(Category::Return),
            "not" => Some(Category::Not),
            _ => None,
        }
    }

    fn punctuation(c: char) -> Option<Category> {
        match c {
            '(' => Some(Category::ParenOpen),
            ')' => Some(Category::ParenClose),
            ':' => Some(Category::Colon),
            '+' => Some(Category::Plus),
            '-' => Some(Category::Minus),
            '*' => Some(Category::Multiply),
            '/' => Some(Category::Divide),
            '~' => Some(Category::BitwiseComplement),
            _ => None,
        }
    }
}

type Lexed<'a> = IResult<&'a str, (Category, &'a str)>;

fn indent(input: &str) -> Lexed<'_> {
    map(tag("    "), |t| (Category::Indent, t))(input)
}

fn newline(input: &str) -> Lexed<'_> {
    map(alt((tag("\r\n"), tag("\n"))), |t| (Category::NewLine, t))(input)
}

fn whitespace(input: &str) -> Lexed<'_> {
    alt((
        map(tag("\t"), |t| (Category::Tab, t)),
        map(tag(" "), |t| (Category::Space, t)),
    ))(input)
}

fn punctuation(input: &str) -> Lexed<'_> {
    let (rem, category) = map_opt(anychar, Category::punctuation)(input)?;
    Ok((rem, (category, &input[..input.len() - rem.len()])))
}

fn int_literal(input: &str) -> Lexed<'_> {
    map(digit1, |t| (Category::IntLiteral, t))(input)
}

/// Words are identifiers unless they spell a keyword.
fn word(input: &str) -> Lexed<'_> {
    map(
        recognize(pair(alpha1, many0(alt((alphanumeric1, tag("_")))))),
        |t| (Category::keyword(t).unwrap_or(Category::Identifier), t),
    )(input)
}

fn lexeme(input: &str) -> Lexed<'_> {
    alt((newline, whitespace, punctuation, int_literal, word))(input)
}

/// Split `source` into lexemes. Fails on the first character that doesn't
/// start any lexeme.
pub fn tokenize(source: &str) -> Result<LexemeStream> {
    let mut lexemes = Vec::new();
    let mut rest = source;
    let (mut line, mut column) = (1, 1);
    let mut line_start = true;

    while !rest.is_empty() {
        let lexed = if line_start {
            alt((indent, lexeme))(rest)
        } else {
            lexeme(rest)
        };
        let (rem, (category, text)) = lexed.map_err(|_| CompileError::Lex {
            line,
            column,
            found: rest.chars().next().unwrap_or_default(),
        })?;

        if category == Category::IntLiteral && text.parse::<u32>().is_err() {
            return Err(CompileError::Literal {
                line,
                column,
                literal: text.to_owned(),
            });
        }

        lexemes.push(Lexeme::new(category.name(), text).at(line, column));
        match category {
            Category::NewLine => {
                line += 1;
                column = 1;
                line_start = true;
            }
            Category::Indent | Category::Tab => column += text.chars().count(),
            _ => {
                column += text.chars().count();
                line_start = false;
            }
        }
        rest = rem;
    }

    debug!(lexemes = lexemes.len(), lines = line, "lexed source");
    let insignificant: Vec<&str> = Category::ALL
        .iter()
        .filter(|c| c.is_insignificant())
        .map(|c| c.name())
        .collect();
    Ok(LexemeStream::new(lexemes).skipping(&insignificant))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<String> {
        let mut stream = tokenize(source).unwrap();
        let mut kinds = Vec::new();
        while !stream.is_exhausted() {
            kinds.push(stream.next().kind);
        }
        kinds
    }

    #[test]
    fn tokenize_categories() {
        let tests = vec![
            ("def", vec!["Def"]),
            ("define", vec!["Identifier"]),
            ("not5", vec!["Identifier"]),
            ("not 5", vec!["Not", "Space", "IntLiteral"]),
            ("f_1()", vec!["Identifier", "ParenOpen", "ParenClose"]),
            ("-~+*/:", vec!["Minus", "BitwiseComplement", "Plus", "Multiply", "Divide", "Colon"]),
            ("12ab", vec!["IntLiteral", "Identifier"]),
            ("a\r\nb", vec!["Identifier", "NewLine", "Identifier"]),
            ("\treturn", vec!["Tab", "Return"]),
        ];
        for (source, expected) in tests {
            assert_eq!(kinds(source), expected, "source: {:?}", source);
        }
    }

    #[test]
    fn indent_only_at_line_start() {
        assert_eq!(
            kinds("a    b\n        c"),
            vec![
                "Identifier", "Space", "Space", "Space", "Space", "Identifier", "NewLine",
                "Indent", "Indent", "Identifier",
            ]
        );
    }

    #[test]
    fn positions() {
        let mut stream = tokenize("def f\n    return").unwrap();
        let lexemes: Vec<Lexeme> = (0..stream.len()).map(|_| stream.next()).collect();
        let positions: Vec<(usize, usize)> = lexemes.iter().map(|l| (l.line, l.column)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 4), (1, 5), (1, 6), (2, 1), (2, 5)]);
    }

    #[test]
    fn space_is_skipped_by_the_parser() {
        let mut stream = tokenize("return 5").unwrap();
        assert_eq!(stream.next_significant().kind, "Return");
        assert_eq!(stream.next_significant().text, "5");
    }

    #[test]
    fn unknown_character() {
        match tokenize("def f\n    return 5 $ 3") {
            Err(CompileError::Lex { line, column, found }) => {
                assert_eq!((line, column, found), (2, 14, '$'));
            }
            other => panic!("expected lex error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn int_literal_range() {
        struct TestCase {
            source: &'static str,
            rejected: Option<(usize, usize, &'static str)>,
        }

        let tests = vec![
            TestCase {
                source: "4294967295",
                rejected: None,
            },
            TestCase {
                source: "return 4294967296",
                rejected: Some((1, 8, "4294967296")),
            },
            TestCase {
                source: "1 +\n 99999999999999999999",
                rejected: Some((2, 2, "99999999999999999999")),
            },
        ];

        for test in tests {
            match (tokenize(test.source), test.rejected) {
                (Ok(_), None) => {}
                (Err(CompileError::Literal { line, column, literal }), Some(expected)) => {
                    assert_eq!((line, column, literal.as_str()), expected, "source: {:?}", test.source);
                }
                (other, _) => panic!("source: {:?}, got {:?}", test.source, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn category_names_round_trip() {
        for category in Category::ALL.iter().copied() {
            assert_eq!(Category::from_name(category.name()), Some(category));
        }
        assert_eq!(Category::from_name("None"), None);
    }
}
