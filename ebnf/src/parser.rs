use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alpha1, alphanumeric1, multispace1},
    combinator::{all_consuming, map, recognize, value},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::{Grammar, Identifier, Lhs, Production, Rhs, Terminal};

/// Skips whitespace and `(* ... *)` comments.
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), delimited(tag("(*"), take_until("*)"), tag("*)"))),
        ))),
    )(input)
}

pub fn terminal(input: &str) -> IResult<&str, Terminal> {
    let (rem, matched) = alt((
        delimited(tag("\""), take_until("\""), tag("\"")),
        delimited(tag("\'"), take_until("\'"), tag("\'")),
    ))(input)?;
    Ok((rem, Terminal(matched.to_owned())))
}

pub fn identifier(input: &str) -> IResult<&str, Identifier> {
    let (rem, matched) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)?;
    Ok((rem, Identifier(matched.to_owned())))
}

fn rhs_repetition(input: &str) -> IResult<&str, Rhs> {
    let (rem, inner) = delimited(tag("{"), rhs, preceded(ws, tag("}")))(input)?;
    Ok((rem, Rhs::Repeat(Box::new(inner))))
}

fn rhs_factor(input: &str) -> IResult<&str, Rhs> {
    preceded(
        ws,
        alt((
            rhs_repetition,
            map(terminal, Rhs::Terminal),
            map(identifier, Rhs::Identifier),
        )),
    )(input)
}

fn rhs_concatenation(input: &str) -> IResult<&str, Rhs> {
    let (rem, mut items) = separated_list1(preceded(ws, tag(",")), rhs_factor)(input)?;
    if items.len() == 1 {
        Ok((rem, items.remove(0)))
    } else {
        Ok((rem, Rhs::Concatenation(items)))
    }
}

/// Alternation binds loosest, then concatenation.
pub fn rhs(input: &str) -> IResult<&str, Rhs> {
    let (rem, mut alternatives) =
        separated_list1(preceded(ws, tag("|")), rhs_concatenation)(input)?;
    if alternatives.len() == 1 {
        Ok((rem, alternatives.remove(0)))
    } else {
        Ok((rem, Rhs::Alternation(alternatives)))
    }
}

pub fn production(input: &str) -> IResult<&str, Production> {
    let (rem, (lhs, _, rhs, _)) = tuple((
        preceded(ws, identifier),
        preceded(ws, tag("=")),
        rhs,
        preceded(ws, tag(";")),
    ))(input)?;
    Ok((
        rem,
        Production {
            lhs: Lhs(lhs),
            rhs,
        },
    ))
}

pub fn complete_rhs(input: &str) -> IResult<&str, Rhs> {
    all_consuming(terminated(rhs, ws))(input)
}

pub fn complete_production(input: &str) -> IResult<&str, Production> {
    all_consuming(terminated(production, ws))(input)
}

pub fn grammar(input: &str) -> IResult<&str, Grammar> {
    let (rem, rules) = all_consuming(terminated(many0(production), ws))(input)?;
    Ok((rem, Grammar { rules }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Debug;

    struct TestCase<T> {
        input: &'static str,
        // Some indicates success, None indicates error.
        out: Option<IResult<&'static str, T>>,
    }

    fn assert_test_cases<T, F>(f: F, tests: Vec<TestCase<T>>)
    where
        T: Debug + Eq,
        F: Fn(&'static str) -> IResult<&'static str, T>,
    {
        for t in tests {
            let res = f(t.input);
            match t.out {
                Some(out) => assert_eq!(res, out, "input: {}", t.input),
                None => assert!(res.is_err(), "expected error: {:?}", res),
            }
        }
    }

    fn id(s: &str) -> Rhs {
        Rhs::Identifier(s.into())
    }

    fn term(s: &str) -> Rhs {
        Rhs::Terminal(s.into())
    }

    #[test]
    fn parse_terminal() {
        let tests = vec![
            TestCase {
                input: "\"IntLiteral\"",
                out: Some(Ok(("", Terminal("IntLiteral".to_owned())))),
            },
            TestCase {
                input: "\"Def\" rest",
                out: Some(Ok((" rest", Terminal("Def".to_owned())))),
            },
            TestCase {
                input: "'Def' rest",
                out: Some(Ok((" rest", Terminal("Def".to_owned())))),
            },
            TestCase {
                input: "'Def\" rest",
                out: None,
            },
        ];

        assert_test_cases(terminal, tests);
    }

    #[test]
    fn parse_identifier() {
        let tests = vec![
            TestCase {
                input: "expression",
                out: Some(Ok(("", Identifier("expression".to_owned())))),
            },
            TestCase {
                input: "unary_op factor",
                out: Some(Ok((" factor", Identifier("unary_op".to_owned())))),
            },
            TestCase {
                input: "term=factor",
                out: Some(Ok(("=factor", Identifier("term".to_owned())))),
            },
            TestCase {
                input: "9lives",
                out: None,
            },
        ];

        assert_test_cases(identifier, tests);
    }

    #[test]
    fn parse_rhs() {
        let tests = vec![
            TestCase {
                input: "{ op , term }",
                out: Some(Ok((
                    "",
                    Rhs::Repeat(Box::new(Rhs::Concatenation(vec![id("op"), id("term")]))),
                ))),
            },
            TestCase {
                input: "a | b | c",
                out: Some(Ok(("", Rhs::Alternation(vec![id("a"), id("b"), id("c")])))),
            },
            TestCase {
                input: "a , b | c , d",
                out: Some(Ok((
                    "",
                    Rhs::Alternation(vec![
                        Rhs::Concatenation(vec![id("a"), id("b")]),
                        Rhs::Concatenation(vec![id("c"), id("d")]),
                    ]),
                ))),
            },
            TestCase {
                input: "{ b } | a",
                out: Some(Ok((
                    "",
                    Rhs::Alternation(vec![Rhs::Repeat(Box::new(id("b"))), id("a")]),
                ))),
            },
            TestCase {
                input: "term , { \"Plus\" , term }",
                out: Some(Ok((
                    "",
                    Rhs::Concatenation(vec![
                        id("term"),
                        Rhs::Repeat(Box::new(Rhs::Concatenation(vec![
                            term("Plus"),
                            id("term"),
                        ]))),
                    ]),
                ))),
            },
            TestCase {
                input: "{ a",
                out: None,
            },
        ];

        assert_test_cases(rhs, tests);
    }

    #[test]
    fn parse_production() {
        let tests = vec![
            TestCase {
                input: "a = b;",
                out: Some(Ok((
                    "",
                    Production {
                        lhs: Lhs("a".into()),
                        rhs: id("b"),
                    },
                ))),
            },
            TestCase {
                input: "statement = indent , \"Return\" , expression ;",
                out: Some(Ok((
                    "",
                    Production {
                        lhs: Lhs("statement".into()),
                        rhs: Rhs::Concatenation(vec![
                            id("indent"),
                            term("Return"),
                            id("expression"),
                        ]),
                    },
                ))),
            },
            TestCase {
                input: "a = b; c = d;",
                out: Some(Ok((
                    " c = d;",
                    Production {
                        lhs: Lhs("a".into()),
                        rhs: id("b"),
                    },
                ))),
            },
            TestCase {
                input: "a = b",
                out: None,
            },
        ];

        assert_test_cases(production, tests);
    }

    #[test]
    fn parse_grammar() {
        let tests = vec![
            TestCase {
                input: "(* start *) a = b;\n(* tail *)\n",
                out: Some(Ok((
                    "",
                    Grammar {
                        rules: vec![Production {
                            lhs: Lhs("a".into()),
                            rhs: id("b"),
                        }],
                    },
                ))),
            },
            TestCase {
                input: "a = b;\nc = d;",
                out: Some(Ok((
                    "",
                    Grammar {
                        rules: vec![
                            Production {
                                lhs: Lhs("a".into()),
                                rhs: id("b"),
                            },
                            Production {
                                lhs: Lhs("c".into()),
                                rhs: id("d"),
                            },
                        ],
                    },
                ))),
            },
            TestCase {
                input: "a = b; c",
                out: None,
            },
        ];

        assert_test_cases(grammar, tests);
    }
}
