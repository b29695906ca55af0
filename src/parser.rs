// ABOUTME: Parser — tokenizes and parses source text into a Form tree, via nom combinators

use crate::error::LkitError;
use nom::branch::alt;
use nom::bytes::complete::{take_until, take_while1};
use nom::character::complete::{char, multispace0, multispace1};
use nom::multi::many0;
use nom::sequence::preceded;
use nom::IResult;

/// The raw parse tree a source form lowers to, before the environment turns
/// it into `Node`s. Timestamp literals keep their quoted inner text — they
/// aren't resolved into microseconds until the environment compiles them,
/// since that's where a malformed literal becomes a reportable error.
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    List(Vec<Form>),
    Int(i32),
    Double(f64),
    Bool(bool),
    Timestamp(String),
    Ident(String),
}

fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')' && c != '\''
}

fn is_integer_token(tok: &str) -> bool {
    let digits = tok.strip_prefix(['+', '-']).unwrap_or(tok);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_double_token(tok: &str) -> bool {
    let allowed = tok.chars().all(|c| matches!(c, '+' | '-' | '0'..='9' | '.' | 'e' | 'E'));
    let has_marker = tok.chars().any(|c| matches!(c, '.' | 'e' | 'E'));
    allowed && has_marker
}

fn classify_token(tok: &str) -> Form {
    match tok {
        "true" => return Form::Bool(true),
        "false" => return Form::Bool(false),
        _ => {}
    }
    if is_integer_token(tok) {
        if let Ok(n) = tok.parse::<i32>() {
            return Form::Int(n);
        }
    }
    if is_double_token(tok) {
        if let Ok(d) = tok.parse::<f64>() {
            return Form::Double(d);
        }
    }
    Form::Ident(tok.to_string())
}

/// `'<text>'` — a single-quoted timestamp literal. The text may itself
/// contain whitespace (`'2012-03-21 11:45:16'`), so this must run before
/// the bare-token tokenizer, which would otherwise stop at the space.
fn timestamp_literal(input: &str) -> IResult<&str, Form> {
    let (input, _) = char('\'')(input)?;
    let (input, text) = take_until("'")(input)?;
    let (input, _) = char('\'')(input)?;
    Ok((input, Form::Timestamp(text.to_string())))
}

fn bare_token(input: &str) -> IResult<&str, Form> {
    let (input, tok) = take_while1(is_token_char)(input)?;
    Ok((input, classify_token(tok)))
}

fn arg(input: &str) -> IResult<&str, Form> {
    alt((list_expr, timestamp_literal, bare_token))(input)
}

fn list_expr(input: &str) -> IResult<&str, Form> {
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, head) = arg(input)?;
    let (input, mut rest) = many0(preceded(multispace1, arg))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;
    let mut items = vec![head];
    items.append(&mut rest);
    Ok((input, Form::List(items)))
}

/// Parses the full source text into its top-level forms, in textual order.
/// Fails if no `(` is found anywhere, or if any top-level form is malformed.
pub fn parse_program(input: &str) -> Result<Vec<Form>, LkitError> {
    let mut remaining = input;
    let mut forms = Vec::new();
    loop {
        let (rest, _) =
            multispace0::<_, nom::error::Error<&str>>(remaining).expect("multispace0 never fails");
        remaining = rest;
        if remaining.is_empty() {
            break;
        }
        match list_expr(remaining) {
            Ok((rest, form)) => {
                forms.push(form);
                remaining = rest;
            }
            Err(_) => {
                let snippet: String = remaining.chars().take(24).collect();
                return Err(LkitError::Syntax(format!(
                    "expected '(' starting a form near: {snippet:?}"
                )));
            }
        }
    }
    if forms.is_empty() {
        return Err(LkitError::Syntax("no opening '(' found in source".into()));
    }
    Ok(forms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_call() {
        let forms = parse_program("(+ 1 2 3)").unwrap();
        assert_eq!(
            forms,
            vec![Form::List(vec![
                Form::Ident("+".into()),
                Form::Int(1),
                Form::Int(2),
                Form::Int(3),
            ])]
        );
    }

    #[test]
    fn parses_nested_calls() {
        let forms = parse_program("(+ (+ 1 2) 3)").unwrap();
        let expected = Form::List(vec![
            Form::Ident("+".into()),
            Form::List(vec![Form::Ident("+".into()), Form::Int(1), Form::Int(2)]),
            Form::Int(3),
        ]);
        assert_eq!(forms, vec![expected]);
    }

    #[test]
    fn classifies_literals() {
        let forms = parse_program("(f -5 2.5 true false '2012-03-21 11:45:16' name)").unwrap();
        let Form::List(items) = &forms[0] else {
            panic!("expected a list")
        };
        assert_eq!(items[1], Form::Int(-5));
        assert_eq!(items[2], Form::Double(2.5));
        assert_eq!(items[3], Form::Bool(true));
        assert_eq!(items[4], Form::Bool(false));
        assert_eq!(items[5], Form::Timestamp("2012-03-21 11:45:16".into()));
        assert_eq!(items[6], Form::Ident("name".into()));
    }

    #[test]
    fn parses_multiple_top_level_forms() {
        let forms = parse_program("(set x 1) (+ x 1)").unwrap();
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn rejects_source_with_no_opening_paren() {
        assert!(parse_program("not an expression").is_err());
        assert!(parse_program("").is_err());
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert!(parse_program("(+ 1 2").is_err());
    }

    #[test]
    fn operator_names_are_identifiers_not_literals() {
        let forms = parse_program("(== 1 1)").unwrap();
        let Form::List(items) = &forms[0] else {
            panic!("expected a list")
        };
        assert_eq!(items[0], Form::Ident("==".into()));
    }
}
