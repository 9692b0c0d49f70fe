use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{digit1, multispace0},
    combinator::{map, map_res, recognize},
    multi::{fold_many0, separated_list0},
    sequence::{delimited, pair, preceded},
    IResult,
};
use phi_ast::{Attribute, Binding, Bytes, MetaId, Program, Term};

use crate::error::ParseError;

// Labels and built-in names: ASCII identifier, dashes allowed after the
// first character (as in `as-phi`).
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    ))(input)
}

fn meta_name(input: &str) -> IResult<&str, MetaId> {
    map(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        MetaId::new,
    )(input)
}

fn parse_attribute(input: &str) -> IResult<&str, Attribute> {
    alt((
        map(tag("φ"), |_| Attribute::Phi),
        map(tag("ρ"), |_| Attribute::Rho),
        map(tag("σ"), |_| Attribute::Sigma),
        map(tag("ν"), |_| Attribute::Vertex),
        map_res(preceded(tag("α"), digit1), |d: &str| {
            d.parse::<u32>().map(Attribute::Alpha)
        }),
        map(preceded(tag("!"), meta_name), Attribute::Meta),
        map(identifier, Attribute::label),
    ))(input)
}

fn decode_bytes(s: &str) -> Result<Bytes, String> {
    if s == "--" {
        return Ok(Bytes::new(Vec::new()));
    }
    let body = s.strip_suffix('-').unwrap_or(s);
    let mut out = Vec::new();
    for chunk in body.split('-') {
        if chunk.len() != 2 {
            return Err(format!("bad byte pair `{}`", chunk));
        }
        let byte = u8::from_str_radix(chunk, 16).map_err(|e| e.to_string())?;
        out.push(byte);
    }
    Ok(Bytes::new(out))
}

fn parse_bytes(input: &str) -> IResult<&str, Bytes> {
    map_res(
        take_while1(|c: char| c.is_ascii_hexdigit() || c == '-'),
        decode_bytes,
    )(input)
}

fn attribute_binding(input: &str) -> IResult<&str, Binding> {
    let (input, attr) = preceded(multispace0, parse_attribute)(input)?;
    let (input, _) = preceded(multispace0, tag("↦"))(input)?;
    let (input, _) = multispace0(input)?;
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("∅")(input) {
        return Ok((rest, Binding::Empty(attr)));
    }
    let (input, payload) = parse_expr(input)?;
    Ok((input, Binding::Alpha(attr, payload)))
}

fn parse_binding(input: &str) -> IResult<&str, Binding> {
    preceded(
        multispace0,
        alt((
            map(
                preceded(
                    pair(tag("Δ"), preceded(multispace0, tag("⤍"))),
                    preceded(multispace0, parse_bytes),
                ),
                Binding::Delta,
            ),
            map(
                preceded(
                    pair(tag("λ"), preceded(multispace0, tag("⤍"))),
                    preceded(multispace0, identifier),
                ),
                |name| Binding::Lambda(name.to_string()),
            ),
            attribute_binding,
            // Bare `!B` in bindings position matches a run of bindings.
            map(preceded(tag("!"), meta_name), Binding::MetaBindings),
        )),
    )(input)
}

fn binding_list(input: &str) -> IResult<&str, Vec<Binding>> {
    separated_list0(preceded(multispace0, tag(",")), parse_binding)(input)
}

fn parse_formation(input: &str) -> IResult<&str, Term> {
    map(
        delimited(
            tag("⟦"),
            binding_list,
            preceded(multispace0, tag("⟧")),
        ),
        Term::Formation,
    )(input)
}

fn parse_meta_function(input: &str) -> IResult<&str, Term> {
    let (input, name) = preceded(tag("@"), identifier)(input)?;
    let (input, arg) = delimited(
        preceded(multispace0, tag("(")),
        parse_expr,
        preceded(multispace0, tag(")")),
    )(input)?;
    Ok((input, Term::MetaFunction(name.to_string(), Box::new(arg))))
}

fn parse_atom(input: &str) -> IResult<&str, Term> {
    preceded(
        multispace0,
        alt((
            parse_formation,
            map(tag("Φ"), |_| Term::Global),
            map(tag("ξ"), |_| Term::This),
            map(tag("⊥"), |_| Term::Termination),
            parse_meta_function,
            map(preceded(tag("!"), meta_name), Term::MetaObject),
        )),
    )(input)
}

enum Postfix {
    Dot(Attribute),
    Call(Vec<Binding>),
}

fn parse_expr(input: &str) -> IResult<&str, Term> {
    let (input, init) = parse_atom(input)?;
    fold_many0(
        alt((
            map(
                preceded(
                    preceded(multispace0, tag(".")),
                    preceded(multispace0, parse_attribute),
                ),
                Postfix::Dot,
            ),
            map(
                delimited(
                    preceded(multispace0, tag("(")),
                    binding_list,
                    preceded(multispace0, tag(")")),
                ),
                Postfix::Call,
            ),
        )),
        move || init.clone(),
        |acc, postfix| match postfix {
            Postfix::Dot(attr) => Term::dispatch(acc, attr),
            Postfix::Call(args) => Term::application(acc, args),
        },
    )(input)
}

fn finish(full: &str, rest: &str, term: Term) -> Result<Term, ParseError> {
    let (rest, _) = multispace0::<_, nom::error::Error<&str>>(rest)
        .map_err(|_| ParseError::syntax(full, rest))?;
    if rest.is_empty() {
        Ok(term)
    } else {
        Err(ParseError::unconsumed(full, rest))
    }
}

/// Parse a single φ-term or MetaPHI pattern.
pub fn parse(input: &str) -> Result<Term, ParseError> {
    match parse_expr(input) {
        Ok((rest, term)) => finish(input, rest, term),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(ParseError::syntax(input, e.input))
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::syntax(input, "")),
    }
}

/// Parse a program, accepting the `{ … }` wrapper around the global
/// formation; bare terms are accepted as well.
pub fn parse_program(input: &str) -> Result<Program, ParseError> {
    let braced: IResult<&str, Term> = delimited(
        preceded(multispace0, tag("{")),
        parse_expr,
        preceded(multispace0, tag("}")),
    )(input);
    match braced {
        Ok((rest, term)) => finish(input, rest, term).map(Program),
        Err(_) => parse(input).map(Program),
    }
}
