//! Doxygen search data parser.
//!
//! Doxygen writes each search table as a JavaScript assignment:
//!
//! ```text
//! var searchData=
//! [
//!   ['wav64_5fopen_8',['wav64_open',['../wav64_8h.html#ad66a…',1,'wav64_open(…):&#160;wav64.c'],…]],
//!   …
//! ];
//! ```
//!
//! Only the literal subset Doxygen emits is accepted: nested arrays, quoted
//! strings and integers, parsed with `nom`. Syntax errors abort the parse
//! with a byte offset.
//! Rows that parse but have the wrong shape are handed on as defective
//! [`RawEntry`] values so the table's malformed-entry policy decides what
//! happens to them.

use crate::error::{IndexError, IndexResult};
use crate::escape::{decode_entities, decode_search_id};
use crate::source::{RawEntry, RawTarget};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1, take_while_m_n},
    character::complete::{anychar, char, digit1, multispace0, multispace1},
    combinator::{cut, map, map_opt, map_res, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::{fold_many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

/// A parsed JavaScript literal.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Num,
    List(Vec<Value>),
}

/// Parse one search data file into raw records, in file order.
pub fn parse(src: &str) -> IndexResult<Vec<RawEntry>> {
    let rows = match parse_document(src)? {
        Value::List(rows) => rows,
        _ => return Err(IndexError::syntax(0, "search data is not an array")),
    };
    Ok(rows.into_iter().map(row_to_entry).collect())
}

fn row_to_entry(row: Value) -> RawEntry {
    let Value::List(mut parts) = row else {
        return RawEntry::defective("row is not an array");
    };
    if parts.len() != 2 {
        return RawEntry::defective(format!(
            "row has {} elements, expected [id, [label, targets…]]",
            parts.len()
        ));
    }
    let body = parts.pop();
    let id = parts.pop();

    let key = match id {
        Some(Value::Str(id)) => match decode_search_id(&id) {
            Ok(key) => key,
            Err(e) => return RawEntry::defective(format!("bad search id {id:?}: {e}")),
        },
        _ => return RawEntry::defective("search id is not a string"),
    };

    let Some(Value::List(body)) = body else {
        return RawEntry {
            key: Some(key),
            ..RawEntry::default()
        };
    };

    let mut body = body.into_iter();
    let label = match body.next() {
        Some(Value::Str(label)) => Some(decode_entities(&label)),
        _ => None,
    };
    let targets = body.map(value_to_target).collect();

    RawEntry {
        key: Some(key),
        label,
        targets,
        defect: None,
    }
}

/// `[link, flag, scope]`; the numeric flag is checked but carries nothing
/// the table keeps.
fn value_to_target(value: Value) -> RawTarget {
    let Value::List(fields) = value else {
        return RawTarget::default();
    };
    let mut fields = fields.into_iter();
    let link = match fields.next() {
        Some(Value::Str(link)) => Some(link),
        _ => None,
    };
    match fields.next() {
        Some(Value::Num) | None => {}
        Some(_) => return RawTarget::default(),
    }
    let origin_label = match fields.next() {
        Some(Value::Str(scope)) => decode_entities(&scope),
        _ => String::new(),
    };
    RawTarget { link, origin_label }
}

// ---------------------------------------------------------------------------
// Literal parser
// ---------------------------------------------------------------------------

/// Run the document parser and turn nom errors into byte offsets.
fn parse_document(src: &str) -> IndexResult<Value> {
    let offset = |rest: &str| src.len() - rest.len();
    match document(src) {
        Ok(("", value)) => Ok(value),
        Ok((rest, _)) => Err(IndexError::syntax(
            offset(rest),
            "trailing data after search table",
        )),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(IndexError::syntax(
            offset(e.input),
            format!("unexpected input: {}", e.code.description()),
        )),
        Err(nom::Err::Incomplete(_)) => {
            Err(IndexError::syntax(src.len(), "unexpected end of input"))
        }
    }
}

/// `var <name> = <literal>;`, with the assignment and semicolon optional.
fn document(input: &str) -> IResult<&str, Value> {
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(assignment)(input)?;
    let (input, value) = literal(input, 0)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(char(';'))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, value))
}

fn assignment(input: &str) -> IResult<&str, ()> {
    let (input, _) = tag("var")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('=')(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, ()))
}

/// Deepest array nesting accepted. Doxygen rows nest three levels below the
/// table itself.
const MAX_DEPTH: usize = 16;

fn literal<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Value> {
    alt((
        move |i: &'a str| list(i, depth),
        map(quoted('\''), Value::Str),
        map(quoted('"'), Value::Str),
        map(integer, |_| Value::Num),
    ))(input)
}

/// `[a, b, c]`, trailing comma allowed. Everything after `[` is cut so an
/// error points at the offending byte instead of backtracking to the top.
fn list<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Value> {
    let (rest, _) = char('[')(input)?;
    if depth >= MAX_DEPTH {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    let (rest, items) = cut(terminated(
        delimited(
            multispace0,
            separated_list0(
                delimited(multispace0, char(','), multispace0),
                move |i: &'a str| literal(i, depth + 1),
            ),
            pair(multispace0, opt(char(','))),
        ),
        pair(multispace0, char(']')),
    ))(rest)?;
    Ok((rest, Value::List(items)))
}

fn integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| s.parse::<i64>())(input)
}

enum Fragment<'a> {
    Literal(&'a str),
    Escaped(char),
}

/// A string delimited by `quote`, with JavaScript backslash escapes.
fn quoted<'a>(quote: char) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    let stop = if quote == '\'' { "'\\" } else { "\"\\" };
    move |input| {
        let body = fold_many0(
            alt((
                map(is_not(stop), Fragment::Literal),
                map(preceded(char('\\'), cut(escape)), Fragment::Escaped),
            )),
            String::new,
            |mut acc, fragment| {
                match fragment {
                    Fragment::Literal(s) => acc.push_str(s),
                    Fragment::Escaped(c) => acc.push(c),
                }
                acc
            },
        );
        preceded(char(quote), cut(terminated(body, char(quote))))(input)
    }
}

fn escape(input: &str) -> IResult<&str, char> {
    alt((
        value('\n', char('n')),
        value('\t', char('t')),
        value('\r', char('r')),
        preceded(
            char('u'),
            map_opt(take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()), |hex: &str| {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            }),
        ),
        anychar,
    ))(input)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"var searchData=
[
  ['wav64_5fopen_8',['wav64_open',['../wav64_8h.html#ad66a',1,'wav64_open(wav64_t *wav, const char *fn):&#160;wav64.c'],['../wav64_8c.html#ad66a',1,'wav64_open(wav64_t *wav, const char *fn):&#160;wav64.c']]],
  ['wav64_2ec_5',['wav64.c',['../wav64_8c.html',1,'']]]
];
"#;

    #[test]
    fn parses_rows_in_file_order() {
        let rows = parse(SAMPLE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key.as_deref(), Some("wav64_open"));
        assert_eq!(rows[0].label.as_deref(), Some("wav64_open"));
        assert_eq!(rows[0].targets.len(), 2);
        assert_eq!(rows[0].targets[1].link.as_deref(), Some("../wav64_8c.html#ad66a"));
        assert_eq!(
            rows[0].targets[0].origin_label,
            "wav64_open(wav64_t *wav, const char *fn):\u{a0}wav64.c"
        );
        assert_eq!(rows[1].key.as_deref(), Some("wav64.c"));
        assert_eq!(rows[1].targets[0].origin_label, "");
    }

    #[test]
    fn bare_array_without_assignment() {
        let rows = parse("[['wait_0',['wait',['../group__system.html#ga66',1,'system.c']]]]").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key.as_deref(), Some("wait"));
    }

    #[test]
    fn trailing_commas_are_accepted() {
        let rows = parse("[['a_0',['a',['a.html',1,'a.c'],],],]").unwrap();
        assert_eq!(rows[0].targets.len(), 1);
    }

    #[test]
    fn string_escapes() {
        let rows = parse(r#"[['q_0',['it\'s',['p.html',1,"say \"hi\" é"]]]]"#).unwrap();
        assert_eq!(rows[0].label.as_deref(), Some("it's"));
        assert_eq!(rows[0].targets[0].origin_label, "say \"hi\" é");
    }

    #[test]
    fn row_without_targets_is_kept_for_validation() {
        let rows = parse("[['lonely_0',['lonely']]]").unwrap();
        assert_eq!(rows[0].label.as_deref(), Some("lonely"));
        assert!(rows[0].targets.is_empty());
    }

    #[test]
    fn bad_search_id_marks_row_defective() {
        let rows = parse("[['bad_zz_0',['bad',['b.html',1,'']]]]").unwrap();
        assert!(rows[0].defect.is_some());
    }

    #[test]
    fn unterminated_string_reports_offset() {
        let err = parse("[['oops").unwrap_err();
        assert!(matches!(err, IndexError::Syntax { offset: 7, .. }), "{err}");
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = parse("[] extra").unwrap_err();
        assert!(matches!(err, IndexError::Syntax { offset: 3, .. }), "{err}");
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let src = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        let rows = parse(&src).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].defect.is_some());
    }

    #[test]
    fn runaway_nesting_is_a_syntax_error() {
        let err = parse(&"[".repeat(20_000)).unwrap_err();
        assert!(
            matches!(err, IndexError::Syntax { offset, .. } if offset == MAX_DEPTH),
            "{err}"
        );
    }

    #[test]
    fn top_level_must_be_array() {
        let err = parse("var searchData = 'nope';").unwrap_err();
        assert!(matches!(err, IndexError::Syntax { offset: 0, .. }), "{err}");
    }
}
