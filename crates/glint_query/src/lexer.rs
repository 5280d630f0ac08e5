//! Splits a query string into token texts and the separators between them.
//!
//! `..` binds before `.`, scanning left to right, so `a...b` splits as
//! `a`, `..`, `.b`. Separators inside parentheses, brackets or quotes are
//! part of the token text, which lets predicates carry decimal literals
//! such as `(@alpha<0.5)`.

/// The separator that precedes a piece of query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Separator {
    Start,
    Dot,
    DotDot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Piece<'a> {
    pub(crate) sep: Separator,
    pub(crate) text: &'a str,
    pub(crate) offset: usize,
}

pub(crate) fn split_pieces(input: &str) -> Vec<Piece<'_>> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut nesting = 0usize;
    let mut quote: Option<u8> = None;
    let mut sep = Separator::Start;
    let mut start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i];

        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            b'"' | b'\'' if nesting > 0 => quote = Some(c),
            b'(' | b'[' => nesting += 1,
            b')' | b']' => nesting = nesting.saturating_sub(1),
            b'.' if nesting == 0 => {
                out.push(Piece {
                    sep,
                    text: &input[start..i],
                    offset: start,
                });
                if bytes.get(i + 1) == Some(&b'.') {
                    sep = Separator::DotDot;
                    i += 2;
                } else {
                    sep = Separator::Dot;
                    i += 1;
                }
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    out.push(Piece {
        sep,
        text: &input[start..],
        offset: start,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(input: &str) -> Vec<(Separator, &str)> {
        split_pieces(input).iter().map(|p| (p.sep, p.text)).collect()
    }

    #[test]
    fn splits_shallow_and_recursive() {
        assert_eq!(
            shape("a.b..c"),
            vec![
                (Separator::Start, "a"),
                (Separator::Dot, "b"),
                (Separator::DotDot, "c"),
            ]
        );
    }

    #[test]
    fn leading_double_dot_leaves_empty_first_piece() {
        assert_eq!(
            shape("..z"),
            vec![(Separator::Start, ""), (Separator::DotDot, "z")]
        );
    }

    #[test]
    fn double_dot_binds_first() {
        assert_eq!(
            shape("a...b"),
            vec![
                (Separator::Start, "a"),
                (Separator::DotDot, ""),
                (Separator::Dot, "b"),
            ]
        );
    }

    #[test]
    fn dots_inside_predicates_are_kept() {
        assert_eq!(
            shape("(@alpha<0.5).b"),
            vec![(Separator::Start, "(@alpha<0.5)"), (Separator::Dot, "b")]
        );
        assert_eq!(
            shape("(@label==\"x.y\")"),
            vec![(Separator::Start, "(@label==\"x.y\")")]
        );
    }
}
