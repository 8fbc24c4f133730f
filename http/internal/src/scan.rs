use crate::IResult;

/// Apply `parser` at every position of `i` in a single pass, collecting every match.
///
/// Characters where `parser` fails are skipped one at a time, so matches may be
/// surrounded by arbitrary separators. Never fails.
pub fn scan<'i, O, F>(mut parser: F) -> impl FnMut(&'i str) -> IResult<&'i str, Vec<O>>
where
    F: FnMut(&'i str) -> IResult<&'i str, O>,
{
    move |mut i| {
        let mut matches = vec![];

        while !i.is_empty() {
            match parser(i) {
                Ok((rem, o)) if rem.len() < i.len() => {
                    matches.push(o);
                    i = rem;
                }
                Ok(_) | Err(nom::Err::Error(_)) => {
                    let mut chars = i.chars();
                    chars.next();
                    i = chars.as_str();
                }
                Err(e) => return Err(e),
            }
        }

        Ok((i, matches))
    }
}
