//! Internal parser util functions shared between warden crates.

mod scan;
mod ws;

pub type IResult<I, O> = nom::IResult<I, O, nom::error::VerboseError<I>>;
pub use nom::Finish;
pub use scan::scan;
pub use ws::{WsTuple, ws};

/// Characters skipped by [`ws`] and accepted between header tokens
pub fn whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}
