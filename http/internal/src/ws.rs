use crate::{IResult, whitespace};
use nom::bytes::complete::take_while;

pub trait WsTuple<'i, O> {
    fn parse(&mut self, i: &'i str) -> IResult<&'i str, O>;
}

/// Take a list of parsers and insert a take_while(whitespace) before each
#[inline]
pub fn ws<'i, O, L>(mut l: L) -> impl FnMut(&'i str) -> IResult<&'i str, O>
where
    L: WsTuple<'i, O>,
{
    move |i| l.parse(i)
}

macro_rules! ws_impl {
    (
        $out:ident $out_fn:ident;
        $($r_out:ident $r_out_fn:ident;)*
    ) => {
        ws_impl!(
            @impl_
            $out $out_fn;
            $($r_out $r_out_fn;)*
        );

        ws_impl!(
            $($r_out $r_out_fn;)*
        );
    };
    (@impl_ $($out:ident $out_fn:ident;)+) => {
        impl<
            'i,
            $($out,)*
            $(
                $out_fn: FnMut(&'i str) -> IResult<&'i str, $out>,
            )*
            >
            WsTuple<'i, ($($out,)*)> for ($($out_fn,)*)
            {
                #[allow(non_snake_case)]
                fn parse(&mut self, input: &'i str) -> IResult<&'i str, ( $($out,)* )> {
                    let ($($out_fn,)*) = self;

                    $(
                    let (input, _) = take_while(whitespace)(input)?;
                    let (input, $out) = ($out_fn)(input)?;
                    )*

                    Ok((input, ($($out,)*)))
                }
            }
    };
    () => {}
}

ws_impl! {
    A FnA;
    B FnB;
    C FnC;
    D FnD;
}
