use std::borrow::Cow;

use nom::{
    character::complete::{char, multispace0, u64},
    combinator::opt,
    sequence::{pair, preceded},
    IResult,
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TraceError {
    #[error("unexpected token `{token}` at byte {offset} of access trace")]
    TrailingInput { offset: usize, token: String },
}

/// addresses read from an access trace.
///
/// Reading stops at the first token which is not an unsigned integer
/// (an invalid UTF-8 sequence included); whatever follows is kept as the
/// trailing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace<'a> {
    addresses: Vec<u64>,
    trailing: Option<(usize, &'a [u8])>,
}

impl<'a> Trace<'a> {
    pub fn addresses(&self) -> &[u64] {
        &self.addresses
    }
    pub fn into_addresses(self) -> Vec<u64> {
        self.addresses
    }
    pub fn len(&self) -> usize {
        self.addresses.len()
    }
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
    /// unparsed rest of the input, if any.
    pub fn trailing(&self) -> Option<&'a [u8]> {
        self.trailing.map(|(_, rest)| rest)
    }
    /// first whitespace-delimited token of the trailing input.
    pub fn trailing_token(&self) -> Option<Cow<'a, str>> {
        self.trailing().map(|rest| {
            let token = rest
                .split(|b| b.is_ascii_whitespace())
                .next()
                .unwrap_or(rest);
            String::from_utf8_lossy(token)
        })
    }
    /// fails if the trace was not consumed up to its end.
    pub fn check_complete(&self) -> Result<(), TraceError> {
        match (self.trailing, self.trailing_token()) {
            (Some((offset, _)), Some(token)) => Err(TraceError::TrailingInput {
                offset,
                token: token.into_owned(),
            }),
            _ => Ok(()),
        }
    }
}

fn address(input: &[u8]) -> IResult<&[u8], u64> {
    preceded(pair(multispace0, opt(char('+'))), u64)(input)
}

pub fn parse(input: &[u8]) -> Trace<'_> {
    let mut addresses = Vec::new();
    let mut input_ = input;
    while let Ok((rest, addr)) = address(input_) {
        addresses.push(addr);
        input_ = rest;
    }
    let rest = multispace0::<_, nom::error::Error<_>>(input_).map_or(input_, |(rest, _)| rest);
    let trailing = if rest.is_empty() {
        None
    } else {
        if let Some(&last) = addresses.last() {
            log::debug!("trace stopped after address {last}");
        }
        Some((input.len() - rest.len(), rest))
    };
    Trace {
        addresses,
        trailing,
    }
}
