use abnf_core::streaming::sp;
use imap_stream_types::{
    body::{
        BasicFields, Body, BodyExtension, BodyStructure, Disposition, Language, Location,
        MultiPartExtensionData, SinglePartExtensionData, SpecificFields,
    },
    core::{IString, NString, Vec1},
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::{many1, separated_list1},
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{nil, nstring, number, string},
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
    envelope::envelope,
};

/// `body = "(" (body-type-1part / body-type-mpart) ")"`
///
/// This parser is recursively defined. Thus, in order to not overflow the
/// stack, it is needed to limit how many recursions are allowed.
pub(crate) fn body(
    remaining_recursions: usize,
) -> impl Fn(&[u8]) -> IMAPResult<&[u8], BodyStructure> {
    move |input: &[u8]| body_limited(input, remaining_recursions)
}

fn body_limited<'a>(
    input: &'a [u8],
    remaining_recursions: usize,
) -> IMAPResult<&'a [u8], BodyStructure<'a>> {
    if remaining_recursions == 0 {
        return Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::RecursionLimitExceeded,
        }));
    }

    let body_type_1part =
        move |input: &'a [u8]| body_type_1part_limited(input, remaining_recursions.saturating_sub(1));
    let body_type_mpart =
        move |input: &'a [u8]| body_type_mpart_limited(input, remaining_recursions.saturating_sub(1));

    delimited(
        tag(b"("),
        alt((
            // A multipart starts with a nested body, i.e., `((`;
            // a single part starts with a string.
            body_type_mpart,
            body_type_1part,
        )),
        tag(b")"),
    )(input)
}

/// `body-type-1part = (body-type-basic / body-type-msg / body-type-text) [SP body-ext-1part]`
fn body_type_1part_limited<'a>(
    input: &'a [u8],
    remaining_recursions: usize,
) -> IMAPResult<&'a [u8], BodyStructure<'a>> {
    let (remaining, (body, extension_data)) = tuple((
        alt((
            |input| body_type_msg(input, remaining_recursions),
            body_type_text,
            body_type_basic,
        )),
        opt(preceded(sp, body_ext_1part)),
    ))(input)?;

    Ok((
        remaining,
        BodyStructure::Single {
            body,
            extension_data,
        },
    ))
}

/// `body-type-basic = media-basic SP body-fields`
///
/// `media-basic = ((DQUOTE ("APPLICATION" / "AUDIO" / "IMAGE" / "MESSAGE" /
///                 "VIDEO") DQUOTE) / string) SP media-subtype`
///
/// Simplified: the type is parsed as a string; the quoted well-known names
/// fall out of that.
fn body_type_basic(input: &[u8]) -> IMAPResult<&[u8], Body> {
    let (remaining, (r#type, _, subtype, _, basic)) =
        tuple((string, sp, string, sp, body_fields))(input)?;

    Ok((
        remaining,
        Body {
            basic,
            specific: SpecificFields::Basic { r#type, subtype },
        },
    ))
}

/// `body-type-msg = media-message SP body-fields SP envelope SP body SP body-fld-lines`
///
/// `media-message = DQUOTE "MESSAGE" DQUOTE SP DQUOTE "RFC822" DQUOTE`
fn body_type_msg<'a>(
    input: &'a [u8],
    remaining_recursions: usize,
) -> IMAPResult<&'a [u8], Body<'a>> {
    let (remaining, (_, _, basic, _, envelope, _, body_structure, _, number_of_lines)) =
        tuple((
            tag_no_case(b"\"MESSAGE\" \"RFC822\""),
            sp,
            body_fields,
            sp,
            envelope,
            sp,
            body(remaining_recursions),
            sp,
            number,
        ))(input)?;

    Ok((
        remaining,
        Body {
            basic,
            specific: SpecificFields::Message {
                envelope: Box::new(envelope),
                body_structure: Box::new(body_structure),
                number_of_lines,
            },
        },
    ))
}

/// `body-type-text = media-text SP body-fields SP body-fld-lines`
///
/// `media-text = DQUOTE "TEXT" DQUOTE SP media-subtype`
fn body_type_text(input: &[u8]) -> IMAPResult<&[u8], Body> {
    let (remaining, (_, _, subtype, _, basic, _, number_of_lines)) = tuple((
        tag_no_case(b"\"TEXT\""),
        sp,
        string,
        sp,
        body_fields,
        sp,
        number,
    ))(input)?;

    Ok((
        remaining,
        Body {
            basic,
            specific: SpecificFields::Text {
                subtype,
                number_of_lines,
            },
        },
    ))
}

/// `body-fields = body-fld-param SP body-fld-id SP body-fld-desc SP
///                body-fld-enc SP body-fld-octets`
fn body_fields(input: &[u8]) -> IMAPResult<&[u8], BasicFields> {
    let (remaining, (parameter_list, _, id, _, description, _, content_transfer_encoding, _, size)) =
        tuple((
            body_fld_param,
            sp,
            nstring,
            sp,
            nstring,
            sp,
            string,
            sp,
            number,
        ))(input)?;

    Ok((
        remaining,
        BasicFields {
            parameter_list,
            id,
            description,
            content_transfer_encoding,
            size,
        },
    ))
}

/// `body-fld-param = "(" string SP string *(SP string SP string) ")" / nil`
fn body_fld_param(input: &[u8]) -> IMAPResult<&[u8], Vec<(IString, IString)>> {
    alt((
        delimited(
            tag(b"("),
            separated_list1(
                sp,
                map(tuple((string, sp, string)), |(key, _, value)| (key, value)),
            ),
            tag(b")"),
        ),
        value(Vec::default(), nil),
    ))(input)
}

/// `body-ext-1part = body-fld-md5 [SP body-fld-dsp [SP body-fld-lang [SP body-fld-loc
///                   *(SP body-extension)]]]`
///
/// MUST NOT be returned on non-extensible "BODY" fetch.
fn body_ext_1part(input: &[u8]) -> IMAPResult<&[u8], SinglePartExtensionData> {
    let (remaining, (md5, tail)) = tuple((nstring, opt(preceded(sp, body_fld_dsp_tail))))(input)?;

    Ok((remaining, SinglePartExtensionData { md5, tail }))
}

/// `body-ext-mpart = body-fld-param [SP body-fld-dsp [SP body-fld-lang [SP body-fld-loc
///                   *(SP body-extension)]]]`
///
/// MUST NOT be returned on non-extensible "BODY" fetch.
fn body_ext_mpart(input: &[u8]) -> IMAPResult<&[u8], MultiPartExtensionData> {
    let (remaining, (parameter_list, tail)) =
        tuple((body_fld_param, opt(preceded(sp, body_fld_dsp_tail))))(input)?;

    Ok((
        remaining,
        MultiPartExtensionData {
            parameter_list,
            tail,
        },
    ))
}

/// `body-fld-dsp [SP body-fld-lang [SP body-fld-loc *(SP body-extension)]]`
///
/// `body-fld-dsp = "(" string SP body-fld-param ")" / nil`
fn body_fld_dsp_tail(input: &[u8]) -> IMAPResult<&[u8], Disposition> {
    let (remaining, (disposition, tail)) = tuple((
        alt((
            map(
                delimited(
                    tag(b"("),
                    tuple((string, sp, body_fld_param)),
                    tag(b")"),
                ),
                |(name, _, parameters)| Some((name, parameters)),
            ),
            value(None, nil),
        )),
        opt(preceded(sp, body_fld_lang_tail)),
    ))(input)?;

    Ok((remaining, Disposition { disposition, tail }))
}

/// `body-fld-lang = nstring / "(" string *(SP string) ")"`
fn body_fld_lang_tail(input: &[u8]) -> IMAPResult<&[u8], Language> {
    let (remaining, (language, tail)) = tuple((
        alt((
            delimited(tag(b"("), separated_list1(sp, string), tag(b")")),
            map(nstring, |nstring| match nstring.0 {
                Some(item) => vec![item],
                None => vec![],
            }),
        )),
        opt(preceded(sp, body_fld_loc_tail)),
    ))(input)?;

    Ok((remaining, Language { language, tail }))
}

/// `body-fld-loc = nstring`, followed by `*(SP body-extension)`
fn body_fld_loc_tail(input: &[u8]) -> IMAPResult<&[u8], Location> {
    let (remaining, (location, extensions)) = tuple((
        nstring,
        nom::multi::many0(preceded(sp, body_extension(8))),
    ))(input)?;

    Ok((remaining, Location {
        location,
        extensions,
    }))
}

/// `body-extension = nstring / number / "(" body-extension *(SP body-extension) ")"`
///
/// Future expansion. Client implementations MUST accept body-extension
/// fields. Server implementations MUST NOT generate body-extension fields
/// except as defined by future standard or standards-track revisions of
/// this specification.
pub(crate) fn body_extension(
    remaining_recursions: usize,
) -> impl Fn(&[u8]) -> IMAPResult<&[u8], BodyExtension> {
    move |input: &[u8]| body_extension_limited(input, remaining_recursions)
}

fn body_extension_limited<'a>(
    input: &'a [u8],
    remaining_recursions: usize,
) -> IMAPResult<&'a [u8], BodyExtension<'a>> {
    if remaining_recursions == 0 {
        return Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::RecursionLimitExceeded,
        }));
    }

    let body_extension = move |input: &'a [u8]| {
        body_extension_limited(input, remaining_recursions.saturating_sub(1))
    };

    alt((
        map(number, BodyExtension::Number),
        map(nstring, BodyExtension::NString),
        map(
            delimited(tag(b"("), separated_list1(sp, body_extension), tag(b")")),
            |extensions| BodyExtension::List(Vec1::unvalidated(extensions)),
        ),
    ))(input)
}

/// `body-type-mpart = 1*body SP media-subtype [SP body-ext-mpart]`
fn body_type_mpart_limited<'a>(
    input: &'a [u8],
    remaining_recursions: usize,
) -> IMAPResult<&'a [u8], BodyStructure<'a>> {
    let (remaining, (bodies, _, subtype, extension_data)) = tuple((
        many1(body(remaining_recursions)),
        sp,
        string,
        opt(preceded(sp, body_ext_mpart)),
    ))(input)?;

    Ok((
        remaining,
        BodyStructure::Multi {
            // Note: `many1` guarantees at least one body.
            bodies: Vec1::unvalidated(bodies),
            subtype,
            extension_data,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_single_text() {
        let input = b"(\"TEXT\" \"PLAIN\" (\"CHARSET\" \"UTF-8\") NIL NIL \"7BIT\" 42 3)?";

        let (rem, val) = body(8)(input).unwrap();
        assert_eq!(rem, b"?");

        match val {
            BodyStructure::Single { body, .. } => match body.specific {
                SpecificFields::Text {
                    number_of_lines, ..
                } => assert_eq!(number_of_lines, 3),
                _ => panic!("expected text body"),
            },
            _ => panic!("expected single part"),
        }
    }

    #[test]
    fn test_parse_body_multi() {
        let input = b"((\"TEXT\" \"PLAIN\" NIL NIL NIL \"7BIT\" 5 1)(\"TEXT\" \"HTML\" NIL NIL NIL \"8BIT\" 9 1) \"ALTERNATIVE\")?";

        let (rem, val) = body(8)(input).unwrap();
        assert_eq!(rem, b"?");

        match val {
            BodyStructure::Multi { bodies, .. } => assert_eq!(bodies.len(), 2),
            _ => panic!("expected multipart"),
        }
    }

    #[test]
    fn test_parse_body_recursion_limit() {
        // 16 nested multiparts exceed a recursion limit of 8.
        let mut input = Vec::new();
        for _ in 0..16 {
            input.extend_from_slice(b"(");
        }
        input.extend_from_slice(b"\"TEXT\" \"PLAIN\" NIL NIL NIL \"7BIT\" 5 1");

        assert!(matches!(
            body(8)(&input),
            Err(nom::Err::Failure(_)) | Err(nom::Err::Error(_))
        ));
    }
}
