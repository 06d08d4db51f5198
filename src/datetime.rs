use abnf_core::{
    is_digit,
    streaming::{dquote, sp},
};
use chrono::{
    FixedOffset, LocalResult, NaiveDate as ChronoNaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use imap_stream_types::datetime::{DateTime, NaiveDate};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case, take_while_m_n},
    character::streaming::char,
    combinator::{map, value},
    sequence::{delimited, preceded, tuple},
};

use crate::decode::{IMAPErrorKind, IMAPParseError, IMAPResult};

/// ```abnf
/// date = date-text / DQUOTE date-text DQUOTE
/// ```
pub(crate) fn date(input: &[u8]) -> IMAPResult<&[u8], Option<NaiveDate>> {
    alt((date_text, delimited(dquote, date_text, dquote)))(input)
}

/// ```abnf
/// date-text = date-day "-" date-month "-" date-year
/// ```
pub(crate) fn date_text(input: &[u8]) -> IMAPResult<&[u8], Option<NaiveDate>> {
    let mut parser = tuple((date_day, tag(b"-"), date_month, tag(b"-"), date_year));

    let (remaining, (d, _, m, _, y)) = parser(input)?;

    Ok((
        remaining,
        ChronoNaiveDate::from_ymd_opt(y.into(), m.into(), d.into()).map(NaiveDate::unvalidated),
    ))
}

/// Day of month.
///
/// ```abnf
/// date-day = 1*2DIGIT
/// ```
pub(crate) fn date_day(input: &[u8]) -> IMAPResult<&[u8], u8> {
    digits::<u8>(1, 2)(input)
}

/// ```abnf
/// date-month = "Jan" / "Feb" / "Mar" / "Apr" /
///              "May" / "Jun" / "Jul" / "Aug" /
///              "Sep" / "Oct" / "Nov" / "Dec"
/// ```
///
/// Month names are matched case-insensitively; anything else is a parser
/// error, not a silent wrap.
pub(crate) fn date_month(input: &[u8]) -> IMAPResult<&[u8], u8> {
    alt((
        value(1, tag_no_case(b"Jan")),
        value(2, tag_no_case(b"Feb")),
        value(3, tag_no_case(b"Mar")),
        value(4, tag_no_case(b"Apr")),
        value(5, tag_no_case(b"May")),
        value(6, tag_no_case(b"Jun")),
        value(7, tag_no_case(b"Jul")),
        value(8, tag_no_case(b"Aug")),
        value(9, tag_no_case(b"Sep")),
        value(10, tag_no_case(b"Oct")),
        value(11, tag_no_case(b"Nov")),
        value(12, tag_no_case(b"Dec")),
    ))(input)
}

/// ```abnf
/// date-year = 4DIGIT
/// ```
pub(crate) fn date_year(input: &[u8]) -> IMAPResult<&[u8], u16> {
    digits::<u16>(4, 4)(input)
}

/// Hours minutes seconds.
///
/// ```abnf
/// time = 2DIGIT ":" 2DIGIT ":" 2DIGIT
/// ```
pub(crate) fn time(input: &[u8]) -> IMAPResult<&[u8], Option<NaiveTime>> {
    let mut parser = tuple((
        digits::<u8>(2, 2),
        tag(b":"),
        digits::<u8>(2, 2),
        tag(b":"),
        digits::<u8>(2, 2),
    ));

    let (remaining, (h, _, m, _, s)) = parser(input)?;

    Ok((
        remaining,
        NaiveTime::from_hms_opt(h.into(), m.into(), s.into()),
    ))
}

/// ```abnf
/// date-time = DQUOTE
///              date-day-fixed "-" date-month "-" date-year SP
///              time SP
///              zone
///             DQUOTE
/// ```
pub(crate) fn date_time(input: &[u8]) -> IMAPResult<&[u8], DateTime> {
    let mut parser = delimited(
        dquote,
        tuple((
            date_day_fixed,
            tag(b"-"),
            date_month,
            tag(b"-"),
            date_year,
            sp,
            time,
            sp,
            zone,
        )),
        dquote,
    );

    let (remaining, (d, _, m, _, y, _, time, _, zone)) = parser(input)?;

    let date = ChronoNaiveDate::from_ymd_opt(y.into(), m.into(), d.into());

    match (date, time, zone) {
        (Some(date), Some(time), Some(zone)) => {
            let local_datetime = NaiveDateTime::new(date, time);

            if let LocalResult::Single(datetime) = zone.from_local_datetime(&local_datetime) {
                Ok((remaining, DateTime::unvalidated(datetime)))
            } else {
                Err(nom::Err::Failure(IMAPParseError {
                    input,
                    kind: IMAPErrorKind::BadDateTime,
                }))
            }
        }
        _ => Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::BadDateTime,
        })),
    }
}

/// Fixed-format version of date-day.
///
/// ```abnf
/// date-day-fixed = (SP DIGIT) / 2DIGIT
/// ```
pub(crate) fn date_day_fixed(input: &[u8]) -> IMAPResult<&[u8], u8> {
    alt((
        map(
            preceded(sp, take_while_m_n(1, 1, is_digit)),
            |bytes: &[u8]| bytes[0] - b'0',
        ),
        digits::<u8>(2, 2),
    ))(input)
}

/// Signed four-digit value of hhmm representing hours and minutes east of
/// Greenwich.
///
/// Subtracting the timezone from the given time will give the UT form. The
/// Universal Time zone is "+0000". Zones farther than 15:59 from Greenwich
/// are rejected.
///
/// ```abnf
/// zone = ("+" / "-") 4DIGIT
/// ```
pub(crate) fn zone(input: &[u8]) -> IMAPResult<&[u8], Option<FixedOffset>> {
    let mut parser = tuple((alt((char('+'), char('-'))), digits::<u8>(2, 2), digits::<u8>(2, 2)));

    let (remaining, (sign, hh, mm)) = parser(input)?;

    // 60 * hh + mm must not exceed 959 minutes.
    if 60 * (hh as i32) + (mm as i32) > 959 {
        return Ok((remaining, None));
    }

    let offset = 3600 * (hh as i32) + 60 * (mm as i32);

    let zone = match sign {
        '+' => FixedOffset::east_opt(offset),
        '-' => FixedOffset::west_opt(offset),
        _ => unreachable!(),
    };

    Ok((remaining, zone))
}

/// A bounded run of digits, e.g., the `4DIGIT` of `date-year`.
fn digits<T>(min: usize, max: usize) -> impl Fn(&[u8]) -> IMAPResult<&[u8], T>
where
    T: std::str::FromStr,
{
    move |input: &[u8]| {
        let (remaining, run) = take_while_m_n(min, max, is_digit)(input)?;

        // The run is ASCII digits only, so the conversion can't fail.
        let run = std::str::from_utf8(run).expect("byte class is ASCII-only");

        match run.parse::<T>() {
            Ok(value) => Ok((remaining, value)),
            Err(_) => Err(nom::Err::Error(IMAPParseError {
                input,
                kind: IMAPErrorKind::BadNumber,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::known_answer_test_encode;

    #[test]
    fn test_parse_date_time() {
        let (rem, val) = date_time(b"\"25-Jun-1994 01:02:03 +0100\"?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(
            val.inner().to_rfc3339(),
            "1994-06-25T01:02:03+01:00".to_string()
        );

        // Single-digit days are space-padded.
        assert!(date_time(b"\" 7-Feb-1994 21:52:25 -0800\"?").is_ok());

        // A zone farther than 15:59 from Greenwich fails hard.
        assert!(matches!(
            date_time(b"\"25-Jun-1994 01:02:03 +1600\"?"),
            Err(nom::Err::Failure(_))
        ));

        // A nonsense month fails.
        assert!(date_time(b"\"25-Jux-1994 01:02:03 +0100\"?").is_err());

        // An out-of-range time component fails hard.
        assert!(matches!(
            date_time(b"\"25-Jun-1994 25:02:03 +0100\"?"),
            Err(nom::Err::Failure(_))
        ));
    }

    #[test]
    fn test_parse_date() {
        let (rem, val) = date(b"1-Feb-2020?").unwrap();
        assert_eq!(rem, b"?");
        assert!(val.is_some());

        let (_, val) = date(b"\"1-Feb-2020\"?").unwrap();
        assert!(val.is_some());

        // 30-Feb does not exist.
        let (_, val) = date(b"30-Feb-2020?").unwrap();
        assert!(val.is_none());
    }

    #[test]
    fn test_encode_date_time() {
        let tests = [
            (
                DateTime::try_from(
                    chrono::DateTime::parse_from_rfc2822("Mon, 7 Feb 1994 21:52:25 -0800 (PST)")
                        .unwrap(),
                )
                .unwrap(),
                b"\"07-Feb-1994 21:52:25 -0800\"".as_ref(),
            ),
            (
                DateTime::try_from(
                    chrono::DateTime::parse_from_rfc2822("Tue, 1 Jul 2003 10:52:37 +0200")
                        .unwrap(),
                )
                .unwrap(),
                b"\"01-Jul-2003 10:52:37 +0200\"".as_ref(),
            ),
        ];

        for test in tests {
            known_answer_test_encode(test);
        }
    }
}
