use imap_stream_types::{
    core::Vec1,
    sequence::{SeqOrUid, Sequence, SequenceSet},
};
use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, value},
    multi::separated_list1,
    sequence::tuple,
};

use crate::{core::nz_number, decode::IMAPResult};

/// `sequence-set = (seq-number / seq-range) ["," sequence-set]`
///
/// RFC 5182 adds the saved-result reference:
///
/// ```abnf
/// sequence-set     =/ seq-last-command
/// seq-last-command = "$"
/// ```
///
/// Simplified:
///
/// `sequence-set = "$" / (seq-number / seq-range) *("," (seq-number / seq-range))`
///
/// Ranges are normalized so that the smaller endpoint comes first; the set
/// keeps its elements in input order.
pub(crate) fn sequence_set(input: &[u8]) -> IMAPResult<&[u8], SequenceSet> {
    alt((
        value(SequenceSet::SavedResult, tag(b"$")),
        map(
            separated_list1(
                tag(b","),
                alt((
                    // Ordering is important!
                    map(seq_range, |(from, to)| {
                        Sequence::Range(from, to).normalized()
                    }),
                    map(seq_number, Sequence::Single),
                )),
            ),
            |set| SequenceSet::Sequences(Vec1::unvalidated(set)),
        ),
    ))(input)
}

/// `seq-range = seq-number ":" seq-number`
///
/// Two seq-number values and all values between these two regardless of
/// order.
///
/// Example: 2:4 and 4:2 are equivalent and indicate values 2, 3, and 4.
pub(crate) fn seq_range(input: &[u8]) -> IMAPResult<&[u8], (SeqOrUid, SeqOrUid)> {
    let mut parser = tuple((seq_number, tag(b":"), seq_number));

    let (remaining, (from, _, to)) = parser(input)?;

    Ok((remaining, (from, to)))
}

/// `seq-number = nz-number / "*"`
///
/// "*" represents the largest number in use.
pub(crate) fn seq_number(input: &[u8]) -> IMAPResult<&[u8], SeqOrUid> {
    alt((
        map(nz_number, SeqOrUid::Value),
        value(SeqOrUid::Asterisk, tag(b"*")),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{EncodeContext, EncodeIntoContext};

    #[test]
    fn test_parse_sequence_set() {
        let (rem, val) = sequence_set(b"1:*?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(val, SequenceSet::try_from("1:*").unwrap());

        let (rem, val) = sequence_set(b"$ ").unwrap();
        assert_eq!(rem, b" ");
        assert_eq!(val, SequenceSet::SavedResult);

        let (_, val) = sequence_set(b"1:*,5?").unwrap();
        assert_eq!(val, SequenceSet::try_from("1:*,5").unwrap());
    }

    #[test]
    fn test_parse_sequence_set_normalizes_ranges() {
        // `4:2` is parsed as `2:4` ...
        let (_, val) = sequence_set(b"4:2 ").unwrap();
        assert_eq!(val, SequenceSet::try_from("2:4").unwrap());

        // ... and `*:10` as `10:*` (`*` is the largest value in use).
        let (_, val) = sequence_set(b"*:10 ").unwrap();
        assert_eq!(val, SequenceSet::try_from("10:*").unwrap());
    }

    #[test]
    fn test_parse_seq_number() {
        // Must not be 0.
        assert!(seq_number(b"0?").is_err());

        assert!(seq_number(b"1?").is_ok());
        assert!(seq_number(b"*?").is_ok());
    }

    #[test]
    fn test_encode_of_some_sequence_sets() {
        let tests = [
            (SequenceSet::try_from("1").unwrap(), b"1".as_ref()),
            (SequenceSet::try_from("*").unwrap(), b"*".as_ref()),
            (SequenceSet::SavedResult, b"$".as_ref()),
            (SequenceSet::try_from("1:*").unwrap(), b"1:*".as_ref()),
            (SequenceSet::try_from("1,2:4,5").unwrap(), b"1,2:4,5".as_ref()),
        ];

        for (test, expected) in tests {
            let mut ctx = EncodeContext::new();
            test.encode_ctx(&mut ctx).unwrap();

            assert_eq!(ctx.dump(), expected);
        }
    }
}
