use std::borrow::Cow;

#[cfg(not(feature = "quirk_crlf_relaxed"))]
use abnf_core::streaming::crlf;
#[cfg(feature = "quirk_crlf_relaxed")]
use abnf_core::streaming::crlf_relaxed as crlf;
use abnf_core::streaming::sp;
use imap_stream_types::{
    auth::AuthMechanism,
    command::{
        AppendMessage, Command, CommandBody, ListReturnOption, ListSelectionOption,
    },
    core::{AString, Vec1},
    extensions::binary::LiteralOrLiteral8,
    fetch::{Macro, MacroOrMessageDataItemNames},
    flag::{Flag, StoreResponse, StoreType},
    secret::Secret,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::{many1, separated_list0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    auth::auth_type,
    core::{astring, atom, base64, literal, tag_imap},
    datetime::date_time,
    decode::{IMAPErrorKind, IMAPResult},
    extensions::{
        acl::{deleteacl, getacl, listrights, myrights, setacl},
        binary::literal8,
        condstore_qresync::{fetch_modifiers, select_params, store_modifiers},
        enable::enable,
        esearch::esearch,
        id::id,
        idle::idle,
        metadata::{getmetadata, setmetadata},
        r#move::r#move,
        quota::{getquota, getquotaroot, setquota},
        uidplus::uid_expunge,
        urlauth::{genurlauth, resetkey, urlfetch},
    },
    fetch::fetch_att,
    flag::{flag, flag_list},
    mailbox::{list_mailbox, mailbox},
    search::search,
    sequence::sequence_set,
    status::status_att,
};

/// `command = tag SP (
///                     command-any /
///                     command-auth /
///                     command-nonauth /
///                     command-select
///                   ) CRLF`
pub(crate) fn command(input: &[u8]) -> IMAPResult<&[u8], Command> {
    let mut parser_tag = terminated(tag_imap, sp);
    let mut parser_body = terminated(
        alt((command_any, command_auth, command_nonauth, command_select)),
        crlf,
    );

    let (remaining, obtained_tag) = parser_tag(input)?;

    match parser_body(remaining) {
        Ok((remaining, body)) => Ok((
            remaining,
            Command {
                tag: obtained_tag,
                body,
            },
        )),
        Err(mut error) => {
            // If we got an `IMAPErrorKind::Literal`, we fill in the missing `tag`.
            if let nom::Err::Error(ref mut err) | nom::Err::Failure(ref mut err) = error {
                if let IMAPErrorKind::Literal { ref mut tag, .. } = err.kind {
                    *tag = Some(obtained_tag);
                }
            }

            Err(error)
        }
    }
}

// # Command Any

/// ```abnf
/// command-any = "CAPABILITY" /
///               "LOGOUT" /
///               "NOOP" /
///               id ; RFC 2971
/// ```
///
/// Note: Valid in all states
pub(crate) fn command_any(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    alt((
        value(CommandBody::Capability, tag_no_case(b"CAPABILITY")),
        value(CommandBody::Logout, tag_no_case(b"LOGOUT")),
        value(CommandBody::Noop, tag_no_case(b"NOOP")),
        map(id, |parameters| CommandBody::Id { parameters }),
    ))(input)
}

// # Command Auth

/// ```abnf
/// command-auth = append /
///                create /
///                delete /
///                examine /
///                list /
///                lsub /
///                rename /
///                select /
///                status /
///                subscribe /
///                unsubscribe /
///                idle /         ; RFC 2177
///                enable /       ; RFC 5161
///                esearch /      ; RFC 7377
///                getquota /     ; RFC 2087
///                getquotaroot / ; RFC 2087
///                setquota /     ; RFC 2087
///                setmetadata /  ; RFC 5464
///                getmetadata /  ; RFC 5464
///                namespace /    ; RFC 2342
///                setacl / deleteacl / getacl / listrights / myrights / ; RFC 4314
///                genurlauth / resetkey / urlfetch ; RFC 4467
/// ```
///
/// Note: Valid only in Authenticated or Selected state
pub(crate) fn command_auth(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    alt((
        alt((
            append,
            create,
            delete,
            examine,
            list,
            lsub,
            rename,
            select,
            status,
            subscribe,
            unsubscribe,
            idle,
            enable,
            esearch,
        )),
        alt((
            getquotaroot,
            getquota,
            setquota,
            setmetadata,
            getmetadata,
            value(CommandBody::Namespace, tag_no_case(b"NAMESPACE")),
            setacl,
            deleteacl,
            getacl,
            listrights,
            myrights,
            genurlauth,
            resetkey,
            urlfetch,
        )),
    ))(input)
}

/// `append = "APPEND" SP mailbox 1*append-message` (RFC 3502)
///
/// ```abnf
/// append-message = append-opts SP append-data
/// append-opts    = [SP flag-list] [SP date-time]
/// append-data    = literal / literal8
/// ```
///
/// RFC 3501 APPEND is the single-message special case.
pub(crate) fn append(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"APPEND "),
        mailbox,
        many1(append_message),
    ));

    let (remaining, (_, mailbox, messages)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Append {
            mailbox,
            messages: Vec1::unvalidated(messages),
        },
    ))
}

fn append_message(input: &[u8]) -> IMAPResult<&[u8], AppendMessage> {
    let mut parser = tuple((
        opt(preceded(sp, flag_list)),
        opt(preceded(sp, date_time)),
        sp,
        alt((
            map(literal, LiteralOrLiteral8::Literal),
            map(literal8, LiteralOrLiteral8::Literal8),
        )),
    ));

    let (remaining, (flags, date, _, message)) = parser(input)?;

    Ok((
        remaining,
        AppendMessage {
            flags: flags.unwrap_or_default(),
            date,
            message,
        },
    ))
}

/// `create = "CREATE" SP mailbox`
///
/// Note: Use of INBOX gives a NO error
pub(crate) fn create(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = preceded(tag_no_case(b"CREATE "), mailbox);

    let (remaining, mailbox) = parser(input)?;

    Ok((remaining, CommandBody::Create { mailbox }))
}

/// `delete = "DELETE" SP mailbox`
///
/// Note: Use of INBOX gives a NO error
pub(crate) fn delete(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = preceded(tag_no_case(b"DELETE "), mailbox);

    let (remaining, mailbox) = parser(input)?;

    Ok((remaining, CommandBody::Delete { mailbox }))
}

/// `examine = "EXAMINE" SP mailbox [select-params]`
pub(crate) fn examine(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"EXAMINE "),
        mailbox,
        opt(select_params),
    ));

    let (remaining, (_, mailbox, parameters)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Examine {
            mailbox,
            parameters: parameters.unwrap_or_default(),
        },
    ))
}

/// `list = "LIST" [SP list-select-opts] SP mailbox SP mbox-or-pat [SP list-return-opts]`
/// (RFC 5258; RFC 3501 LIST is the no-options, single-pattern special case)
pub(crate) fn list(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"LIST"),
        opt(preceded(sp, list_select_opts)),
        sp,
        mailbox,
        sp,
        alt((
            delimited(
                tag(b"("),
                map(separated_list1(sp, list_mailbox), Vec1::unvalidated),
                tag(b")"),
            ),
            map(list_mailbox, Vec1::from),
        )),
        opt(preceded(sp, list_return_opts)),
    ));

    let (remaining, (_, selection_options, _, reference, _, patterns, return_options)) =
        parser(input)?;

    Ok((
        remaining,
        CommandBody::List {
            selection_options: selection_options.unwrap_or_default(),
            reference,
            patterns,
            return_options: return_options.unwrap_or_default(),
        },
    ))
}

/// ```abnf
/// list-select-opts   = "(" [list-select-option *(SP list-select-option)] ")"
/// list-select-option = "SUBSCRIBED" / "REMOTE" / "RECURSIVEMATCH" / option-extension
/// ```
fn list_select_opts(input: &[u8]) -> IMAPResult<&[u8], Vec<ListSelectionOption>> {
    delimited(
        tag(b"("),
        separated_list0(sp, list_select_option),
        tag(b")"),
    )(input)
}

fn list_select_option(input: &[u8]) -> IMAPResult<&[u8], ListSelectionOption> {
    map(atom, |atom| {
        match atom.as_ref().to_ascii_uppercase().as_ref() {
            "SUBSCRIBED" => ListSelectionOption::Subscribed,
            "REMOTE" => ListSelectionOption::Remote,
            "RECURSIVEMATCH" => ListSelectionOption::RecursiveMatch,
            _ => ListSelectionOption::Other(atom),
        }
    })(input)
}

/// ```abnf
/// list-return-opts = "RETURN" SP "(" [return-option *(SP return-option)] ")"
/// return-option    = "SUBSCRIBED" / "CHILDREN" /
///                    "STATUS" SP "(" status-att *(SP status-att) ")" / ; RFC 5819
///                    option-extension
/// ```
fn list_return_opts(input: &[u8]) -> IMAPResult<&[u8], Vec<ListReturnOption>> {
    preceded(
        tag_no_case(b"RETURN "),
        delimited(
            tag(b"("),
            separated_list0(sp, list_return_option),
            tag(b")"),
        ),
    )(input)
}

fn list_return_option(input: &[u8]) -> IMAPResult<&[u8], ListReturnOption> {
    alt((
        map(
            preceded(
                tag_no_case(b"STATUS "),
                delimited(tag(b"("), separated_list1(sp, status_att), tag(b")")),
            ),
            ListReturnOption::Status,
        ),
        map(atom, |atom| {
            match atom.as_ref().to_ascii_uppercase().as_ref() {
                "SUBSCRIBED" => ListReturnOption::Subscribed,
                "CHILDREN" => ListReturnOption::Children,
                _ => ListReturnOption::Other(atom),
            }
        }),
    ))(input)
}

/// `lsub = "LSUB" SP mailbox SP list-mailbox`
pub(crate) fn lsub(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((tag_no_case(b"LSUB "), mailbox, sp, list_mailbox));

    let (remaining, (_, reference, _, mailbox_wildcard)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Lsub {
            reference,
            mailbox_wildcard,
        },
    ))
}

/// `rename = "RENAME" SP mailbox SP mailbox`
///
/// Note: Use of INBOX as a destination gives a NO error
pub(crate) fn rename(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((tag_no_case(b"RENAME "), mailbox, sp, mailbox));

    let (remaining, (_, mailbox, _, new_mailbox)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Rename {
            from: mailbox,
            to: new_mailbox,
        },
    ))
}

/// `select = "SELECT" SP mailbox [select-params]`
///
/// The optional parameter list carries `CONDSTORE`/`QRESYNC` (RFC 7162).
pub(crate) fn select(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"SELECT "),
        mailbox,
        opt(select_params),
    ));

    let (remaining, (_, mailbox, parameters)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Select {
            mailbox,
            parameters: parameters.unwrap_or_default(),
        },
    ))
}

/// `status = "STATUS" SP mailbox SP "(" status-att *(SP status-att) ")"`
pub(crate) fn status(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"STATUS "),
        mailbox,
        delimited(tag(b" ("), separated_list0(sp, status_att), tag(b")")),
    ));

    let (remaining, (_, mailbox, item_names)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Status {
            mailbox,
            item_names,
        },
    ))
}

/// `subscribe = "SUBSCRIBE" SP mailbox`
pub(crate) fn subscribe(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = preceded(tag_no_case(b"SUBSCRIBE "), mailbox);

    let (remaining, mailbox) = parser(input)?;

    Ok((remaining, CommandBody::Subscribe { mailbox }))
}

/// `unsubscribe = "UNSUBSCRIBE" SP mailbox`
pub(crate) fn unsubscribe(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = preceded(tag_no_case(b"UNSUBSCRIBE "), mailbox);

    let (remaining, mailbox) = parser(input)?;

    Ok((remaining, CommandBody::Unsubscribe { mailbox }))
}

// # Command NonAuth

/// `command-nonauth = login / authenticate / "STARTTLS"`
///
/// Note: Valid only when in Not Authenticated state
pub(crate) fn command_nonauth(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = alt((
        login,
        map(authenticate, |(mechanism, initial_response)| {
            CommandBody::Authenticate {
                mechanism,
                initial_response,
            }
        }),
        value(CommandBody::StartTls, tag_no_case(b"STARTTLS")),
    ));

    let (remaining, parsed_command_nonauth) = parser(input)?;

    Ok((remaining, parsed_command_nonauth))
}

/// `login = "LOGIN" SP userid SP password`
pub(crate) fn login(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((tag_no_case(b"LOGIN"), sp, userid, sp, password));

    let (remaining, (_, _, username, _, password)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Login {
            username,
            password: Secret::new(password),
        },
    ))
}

#[inline]
/// `userid = astring`
pub(crate) fn userid(input: &[u8]) -> IMAPResult<&[u8], AString> {
    astring(input)
}

#[inline]
/// `password = astring`
pub(crate) fn password(input: &[u8]) -> IMAPResult<&[u8], AString> {
    astring(input)
}

/// `authenticate = "AUTHENTICATE" SP auth-type [SP (base64 / "=")]` (edited)
///
/// ```text
///                                            Added by SASL-IR
///                                            |
///                                            vvvvvvvvvvvvvvvvvvv
/// authenticate = "AUTHENTICATE" SP auth-type [SP (base64 / "=")] *(CRLF base64)
///                ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
///                |
///                This is parsed here.
///                CRLF is parsed by upper command parser.
/// ```
#[allow(clippy::type_complexity)]
pub(crate) fn authenticate(
    input: &[u8],
) -> IMAPResult<&[u8], (AuthMechanism, Option<Secret<Cow<[u8]>>>)> {
    let mut parser = tuple((
        tag_no_case(b"AUTHENTICATE "),
        auth_type,
        opt(preceded(
            sp,
            alt((
                map(base64, |data| Secret::new(Cow::Owned(data))),
                value(Secret::new(Cow::Borrowed(&b""[..])), tag("=")),
            )),
        )),
    ));

    let (remaining, (_, auth_type, raw_data)) = parser(input)?;

    // Server must send a continuation request ("+ ") at this point...

    Ok((remaining, (auth_type, raw_data)))
}

// # Command Select

/// ```abnf
/// command-select = "CHECK" /
///                  "CLOSE" /
///                  "EXPUNGE" /
///                  copy /
///                  fetch /
///                  store /
///                  uid /
///                  search /
///                  move /     ; RFC 6851
///                  "UNSELECT" ; RFC 3691
/// ```
///
/// Note: Valid only when in Selected state
pub(crate) fn command_select(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    alt((
        value(CommandBody::Check, tag_no_case(b"CHECK")),
        value(CommandBody::Close, tag_no_case(b"CLOSE")),
        value(CommandBody::Expunge, tag_no_case(b"EXPUNGE")),
        copy,
        fetch,
        store,
        uid,
        search,
        value(CommandBody::Unselect, tag_no_case(b"UNSELECT")),
        r#move,
    ))(input)
}

/// `copy = "COPY" SP sequence-set SP mailbox`
pub(crate) fn copy(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((tag_no_case(b"COPY"), sp, sequence_set, sp, mailbox));

    let (remaining, (_, _, sequence_set, _, mailbox)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Copy {
            sequence_set,
            mailbox,
            uid: false,
        },
    ))
}

/// `fetch = "FETCH" SP sequence-set SP ("ALL" /
///                                      "FULL" /
///                                      "FAST" /
///                                      fetch-att / "(" fetch-att *(SP fetch-att) ")")
///          [fetch-modifiers]` ; RFC 7162
pub(crate) fn fetch(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"FETCH"),
        sp,
        sequence_set,
        sp,
        alt((
            value(
                MacroOrMessageDataItemNames::Macro(Macro::All),
                tag_no_case(b"ALL"),
            ),
            value(
                MacroOrMessageDataItemNames::Macro(Macro::Fast),
                tag_no_case(b"FAST"),
            ),
            value(
                MacroOrMessageDataItemNames::Macro(Macro::Full),
                tag_no_case(b"FULL"),
            ),
            map(fetch_att, |fetch_att| {
                MacroOrMessageDataItemNames::MessageDataItemNames(vec![fetch_att])
            }),
            map(
                delimited(tag(b"("), separated_list0(sp, fetch_att), tag(b")")),
                MacroOrMessageDataItemNames::MessageDataItemNames,
            ),
        )),
        opt(fetch_modifiers),
    ));

    let (remaining, (_, _, sequence_set, _, macro_or_item_names, modifiers)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Fetch {
            sequence_set,
            macro_or_item_names,
            modifiers: modifiers.unwrap_or_default(),
            uid: false,
        },
    ))
}

/// `store = "STORE" SP sequence-set [store-modifiers] SP store-att-flags`
pub(crate) fn store(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"STORE"),
        sp,
        sequence_set,
        opt(store_modifiers),
        sp,
        store_att_flags,
    ));

    let (remaining, (_, _, sequence_set, modifiers, _, (kind, response, flags))) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Store {
            sequence_set,
            kind,
            response,
            flags,
            modifiers: modifiers.unwrap_or_default(),
            uid: false,
        },
    ))
}

/// `store-att-flags = (["+" / "-"] "FLAGS" [".SILENT"]) SP (flag-list / (flag *(SP flag)))`
pub(crate) fn store_att_flags(
    input: &[u8],
) -> IMAPResult<&[u8], (StoreType, StoreResponse, Vec<Flag>)> {
    let mut parser = tuple((
        tuple((
            map(
                opt(alt((
                    value(StoreType::Add, tag(b"+")),
                    value(StoreType::Remove, tag(b"-")),
                ))),
                |type_| match type_ {
                    Some(type_) => type_,
                    None => StoreType::Replace,
                },
            ),
            tag_no_case(b"FLAGS"),
            map(opt(tag_no_case(b".SILENT")), |x| match x {
                Some(_) => StoreResponse::Silent,
                None => StoreResponse::Answer,
            }),
        )),
        sp,
        alt((flag_list, separated_list1(sp, flag))),
    ));

    let (remaining, ((store_type, _, store_response), _, flag_list)) = parser(input)?;

    Ok((remaining, (store_type, store_response, flag_list)))
}

/// `uid = "UID" SP
///        (copy / fetch / search / store / move / uid-expunge / esearch)`
///
/// Note: Unique identifiers are used instead of message sequence numbers
pub(crate) fn uid(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"UID"),
        sp,
        alt((copy, fetch, search, store, r#move, uid_expunge, esearch)),
    ));

    let (remaining, (_, _, mut cmd)) = parser(input)?;

    match cmd {
        CommandBody::Copy { ref mut uid, .. }
        | CommandBody::Fetch { ref mut uid, .. }
        | CommandBody::Search { ref mut uid, .. }
        | CommandBody::Store { ref mut uid, .. }
        | CommandBody::Move { ref mut uid, .. }
        | CommandBody::ExtendedSearch { ref mut uid, .. } => *uid = true,
        // `UID EXPUNGE` is UID-only; there is no flag to set.
        CommandBody::ExpungeUid { .. } => {}
        _ => unreachable!(),
    }

    Ok((remaining, cmd))
}

#[cfg(test)]
mod tests {
    use imap_stream_types::{
        core::{Literal, Tag},
        mailbox::Mailbox,
        sequence::SequenceSet,
    };

    use super::*;
    use crate::testing::kat_inverse_command;

    #[test]
    fn test_parse_command_noop() {
        let (rem, val) = command(b"a NOOP\r\n").unwrap();
        assert_eq!(rem, b"");
        assert_eq!(val, Command::new("a", CommandBody::Noop).unwrap());
    }

    #[test]
    fn test_parse_command_fills_literal_tag() {
        match command(b"a LOGIN {3}\r\n") {
            Err(nom::Err::Failure(error)) => match error.kind {
                IMAPErrorKind::Literal { tag, length, .. } => {
                    assert_eq!(tag, Some(Tag::try_from("a").unwrap()));
                    assert_eq!(length, 3);
                }
                _ => panic!("expected literal error"),
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_uid_commands() {
        let (_, val) = command(b"a UID FETCH 1 FLAGS\r\n").unwrap();
        assert!(matches!(val.body, CommandBody::Fetch { uid: true, .. }));

        let (_, val) = command(b"a UID EXPUNGE 1:5\r\n").unwrap();
        assert!(matches!(val.body, CommandBody::ExpungeUid { .. }));

        let (_, val) = command(b"a UID MOVE $ Archive\r\n").unwrap();
        assert!(matches!(
            val.body,
            CommandBody::Move {
                uid: true,
                sequence_set: SequenceSet::SavedResult,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_fetch_with_changedsince() {
        let (_, val) = command(b"a FETCH 1:* (FLAGS) (CHANGEDSINCE 12345)\r\n").unwrap();

        match val.body {
            CommandBody::Fetch { modifiers, .. } => assert_eq!(modifiers.len(), 1),
            _ => panic!("expected FETCH"),
        }
    }

    #[test]
    fn test_parse_store_with_unchangedsince() {
        let (_, val) =
            command(b"a STORE 1,3 (UNCHANGEDSINCE 12121230045) +FLAGS.SILENT (\\Deleted)\r\n")
                .unwrap();

        match val.body {
            CommandBody::Store {
                modifiers,
                kind,
                response,
                ..
            } => {
                assert_eq!(modifiers.len(), 1);
                assert_eq!(kind, StoreType::Add);
                assert_eq!(response, StoreResponse::Silent);
            }
            _ => panic!("expected STORE"),
        }
    }

    #[test]
    fn test_parse_list_extended() {
        let (_, val) = command(b"a LIST (SUBSCRIBED) \"\" (\"INBOX\" \"Lists/*\") RETURN (CHILDREN STATUS (MESSAGES))\r\n").unwrap();

        match val.body {
            CommandBody::List {
                selection_options,
                patterns,
                return_options,
                ..
            } => {
                assert_eq!(selection_options, vec![ListSelectionOption::Subscribed]);
                assert_eq!(patterns.len(), 2);
                assert_eq!(return_options.len(), 2);
            }
            _ => panic!("expected LIST"),
        }
    }

    #[test]
    fn test_parse_multiappend() {
        let (_, val) = command(
            b"a APPEND saved-messages (\\Seen) {5}\r\nabcde (\\Seen) {3}\r\nxyz\r\n",
        )
        .unwrap();

        match val.body {
            CommandBody::Append { messages, .. } => assert_eq!(messages.len(), 2),
            _ => panic!("expected APPEND"),
        }
    }

    #[test]
    fn test_kat_inverse_command_samples() {
        kat_inverse_command(&[
            (
                b"a NOOP\r\n".as_ref(),
                b"".as_ref(),
                Command::new("a", CommandBody::Noop).unwrap(),
            ),
            (
                b"a SELECT {5}\r\ninbox\r\nxxx",
                b"xxx",
                Command::new(
                    "a",
                    CommandBody::Select {
                        mailbox: Mailbox::Inbox,
                        parameters: vec![],
                    },
                )
                .unwrap(),
            ),
            (
                b"a APPEND inbox {5}\r\nhello\r\n",
                b"",
                Command::new(
                    "a",
                    CommandBody::Append {
                        mailbox: Mailbox::Inbox,
                        messages: Vec1::from(AppendMessage {
                            flags: vec![],
                            date: None,
                            message: LiteralOrLiteral8::Literal(
                                Literal::try_from(b"hello".as_ref()).unwrap(),
                            ),
                        }),
                    },
                )
                .unwrap(),
            ),
        ]);
    }
}
