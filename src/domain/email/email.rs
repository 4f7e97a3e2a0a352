// mailsnap, a Rust library to export unread emails.
// Copyright (C) 2022  soywod <clement.douin@posteo.net>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Email module.
//!
//! This module contains the extraction of the exported fields from a
//! raw email.

use log::{trace, warn};
use mailparse::{MailHeaderMap, MailParseError, ParsedMail};
use thiserror::Error;

use crate::{is_message_rfc822, is_multipart, is_text_plain, PartsIterator};

/// Represents a part that could not be read. It never aborts the
/// parsing: the part is skipped and the traversal goes on.
#[derive(Debug, Error)]
pub enum PartError {
    #[error("cannot parse email from raw data")]
    ParseRawEmailError(#[source] MailParseError),
    #[error("cannot decode body of part {1} ({2})")]
    DecodePartBodyError(#[source] MailParseError, usize, String),
    #[error("cannot parse email attached at part {1}")]
    ParseAttachedEmailError(#[source] MailParseError, usize),
}

/// Represents the fields exported for one email. Absent fields are
/// empty strings.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Record {
    pub from: String,
    pub date: String,
    pub subject: String,
    /// Content of the first decodable `text/plain` part.
    pub body: String,
}

impl Record {
    /// Returns the record as a row of the export table, in the
    /// column order of [`crate::HEADER`].
    pub fn to_row(&self) -> [&str; 4] {
        [
            self.from.as_str(),
            self.date.as_str(),
            self.subject.as_str(),
            self.body.as_str(),
        ]
    }
}

/// Parses the given raw email. Unreadable parts are logged and
/// skipped, see [`parse_with_errors`].
pub fn parse(raw: &[u8]) -> Record {
    parse_with_errors(raw).0
}

/// Parses the given raw email and returns the record along with the
/// parts that could not be read.
///
/// This function is pure: it performs no I/O and the same bytes
/// always give the same record.
pub fn parse_with_errors(raw: &[u8]) -> (Record, Vec<PartError>) {
    let mut errors = Vec::new();

    let parsed = match mailparse::parse_mail(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            let err = PartError::ParseRawEmailError(err);
            warn!("skipping unreadable email: {}", err);
            errors.push(err);
            return (Record::default(), errors);
        }
    };

    let headers = parsed.get_headers();
    let header = |key: &str| headers.get_first_value(key).unwrap_or_default();

    let mut record = Record {
        from: header("From"),
        date: header("Date"),
        subject: header("Subject"),
        body: String::new(),
    };

    let text_plain_body = if is_multipart(&parsed) {
        find_text_plain_body(PartsIterator::new(&parsed), &mut 0, &mut errors)
    } else {
        find_text_plain_body([&parsed], &mut 0, &mut errors)
    };

    for err in &errors {
        warn!("skipping email part: {}", err);
    }

    if let Some(body) = text_plain_body {
        record.body = body;
    }

    trace!("parsed record: {:?}", record);
    (record, errors)
}

/// Returns the body of the first `text/plain` part that decodes,
/// collecting the errors met on the way. Attached emails are walked
/// too, right after their `message/rfc822` part.
///
/// `index` counts the visited parts in document order, nested ones
/// included.
fn find_text_plain_body<'a, I>(
    parts: I,
    index: &mut usize,
    errors: &mut Vec<PartError>,
) -> Option<String>
where
    I: IntoIterator<Item = &'a ParsedMail<'a>>,
{
    for part in parts {
        let pos = *index;
        *index += 1;

        if is_message_rfc822(part) {
            let raw = match part.get_body_raw() {
                Ok(raw) => raw,
                Err(err) => {
                    let mimetype = part.ctype.mimetype.clone();
                    errors.push(PartError::DecodePartBodyError(err, pos, mimetype));
                    continue;
                }
            };
            match mailparse::parse_mail(&raw) {
                Ok(attached) => {
                    let body = find_text_plain_body(PartsIterator::new(&attached), index, errors);
                    if body.is_some() {
                        return body;
                    }
                }
                Err(err) => errors.push(PartError::ParseAttachedEmailError(err, pos)),
            }
        } else if is_text_plain(part) {
            match part.get_body() {
                Ok(body) => return Some(body),
                Err(err) => {
                    let mimetype = part.ctype.mimetype.clone();
                    errors.push(PartError::DecodePartBodyError(err, pos, mimetype));
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use concat_with::concat_line;

    use super::*;

    #[test]
    fn flat_text_plain() {
        let raw = concat_line!(
            "From: alice@localhost",
            "To: patrick@localhost",
            "Date: Tue, 1 Nov 2022 10:00:00 +0100",
            "Subject: Plain message",
            "Content-Type: text/plain; charset=utf-8",
            "",
            "Ceci est un message.",
        );

        let (record, errors) = parse_with_errors(raw.as_bytes());

        assert!(errors.is_empty());
        assert_eq!("alice@localhost", record.from);
        assert_eq!("Tue, 1 Nov 2022 10:00:00 +0100", record.date);
        assert_eq!("Plain message", record.subject);
        assert_eq!("Ceci est un message.", record.body);
    }

    #[test]
    fn flat_text_html_has_no_body() {
        let raw = concat_line!(
            "From: alice@localhost",
            "Subject: Html message",
            "Content-Type: text/html",
            "",
            "<h1>Hello!</h1>",
        );

        let record = parse(raw.as_bytes());

        assert_eq!("Html message", record.subject);
        assert_eq!("", record.body);
    }

    #[test]
    fn missing_headers_are_empty() {
        let record = parse(b"Content-Type: text/plain\n\nHello!");

        assert_eq!("", record.from);
        assert_eq!("", record.date);
        assert_eq!("", record.subject);
        assert_eq!("Hello!", record.body);
    }

    #[test]
    fn encoded_subject_is_decoded() {
        let raw = concat_line!(
            "From: alice@localhost",
            "Subject: =?utf-8?q?Caf=C3=A9?=",
            "",
            "",
        );

        assert_eq!("Café", parse(raw.as_bytes()).subject);
    }

    #[test]
    fn multipart_takes_first_text_plain_part() {
        let raw = concat_line!(
            "MIME-Version: 1.0",
            "From: from@localhost",
            "Subject: subject",
            "Content-Type: multipart/mixed; boundary=boundary",
            "",
            "--boundary",
            "Content-Type: text/html",
            "",
            "<h1>Hello!</h1>",
            "--boundary",
            "Content-Type: text/plain",
            "",
            "Hello!",
            "--boundary",
            "Content-Type: text/plain",
            "",
            "How are you?",
            "--boundary--",
        );

        let (record, errors) = parse_with_errors(raw.as_bytes());

        assert!(errors.is_empty());
        assert_eq!("Hello!", record.body.trim_end());
    }

    #[test]
    fn multipart_searches_nested_parts() {
        let raw = concat_line!(
            "From: from@localhost",
            "Content-Type: multipart/mixed; boundary=outer",
            "",
            "--outer",
            "Content-Type: multipart/alternative; boundary=inner",
            "",
            "--inner",
            "Content-Type: text/plain",
            "",
            "Nested!",
            "--inner",
            "Content-Type: text/html",
            "",
            "<p>Nested!</p>",
            "--inner--",
            "--outer",
            "Content-Type: text/plain",
            "",
            "Outer!",
            "--outer--",
        );

        assert_eq!("Nested!", parse(raw.as_bytes()).body.trim_end());
    }

    #[test]
    fn multipart_without_text_plain_has_no_body() {
        let raw = concat_line!(
            "From: from@localhost",
            "Content-Type: multipart/mixed; boundary=boundary",
            "",
            "--boundary",
            "Content-Type: text/html",
            "",
            "<h1>Hello!</h1>",
            "--boundary",
            "Content-Type: application/octet-stream",
            "Content-Transfer-Encoding: base64",
            "",
            "SGVsbG8h",
            "--boundary--",
        );

        let (record, errors) = parse_with_errors(raw.as_bytes());

        assert!(errors.is_empty());
        assert_eq!("", record.body);
    }

    #[test]
    fn undecodable_part_is_skipped() {
        let raw = concat_line!(
            "From: from@localhost",
            "Content-Type: multipart/mixed; boundary=boundary",
            "",
            "--boundary",
            "Content-Type: text/plain",
            "Content-Transfer-Encoding: base64",
            "",
            "@@@@ not base64 @@@@",
            "--boundary",
            "Content-Type: text/plain",
            "",
            "Readable!",
            "--boundary--",
        );

        let (record, errors) = parse_with_errors(raw.as_bytes());

        assert_eq!(1, errors.len());
        assert!(matches!(
            errors[0],
            PartError::DecodePartBodyError(_, 1, ref mimetype) if mimetype == "text/plain"
        ));
        assert_eq!("Readable!", record.body.trim_end());
    }

    #[test]
    fn multipart_searches_attached_email() {
        let raw = concat_line!(
            "From: from@localhost",
            "Subject: Fwd: hello",
            "Content-Type: multipart/mixed; boundary=boundary",
            "",
            "--boundary",
            "Content-Type: text/html",
            "",
            "<p>See attached</p>",
            "--boundary",
            "Content-Type: message/rfc822",
            "",
            "From: inner@localhost",
            "Subject: hello",
            "Content-Type: text/plain",
            "",
            "Inner body",
            "--boundary--",
        );

        let (record, errors) = parse_with_errors(raw.as_bytes());

        assert!(errors.is_empty());
        assert_eq!("from@localhost", record.from);
        assert_eq!("Fwd: hello", record.subject);
        assert_eq!("Inner body", record.body.trim_end());
    }

    #[test]
    fn attached_email_parts_keep_document_order() {
        let raw = concat_line!(
            "From: from@localhost",
            "Content-Type: multipart/mixed; boundary=outer",
            "",
            "--outer",
            "Content-Type: message/rfc822",
            "",
            "From: inner@localhost",
            "Content-Type: multipart/alternative; boundary=inner",
            "",
            "--inner",
            "Content-Type: text/plain",
            "Content-Transfer-Encoding: base64",
            "",
            "@@@@",
            "--inner--",
            "--outer",
            "Content-Type: text/plain",
            "",
            "Outer body",
            "--outer--",
        );

        let (record, errors) = parse_with_errors(raw.as_bytes());

        // root, message/rfc822, attached root, then its text/plain part
        assert_eq!(1, errors.len());
        assert!(matches!(errors[0], PartError::DecodePartBodyError(_, 3, _)));
        assert_eq!("Outer body", record.body.trim_end());
    }

    #[test]
    fn parse_is_idempotent() {
        let raw = concat_line!(
            "From: from@localhost",
            "Date: Tue, 1 Nov 2022 10:00:00 +0100",
            "Subject: subject",
            "Content-Type: multipart/alternative; boundary=boundary",
            "",
            "--boundary",
            "Content-Type: text/plain",
            "",
            "Hello!",
            "--boundary--",
        );

        assert_eq!(parse(raw.as_bytes()), parse(raw.as_bytes()));
    }

    #[test]
    fn record_to_row() {
        let record = Record {
            from: "from".into(),
            date: "date".into(),
            subject: "subject".into(),
            body: "body".into(),
        };

        assert_eq!(["from", "date", "subject", "body"], record.to_row());
    }
}
