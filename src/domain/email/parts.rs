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

//! Email parts module.
//!
//! This module contains the traversal of MIME parts.

use mailparse::ParsedMail;

/// Iterator over the parts of a parsed email, in document order.
///
/// The root part comes first, then each subpart is visited
/// depth-first before its next sibling. This is the order in which
/// parts appear in the raw message.
#[derive(Debug)]
pub struct PartsIterator<'a> {
    stack: Vec<&'a ParsedMail<'a>>,
}

impl<'a> PartsIterator<'a> {
    pub fn new(part: &'a ParsedMail<'a>) -> Self {
        Self { stack: vec![part] }
    }
}

impl<'a> Iterator for PartsIterator<'a> {
    type Item = &'a ParsedMail<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let part = self.stack.pop()?;
        // reversed so that the first subpart is popped first
        self.stack.extend(part.subparts.iter().rev());
        Some(part)
    }
}

/// Returns `true` if the given part is a `multipart/*` container.
pub fn is_multipart(part: &ParsedMail) -> bool {
    part.ctype.mimetype.starts_with("multipart/")
}

/// Returns `true` if the given part is an attached email. Its subparts
/// are not parsed: the attached email is the raw body of the part.
pub fn is_message_rfc822(part: &ParsedMail) -> bool {
    part.ctype.mimetype == "message/rfc822"
}

/// Returns `true` if the given part holds plain text. A part without
/// `Content-Type` header is plain text.
pub fn is_text_plain(part: &ParsedMail) -> bool {
    part.ctype.mimetype == "text/plain"
}

#[cfg(test)]
mod tests {
    use concat_with::concat_line;
    use lettre::{
        message::{MultiPart, SinglePart},
        Message,
    };

    use super::*;

    fn mimetypes<'a>(email: &'a ParsedMail<'a>) -> Vec<&'a str> {
        PartsIterator::new(email)
            .map(|part| part.ctype.mimetype.as_str())
            .collect()
    }

    #[test]
    fn one_part_no_subpart() {
        let email = Message::builder()
            .from("from@localhost".parse().unwrap())
            .to("to@localhost".parse().unwrap())
            .singlepart(SinglePart::plain(String::new()))
            .unwrap()
            .formatted();
        let email = mailparse::parse_mail(&email).unwrap();

        assert_eq!(vec!["text/plain"], mimetypes(&email));
        assert!(!is_multipart(&email));
        assert!(is_text_plain(&email));
    }

    #[test]
    fn nested_parts_in_document_order() {
        let email = Message::builder()
            .from("from@localhost".parse().unwrap())
            .to("to@localhost".parse().unwrap())
            .multipart(
                MultiPart::mixed()
                    .multipart(
                        MultiPart::alternative()
                            .singlepart(SinglePart::plain(String::from("plain")))
                            .singlepart(SinglePart::html(String::from("<p>html</p>"))),
                    )
                    .singlepart(SinglePart::plain(String::from("second plain"))),
            )
            .unwrap()
            .formatted();
        let email = mailparse::parse_mail(&email).unwrap();

        assert_eq!(
            vec![
                "multipart/mixed",
                "multipart/alternative",
                "text/plain",
                "text/html",
                "text/plain",
            ],
            mimetypes(&email)
        );
        assert!(is_multipart(&email));
    }

    #[test]
    fn attached_email_is_not_walked() {
        let raw = concat_line!(
            "Content-Type: multipart/mixed; boundary=boundary",
            "",
            "--boundary",
            "Content-Type: message/rfc822",
            "",
            "Content-Type: text/plain",
            "",
            "Inner body",
            "--boundary--",
        );
        let email = mailparse::parse_mail(raw.as_bytes()).unwrap();

        assert_eq!(vec!["multipart/mixed", "message/rfc822"], mimetypes(&email));
        assert!(is_message_rfc822(&email.subparts[0]));
    }

    #[test]
    fn missing_content_type_is_text_plain() {
        let raw = concat_line!("From: from@localhost", "Subject: subject", "", "Hello!");
        let email = mailparse::parse_mail(raw.as_bytes()).unwrap();

        assert!(is_text_plain(&email));
    }
}
