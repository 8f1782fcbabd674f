//! JUnit verdict loader.
//!
//! Failing case ids are pulled from the `message` attribute of every
//! `<failure>` element. A message lists one id per line in the form
//!
//! ```text
//! 1. Test Case ID: 7dQuzM
//! Test Case ID: Qb0fJx
//! ```
//!
//! with the numeric index prefix optional.
//!
//! The report is tokenized with regular expressions and checked for
//! well-formedness while it is scanned: balanced tags, a single root
//! element, quoted attributes and valid references. A document that fails
//! the check is rejected, since a report read as "no failures" would credit
//! every response as passing. Comments, CDATA sections and processing
//! instructions are skipped. Attribute values get XML normalization: literal
//! line breaks and tabs become spaces, while `&#10;` still produces a newline.

use super::VerdictProvider;
use crate::endpoint::FailingCaseIds;
use crate::result::{ApicovError, ApicovResult};
use regex::Regex;
use std::fmt::Display;
use std::path::Path;

const NAME: &str = r"[A-Za-z_:][-A-Za-z0-9_:.]*";

/// Compiled patterns for scanning failure reports
#[derive(Debug, Clone)]
pub struct CaseIdMatcher {
    token: Regex,
    attribute: Regex,
    reference: Regex,
    case_id_line: Regex,
}

impl CaseIdMatcher {
    /// Compile the patterns
    ///
    /// # Errors
    ///
    /// Returns error if a pattern fails to compile
    pub fn new() -> ApicovResult<Self> {
        let compile = |pattern: &str| Regex::new(pattern).map_err(|e| ApicovError::verdict(e.to_string()));
        let token = format!(
            r#"(?s)(?P<comment><!--.*?-->)|(?P<cdata><!\[CDATA\[.*?\]\]>)|(?P<pi><\?.*?\?>)|(?P<doctype><!DOCTYPE(?:[^>\[]|\[[^\]]*\])*>)|</(?P<close>{NAME})\s*>|<(?P<open>{NAME})(?P<attrs>(?:\s+{NAME}\s*=\s*(?:"[^"<]*"|'[^'<]*'))*)\s*(?P<empty>/)?>|(?P<text>[^<]+)|(?P<bad><)"#
        );
        let attribute = format!(r#"(?P<name>{NAME})\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#);
        Ok(Self {
            token: compile(&token)?,
            attribute: compile(&attribute)?,
            reference: compile(r"^&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z_][A-Za-z0-9._-]*);")?,
            case_id_line: compile(r"^(?:\d+\.\s*)?Test Case ID:(.*)$")?,
        })
    }

    /// Case id carried by one message line, if any
    #[must_use]
    pub fn case_id<'a>(&self, line: &'a str) -> Option<&'a str> {
        let captures = self.case_id_line.captures(line.trim())?;
        let id = captures.get(1)?.as_str().trim();
        (!id.is_empty()).then_some(id)
    }

    /// Decoded `message` attributes of every `<failure>` element
    ///
    /// # Errors
    ///
    /// Returns error if the document is not well-formed XML
    pub fn failure_messages(&self, xml: &str) -> ApicovResult<Vec<String>> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut open: Vec<&str> = Vec::new();
        let mut root_seen = false;
        let mut messages = Vec::new();

        for token in self.token.captures_iter(xml) {
            let Some(whole) = token.get(0) else {
                continue;
            };
            let at = whole.start();

            if token.name("comment").is_some() || token.name("pi").is_some() {
                continue;
            }
            if token.name("cdata").is_some() {
                if open.is_empty() {
                    return Err(malformed("CDATA section outside the root element", at));
                }
                continue;
            }
            if token.name("doctype").is_some() {
                if root_seen {
                    return Err(malformed("DOCTYPE after the root element", at));
                }
                continue;
            }
            if let Some(name) = token.name("close") {
                match open.pop() {
                    Some(top) if top == name.as_str() => continue,
                    Some(top) => {
                        return Err(malformed(
                            format!("</{}> closes <{top}>", name.as_str()),
                            at,
                        ))
                    }
                    None => return Err(malformed(format!("unexpected </{}>", name.as_str()), at)),
                }
            }
            if let Some(name) = token.name("open") {
                if open.is_empty() && root_seen {
                    return Err(malformed("content after the root element", at));
                }
                root_seen = true;
                let attrs = token.name("attrs").map_or("", |m| m.as_str());
                if let Some(message) = self.scan_attributes(name.as_str(), attrs, at)? {
                    messages.push(message);
                }
                if token.name("empty").is_none() {
                    open.push(name.as_str());
                }
                continue;
            }
            if let Some(text) = token.name("text") {
                if open.is_empty() {
                    if !text.as_str().trim().is_empty() {
                        return Err(malformed("text outside the root element", at));
                    }
                } else {
                    self.decode_references(text.as_str())
                        .map_err(|reason| malformed(reason, at))?;
                }
                continue;
            }
            return Err(malformed("invalid or unterminated markup", at));
        }

        if !root_seen {
            return Err(malformed("no root element", xml.len()));
        }
        if let Some(name) = open.last() {
            return Err(malformed(format!("<{name}> is never closed"), xml.len()));
        }
        Ok(messages)
    }

    /// Scan a whole report for failing ids
    ///
    /// # Errors
    ///
    /// Returns error if the document is not well-formed XML
    pub fn failing_ids(&self, xml: &str) -> ApicovResult<FailingCaseIds> {
        let mut ids = FailingCaseIds::new();
        for message in self.failure_messages(xml)? {
            for line in message.lines() {
                if let Some(id) = self.case_id(line) {
                    ids.insert(id);
                }
            }
        }
        Ok(ids)
    }

    /// Check every attribute of a tag; returns the decoded `message` of a `<failure>`
    fn scan_attributes(&self, element: &str, attrs: &str, at: usize) -> ApicovResult<Option<String>> {
        let mut names: Vec<&str> = Vec::new();
        let mut message = None;
        for attr in self.attribute.captures_iter(attrs) {
            let Some(name) = attr.name("name").map(|m| m.as_str()) else {
                continue;
            };
            if names.contains(&name) {
                return Err(malformed(format!("duplicate attribute {name}"), at));
            }
            names.push(name);

            let raw = attr.name("dq").or_else(|| attr.name("sq")).map_or("", |m| m.as_str());
            let value = self
                .decode_references(&normalize_attribute(raw))
                .map_err(|reason| malformed(reason, at))?;
            if element == "failure" && name == "message" {
                message = Some(value);
            }
        }
        Ok(message)
    }

    /// Replace entity and character references; a bare `&` or an unknown entity is an error
    fn decode_references(&self, raw: &str) -> Result<String, String> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let tail = &rest[amp..];
            let Some(reference) = self.reference.captures(tail) else {
                return Err("'&' not starting a reference".to_string());
            };
            let name = &reference[1];
            let decoded = decode_entity(name).ok_or_else(|| format!("undefined entity &{name};"))?;
            out.push_str(&decoded);
            rest = &tail[reference[0].len()..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn malformed(reason: impl Display, at: usize) -> ApicovError {
    ApicovError::verdict(format!("not well-formed XML at byte {at}: {reason}"))
}

/// Literal line breaks and tabs in an attribute value read as spaces
fn normalize_attribute(raw: &str) -> String {
    raw.replace("\r\n", " ").replace(['\n', '\r', '\t'], " ")
}

fn decode_entity(name: &str) -> Option<String> {
    let decoded = match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let reference = name.strip_prefix('#')?;
            let code = match reference.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => reference.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}

/// Failing case ids read from a JUnit report
#[derive(Debug, Clone, Default)]
pub struct JunitVerdicts {
    failing: FailingCaseIds,
}

impl JunitVerdicts {
    /// Load verdicts from a file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not well-formed XML
    pub fn from_path(path: impl AsRef<Path>) -> ApicovResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match Self::from_xml_str(&content) {
            Err(ApicovError::VerdictParse { message }) => Err(ApicovError::verdict(format!(
                "{}: {message}",
                path.display()
            ))),
            other => other,
        }
    }

    /// Scan report text for failing case ids
    ///
    /// # Errors
    ///
    /// Returns error if the text is not well-formed XML
    pub fn from_xml_str(xml: &str) -> ApicovResult<Self> {
        let failing = CaseIdMatcher::new()?.failing_ids(xml)?;
        tracing::debug!(failing_ids = failing.len(), "loaded verdict report");
        Ok(Self { failing })
    }

    /// Failing case ids
    #[must_use]
    pub fn failing(&self) -> &FailingCaseIds {
        &self.failing
    }

    /// Consume the loader, keeping the ids
    #[must_use]
    pub fn into_failing(self) -> FailingCaseIds {
        self.failing
    }
}

impl VerdictProvider for JunitVerdicts {
    fn failing_case_ids(&self) -> &FailingCaseIds {
        &self.failing
    }
}
