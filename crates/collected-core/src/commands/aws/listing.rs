//! Reading S3 XML responses.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{RunError, RunResult};

fn malformed(err: &impl std::fmt::Display) -> RunError {
    RunError::InvalidResponse {
        message: format!("Malformed S3 XML: {err}"),
    }
}

/// Text content of every element whose path from the root is `target`.
fn texts_at(xml: &str, target: &[&str]) -> RunResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut found = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                if path.iter().map(String::as_str).eq(target.iter().copied()) {
                    current = Some(String::new());
                }
            }
            Ok(Event::Empty(e)) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                if path.iter().map(String::as_str).eq(target.iter().copied()) {
                    found.push(String::new());
                }
                path.pop();
            }
            Ok(Event::Text(text)) => {
                if let Some(buffer) = current.as_mut() {
                    buffer.push_str(&text.unescape().map_err(|err| malformed(&err))?);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(buffer) = current.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Ok(Event::End(_)) => {
                if let Some(text) = current.take() {
                    found.push(text);
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(malformed(&err)),
        }
    }

    Ok(found)
}

/// Object keys from a `ListObjectsV2` response, in listing order.
pub fn object_keys(xml: &str) -> RunResult<Vec<String>> {
    texts_at(xml, &["ListBucketResult", "Contents", "Key"])
}

/// Whether a `ListObjectsV2` response has more pages.
pub fn is_truncated(xml: &str) -> RunResult<bool> {
    Ok(texts_at(xml, &["ListBucketResult", "IsTruncated"])?
        .first()
        .is_some_and(|value| value == "true"))
}

/// `Code (Message)` from an S3 error document, when the body is one.
pub fn error_reason(xml: &str) -> Option<String> {
    let code = texts_at(xml, &["Error", "Code"]).ok()?.into_iter().next()?;
    let message = texts_at(xml, &["Error", "Message"])
        .ok()
        .and_then(|messages| messages.into_iter().next());

    Some(match message {
        Some(message) if !message.is_empty() => format!("{code} ({message})"),
        _ => code,
    })
}
