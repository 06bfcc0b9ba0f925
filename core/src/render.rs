//! reStructuredText emitters for recorded exchanges.
//!
//! Output follows the `sphinxcontrib-httpdomain` layout: an `http:<method>`
//! directive, optional description blocks, then literal example request and
//! response blocks. JSON payloads are pretty-printed with a two-space step
//! and indented to sit inside the `sourcecode` blocks.

use std::io::Write;

use serde::Serialize;

use crate::error::RecorderError;
use crate::http::{HttpRequest, HttpResponse, REQUEST_VERSION};
use crate::types::RequestDescriptor;

const LITERAL_INDENT: &str = "      ";

/// Title line followed by an underline of the same character count.
pub fn write_heading<W: Write + ?Sized>(w: &mut W, title: &str, underline: char) -> Result<(), RecorderError> {
    let rule: String = std::iter::repeat(underline).take(title.chars().count()).collect();
    write!(w, "{title}\n{rule}\n\n")?;
    Ok(())
}

/// Indented paragraph followed by a blank line.
pub fn write_paragraph<W: Write + ?Sized>(w: &mut W, text: &str) -> Result<(), RecorderError> {
    write!(w, "  {text}\n\n")?;
    Ok(())
}

/// Render the documentation block for one exchange.
///
/// `request` is what was sent, `response` what came back. The heading shows
/// the descriptor's logical path, the example request line the path that was
/// actually requested.
pub fn render_exchange<W, B>(
    w: &mut W,
    descriptor: &RequestDescriptor<B>,
    request: &HttpRequest,
    response: &HttpResponse,
    sort_headers: bool,
) -> Result<(), RecorderError>
where
    W: Write + ?Sized,
    B: Serialize,
{
    write!(
        w,
        ".. http:{}:: {}\n\n",
        descriptor.method.as_str().to_ascii_lowercase(),
        descriptor.path
    )?;
    write!(w, "   {}\n\n", descriptor.description)?;

    if !descriptor.response_codes.is_empty() {
        write!(w, "     **Response Code**\n\n")?;
        for (code, text) in &descriptor.response_codes {
            write!(w, "     - {code}: {text}\n\n")?;
        }
    }
    if !descriptor.query_params.is_empty() {
        write!(w, "     **Query Parameters**\n\n")?;
        for (name, text) in &descriptor.query_params {
            write!(w, "     - **{name}**: {text}\n\n")?;
        }
    }
    if !descriptor.response_fields.is_empty() {
        write!(w, "     **Response JSON Object**\n\n")?;
        for (name, text) in &descriptor.response_fields {
            write!(w, "     - **{name}**: {text}\n\n")?;
        }
    }

    write!(w, "   Example request:\n\n")?;
    write!(w, "   .. sourcecode:: http\n\n")?;
    if request.query.is_empty() {
        writeln!(w, "{LITERAL_INDENT}{} {} {REQUEST_VERSION}", request.method, request.path)?;
    } else {
        writeln!(
            w,
            "{LITERAL_INDENT}{} {}?{} {REQUEST_VERSION}",
            request.method, request.path, request.query
        )?;
    }
    write_headers(w, &request.headers, sort_headers)?;
    if let Some(body) = &descriptor.body {
        let pretty = pretty_json(body).map_err(RecorderError::Serialization)?;
        writeln!(w)?;
        write_literal(w, &pretty)?;
    }
    writeln!(w)?;

    write!(w, "   Example response:\n\n")?;
    write!(w, "   .. sourcecode:: http\n\n")?;
    writeln!(w, "{LITERAL_INDENT}{}", response.status_line())?;
    write_headers(w, &response.headers, sort_headers)?;
    if !response.body.is_empty() {
        let value: serde_json::Value =
            serde_json::from_slice(&response.body).map_err(|source| RecorderError::ResponseNotJson {
                status: response.status,
                source,
            })?;
        let pretty = pretty_json(&value).map_err(RecorderError::Serialization)?;
        writeln!(w)?;
        write_literal(w, &pretty)?;
    }
    writeln!(w)?;
    Ok(())
}

fn write_headers<W: Write + ?Sized>(
    w: &mut W,
    headers: &[(String, String)],
    sort: bool,
) -> Result<(), RecorderError> {
    let mut lines: Vec<&(String, String)> = headers.iter().collect();
    if sort {
        lines.sort_by_key(|(name, _)| name.to_ascii_lowercase());
    }
    for (name, value) in lines {
        writeln!(w, "{LITERAL_INDENT}{name}: {value}")?;
    }
    Ok(())
}

fn write_literal<W: Write + ?Sized>(w: &mut W, text: &str) -> Result<(), RecorderError> {
    for line in text.lines() {
        writeln!(w, "{LITERAL_INDENT}{line}")?;
    }
    Ok(())
}

/// Pretty JSON with a two-space step, keys in serialization order.
pub fn pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
