//! VOTable response materialization.
//!
//! Turns the raw bytes of a service response into a [`ResultTable`].
//! A well-formed VOTable whose embedded `QUERY_STATUS` says `ERROR` or
//! `OVERFLOW` does NOT raise: the status and message land in the table's
//! metadata so batch queries can keep going. Only bytes that cannot be
//! interpreted as a VOTable at all produce a [`ParseError`].
//!
//! Only the first `TABLE` element of the response is materialized; cell
//! values are kept as strings with the declared datatype preserved on the
//! column metadata.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, warn};

use crate::table::{ColumnMeta, ResultTable, VoDatatype, META_ERROR_MESSAGE, META_QUERY_STATUS};

/// Response bytes that could not be interpreted as a VOTable.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed XML, or a document whose root is not `VOTABLE`.
    #[error("not a VOTable: {message}; payload starts with {snippet:?}")]
    NotVoTable { message: String, snippet: String },

    /// Structurally valid VOTable carrying neither a table nor an error
    /// status.
    #[error("VOTable contains no table and no error status; payload starts with {snippet:?}")]
    NoTable { snippet: String },
}

/// Materializes raw response bytes into a result table.
pub fn parse_votable(bytes: &[u8]) -> Result<ResultTable, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut saw_root = false;
    let mut saw_table = false;
    let mut table_done = false;

    let mut columns: Vec<ColumnMeta> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    let mut current_field: Option<ColumnMeta> = None;
    let mut in_field_description = false;
    let mut current_row: Option<Vec<String>> = None;
    let mut current_cell: Option<String> = None;

    // INFO element currently open: (name attribute, value attribute, text).
    let mut current_info: Option<(String, String, String)> = None;
    let mut status: Option<String> = None;
    let mut status_message: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => {
                return Err(ParseError::NotVoTable {
                    message: e.to_string(),
                    snippet: snippet(bytes),
                })
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if !saw_root {
                    if !name.eq_ignore_ascii_case(b"VOTABLE") {
                        return Err(ParseError::NotVoTable {
                            message: "root element is not VOTABLE".to_string(),
                            snippet: snippet(bytes),
                        });
                    }
                    saw_root = true;
                } else if name.eq_ignore_ascii_case(b"TABLE") && !table_done {
                    saw_table = true;
                } else if name.eq_ignore_ascii_case(b"FIELD") && saw_table && !table_done {
                    current_field = Some(field_from_attrs(&e));
                } else if name.eq_ignore_ascii_case(b"DESCRIPTION") && current_field.is_some() {
                    in_field_description = true;
                } else if name.eq_ignore_ascii_case(b"TR") && saw_table && !table_done {
                    current_row = Some(Vec::with_capacity(columns.len()));
                } else if name.eq_ignore_ascii_case(b"TD") && current_row.is_some() {
                    current_cell = Some(String::new());
                } else if name.eq_ignore_ascii_case(b"INFO") {
                    current_info = Some((
                        attr(&e, "name").unwrap_or_default(),
                        attr(&e, "value").unwrap_or_default(),
                        String::new(),
                    ));
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if name.eq_ignore_ascii_case(b"FIELD") && saw_table && !table_done {
                    columns.push(field_from_attrs(&e));
                } else if name.eq_ignore_ascii_case(b"TD") {
                    if let Some(row) = current_row.as_mut() {
                        row.push(String::new());
                    }
                } else if name.eq_ignore_ascii_case(b"INFO") {
                    record_info(
                        &attr(&e, "name").unwrap_or_default(),
                        &attr(&e, "value").unwrap_or_default(),
                        "",
                        &mut status,
                        &mut status_message,
                    );
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if name.eq_ignore_ascii_case(b"FIELD") {
                    if let Some(field) = current_field.take() {
                        columns.push(field);
                    }
                } else if name.eq_ignore_ascii_case(b"DESCRIPTION") {
                    in_field_description = false;
                } else if name.eq_ignore_ascii_case(b"TD") {
                    if let (Some(row), Some(cell)) = (current_row.as_mut(), current_cell.take()) {
                        row.push(cell);
                    }
                } else if name.eq_ignore_ascii_case(b"TR") {
                    if let Some(mut row) = current_row.take() {
                        // Short rows are padded rather than rejected.
                        if row.len() < columns.len() {
                            row.resize(columns.len(), String::new());
                        }
                        rows.push(row);
                    }
                } else if name.eq_ignore_ascii_case(b"TABLE") {
                    table_done = saw_table;
                } else if name.eq_ignore_ascii_case(b"INFO") {
                    if let Some((info_name, value, text)) = current_info.take() {
                        record_info(&info_name, &value, &text, &mut status, &mut status_message);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map(|c| c.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(t.as_ref()).into_owned());
                append_text(
                    &text,
                    &mut current_cell,
                    &mut current_field,
                    in_field_description,
                    &mut current_info,
                );
            }
            Ok(Event::CData(t)) => {
                let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                append_text(
                    &text,
                    &mut current_cell,
                    &mut current_field,
                    in_field_description,
                    &mut current_info,
                );
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(ParseError::NotVoTable {
            message: "no VOTABLE root element".to_string(),
            snippet: snippet(bytes),
        });
    }

    let mut meta = BTreeMap::new();
    if let Some(status) = &status {
        meta.insert(META_QUERY_STATUS.to_string(), status.clone());
        if status != "OK" {
            let message = status_message.clone().unwrap_or_else(|| status.clone());
            warn!(status = %status, message = %message, "service reported protocol error");
            meta.insert(META_ERROR_MESSAGE.to_string(), message);
        }
    }

    if saw_table {
        debug!(
            columns = columns.len(),
            rows = rows.len(),
            "materialized VOTable response"
        );
        Ok(ResultTable::new(columns, rows, meta))
    } else if status.as_deref() == Some("ERROR") || status.as_deref() == Some("OVERFLOW") {
        // Error responses legitimately omit the table.
        Ok(ResultTable::new(Vec::new(), Vec::new(), meta))
    } else {
        Err(ParseError::NoTable {
            snippet: snippet(bytes),
        })
    }
}

/// Builds column metadata from a FIELD element's attributes.
fn field_from_attrs(e: &BytesStart<'_>) -> ColumnMeta {
    let mut column = ColumnMeta::new(attr(e, "name").unwrap_or_default());
    column.datatype = VoDatatype::parse(&attr(e, "datatype").unwrap_or_default());
    column.ucd = attr(e, "ucd");
    column.utype = attr(e, "utype");
    column.unit = attr(e, "unit");
    column
}

/// Routes character data to whichever element is currently open.
fn append_text(
    text: &str,
    current_cell: &mut Option<String>,
    current_field: &mut Option<ColumnMeta>,
    in_field_description: bool,
    current_info: &mut Option<(String, String, String)>,
) {
    if let Some(cell) = current_cell.as_mut() {
        cell.push_str(text);
    } else if in_field_description {
        if let Some(field) = current_field.as_mut() {
            match field.description.as_mut() {
                Some(d) => d.push_str(text),
                None => field.description = Some(text.to_string()),
            }
        }
    } else if let Some((_, _, info_text)) = current_info.as_mut() {
        info_text.push_str(text);
    }
}

/// Records a completed INFO element if it carries the query status.
fn record_info(
    name: &str,
    value: &str,
    text: &str,
    status: &mut Option<String>,
    status_message: &mut Option<String>,
) {
    if !name.eq_ignore_ascii_case("QUERY_STATUS") {
        return;
    }
    *status = Some(value.trim().to_ascii_uppercase());
    let text = text.trim();
    if !text.is_empty() {
        *status_message = Some(text.to_string());
    }
}

/// Reads one attribute by local name, XML-unescaped.
fn attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if a.key.local_name().as_ref().eq_ignore_ascii_case(name.as_bytes()) {
            a.unescape_value().ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// First part of the payload, for error diagnosis.
fn snippet(bytes: &[u8]) -> String {
    const LIMIT: usize = 120;
    let text = String::from_utf8_lossy(bytes);
    let mut out: String = text.chars().take(LIMIT).collect();
    if out.len() < text.len() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIA_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<VOTABLE version="1.3" xmlns="http://www.ivoa.net/xml/VOTable/v1.3">
  <RESOURCE type="results">
    <INFO name="QUERY_STATUS" value="OK"/>
    <TABLE>
      <FIELD name="obs_title" datatype="char" arraysize="*" ucd="VOX:Image_Title">
        <DESCRIPTION>Short image description</DESCRIPTION>
      </FIELD>
      <FIELD name="ra_center" datatype="double" ucd="POS_EQ_RA_MAIN"/>
      <FIELD name="url" datatype="char" arraysize="*" ucd="VOX:Image_AccessReference"/>
      <DATA>
        <TABLEDATA>
          <TR><TD>First field</TD><TD>180.0</TD><TD><![CDATA[https://example.org/1.fits?a=1&b=2]]></TD></TR>
          <TR><TD>Second field</TD><TD>181.5</TD><TD/></TR>
        </TABLEDATA>
      </DATA>
    </TABLE>
  </RESOURCE>
</VOTABLE>"#;

    const ERROR_RESPONSE: &str = r#"<?xml version="1.0"?>
<VOTABLE version="1.3">
  <RESOURCE type="results">
    <INFO name="QUERY_STATUS" value="ERROR">Syntax error in ADQL query</INFO>
  </RESOURCE>
</VOTABLE>"#;

    const OVERFLOW_RESPONSE: &str = r#"<?xml version="1.0"?>
<VOTABLE version="1.3">
  <RESOURCE type="results">
    <TABLE>
      <FIELD name="ra" datatype="double" ucd="POS_EQ_RA_MAIN"/>
      <DATA><TABLEDATA><TR><TD>180.0</TD></TR></TABLEDATA></DATA>
    </TABLE>
    <INFO name="QUERY_STATUS" value="OVERFLOW"/>
  </RESOURCE>
</VOTABLE>"#;

    #[test]
    fn test_parse_table_with_rows() {
        let table = parse_votable(SIA_RESPONSE.as_bytes()).unwrap();
        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.len(), 2);
        assert_eq!(table.query_status(), Some("OK"));
        assert!(!table.is_error());
        assert_eq!(table.cell(0, "obs_title"), Some("First field"));
        assert_eq!(table.cell(0, "ra_center"), Some("180.0"));
    }

    #[test]
    fn test_field_metadata_is_preserved() {
        let table = parse_votable(SIA_RESPONSE.as_bytes()).unwrap();
        let title = &table.columns()[0];
        assert_eq!(title.ucd.as_deref(), Some("VOX:Image_Title"));
        assert_eq!(title.datatype, VoDatatype::Char);
        assert_eq!(title.description.as_deref(), Some("Short image description"));
        assert_eq!(table.columns()[1].datatype, VoDatatype::Double);
    }

    #[test]
    fn test_cdata_cell_is_kept_verbatim() {
        let table = parse_votable(SIA_RESPONSE.as_bytes()).unwrap();
        assert_eq!(
            table.cell(0, "url"),
            Some("https://example.org/1.fits?a=1&b=2")
        );
    }

    #[test]
    fn test_empty_td_becomes_empty_string() {
        let table = parse_votable(SIA_RESPONSE.as_bytes()).unwrap();
        assert_eq!(table.cell(1, "url"), Some(""));
    }

    #[test]
    fn test_error_status_yields_table_not_error() {
        let table = parse_votable(ERROR_RESPONSE.as_bytes()).unwrap();
        assert!(table.is_error());
        assert!(table.is_empty());
        assert_eq!(table.error_message(), Some("Syntax error in ADQL query"));
    }

    #[test]
    fn test_overflow_status_keeps_rows() {
        let table = parse_votable(OVERFLOW_RESPONSE.as_bytes()).unwrap();
        assert_eq!(table.query_status(), Some("OVERFLOW"));
        assert!(!table.is_error());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_garbage_bytes_are_parse_error() {
        let result = parse_votable(b"this is not xml at all");
        assert!(matches!(result, Err(ParseError::NotVoTable { .. })));
    }

    #[test]
    fn test_wrong_root_element_is_parse_error() {
        let result = parse_votable(b"<html><body>service moved</body></html>");
        assert!(matches!(result, Err(ParseError::NotVoTable { .. })));
    }

    #[test]
    fn test_votable_without_table_or_status_is_parse_error() {
        let result = parse_votable(b"<VOTABLE version=\"1.3\"><RESOURCE/></VOTABLE>");
        assert!(matches!(result, Err(ParseError::NoTable { .. })));
    }
}
