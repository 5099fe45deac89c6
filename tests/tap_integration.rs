//! Integration tests for the TAP client.
//!
//! Exercises the synchronous query path, table uploads, and the catalog
//! discovery helpers against a scripted HTTP client.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use voquery::table::VoDatatype;
use voquery::tap::TapClient;
use voquery::transport::{HttpClient, Request, TransportError};
use voquery::{Error, InputError, ServiceDescriptor};

// =============================================================================
// Test Helpers
// =============================================================================

/// HTTP client replaying a scripted sequence of responses while recording
/// every request it sees.
struct ScriptedHttp {
    responses: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedHttp {
    fn new(responses: Vec<Result<Vec<u8>, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn request(&self, index: usize) -> Request {
        self.requests.lock().unwrap()[index].clone()
    }
}

impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: &Request) -> Result<Vec<u8>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connect("script exhausted".to_string())))
    }
}

fn service() -> ServiceDescriptor {
    ServiceDescriptor::record("https://example.org/tap")
}

fn form_value<'a>(form: &'a [(String, String)], key: &str) -> &'a str {
    form.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or_else(|| panic!("missing form field {key}"))
}

/// A catalog query result with two columns and the given rows.
fn result_payload(rows: &[(&str, &str)]) -> Vec<u8> {
    let body: String = rows
        .iter()
        .map(|(a, b)| format!("<TR><TD>{a}</TD><TD>{b}</TD></TR>"))
        .collect();
    format!(
        r#"<?xml version="1.0"?>
<VOTABLE version="1.3">
  <RESOURCE type="results">
    <INFO name="QUERY_STATUS" value="OK"/>
    <TABLE>
      <FIELD name="schema_name" datatype="char" arraysize="*"/>
      <FIELD name="table_name" datatype="char" arraysize="*"/>
      <DATA><TABLEDATA>{body}</TABLEDATA></DATA>
    </TABLE>
  </RESOURCE>
</VOTABLE>"#
    )
    .into_bytes()
}

/// A rowless result whose column declarations describe a catalog table.
fn schema_probe_payload() -> Vec<u8> {
    br#"<?xml version="1.0"?>
<VOTABLE version="1.3">
  <RESOURCE type="results">
    <INFO name="QUERY_STATUS" value="OK"/>
    <TABLE>
      <FIELD name="s_ra" datatype="double" ucd="pos.eq.ra" unit="deg"/>
      <FIELD name="s_dec" datatype="double" ucd="pos.eq.dec" unit="deg"/>
      <FIELD name="obs_id" datatype="char" arraysize="*"/>
      <DATA><TABLEDATA/></DATA>
    </TABLE>
  </RESOURCE>
</VOTABLE>"#
        .to_vec()
}

// =============================================================================
// Integration Tests
// =============================================================================

#[tokio::test]
async fn test_sync_query_posts_standard_form() {
    let http = ScriptedHttp::new(vec![Ok(result_payload(&[("ivoa", "obscore")]))]);
    let client = TapClient::new(&http);

    let table = client
        .query(&service(), "SELECT TOP 5 * FROM ivoa.obscore")
        .await
        .unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(http.calls(), 1);

    match http.request(0) {
        Request::PostForm { url, form } => {
            assert_eq!(url, "https://example.org/tap/sync");
            assert_eq!(form_value(&form, "REQUEST"), "doQuery");
            assert_eq!(form_value(&form, "LANG"), "ADQL");
            assert_eq!(
                form_value(&form, "QUERY"),
                "SELECT TOP 5 * FROM ivoa.obscore"
            );
        }
        other => panic!("expected form POST, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_query_sends_multipart_table() {
    let http = ScriptedHttp::new(vec![Ok(result_payload(&[("ivoa", "obscore")]))]);
    let client = TapClient::new(&http);
    let upload = b"<VOTABLE version=\"1.3\"/>".to_vec();

    client
        .query_with_upload(
            &service(),
            "SELECT * FROM TAP_UPLOAD.mysources AS u",
            "mysources",
            upload.clone(),
        )
        .await
        .unwrap();

    match http.request(0) {
        Request::PostMultipart {
            url,
            form,
            file_field,
            file_name,
            bytes,
        } => {
            assert_eq!(url, "https://example.org/tap/sync");
            assert_eq!(form_value(&form, "UPLOAD"), "mysources,param:uplt");
            assert_eq!(file_field, "uplt");
            assert_eq!(file_name, "upload.xml");
            assert_eq!(bytes, upload);
        }
        other => panic!("expected multipart POST, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_upload_name_is_rejected_before_any_call() {
    let http = ScriptedHttp::new(vec![]);
    let client = TapClient::new(&http);

    let result = client
        .query_with_upload(&service(), "SELECT 1", "  ", Vec::new())
        .await;

    assert!(matches!(
        result,
        Err(Error::Input(InputError::EmptyUploadName))
    ));
    assert_eq!(http.calls(), 0);
}

#[tokio::test]
async fn test_list_tables_qualifies_names() {
    let http = ScriptedHttp::new(vec![Ok(result_payload(&[
        ("ivoa", "obscore"),
        ("tap_schema", "tap_schema.tables"),
        ("", "standalone"),
    ]))]);
    let client = TapClient::new(&http);

    let names = client.list_tables(&service(), None).await.unwrap();

    assert_eq!(
        names,
        vec![
            "ivoa.obscore".to_string(),
            "tap_schema.tables".to_string(),
            "standalone".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_list_tables_filters_by_substring() {
    let http = ScriptedHttp::new(vec![Ok(result_payload(&[
        ("ivoa", "obscore"),
        ("tap_schema", "tables"),
        ("tap_schema", "columns"),
    ]))]);
    let client = TapClient::new(&http);

    let names = client.list_tables(&service(), Some("schema")).await.unwrap();

    assert_eq!(
        names,
        vec!["tap_schema.tables".to_string(), "tap_schema.columns".to_string()]
    );
}

#[tokio::test]
async fn test_list_columns_probes_with_top_one() {
    let http = ScriptedHttp::new(vec![Ok(schema_probe_payload())]);
    let client = TapClient::new(&http);

    let columns = client
        .list_columns(&service(), "ivoa.obscore")
        .await
        .unwrap();

    match http.request(0) {
        Request::PostForm { form, .. } => {
            assert_eq!(
                form_value(&form, "QUERY"),
                "SELECT TOP 1 * FROM ivoa.obscore"
            );
        }
        other => panic!("expected form POST, got {other:?}"),
    }

    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].name, "s_ra");
    assert_eq!(columns[0].datatype, VoDatatype::Double);
    assert_eq!(columns[0].ucd.as_deref(), Some("pos.eq.ra"));
    assert_eq!(columns[0].unit.as_deref(), Some("deg"));
    assert_eq!(columns[2].name, "obs_id");
}

#[tokio::test]
async fn test_service_error_status_is_surfaced_in_table() {
    let error_response = br#"<?xml version="1.0"?>
<VOTABLE version="1.3">
  <RESOURCE type="results">
    <INFO name="QUERY_STATUS" value="ERROR">ADQL syntax error near 'FORM'</INFO>
  </RESOURCE>
</VOTABLE>"#
        .to_vec();
    let http = ScriptedHttp::new(vec![Ok(error_response)]);
    let client = TapClient::new(&http);

    let table = client
        .query(&service(), "SELECT * FORM ivoa.obscore")
        .await
        .unwrap();

    assert!(table.is_error());
    assert!(table.is_empty());
    assert_eq!(
        table.error_message(),
        Some("ADQL syntax error near 'FORM'")
    );
}

#[tokio::test]
async fn test_transport_failure_is_raised_not_swallowed() {
    let http = ScriptedHttp::new(vec![
        Err(TransportError::Http {
            status: 404,
            url: "https://example.org/tap/sync".to_string(),
        }),
    ]);
    let client = TapClient::new(&http);

    let result = client.query(&service(), "SELECT 1").await;

    assert!(matches!(result, Err(Error::Transport { .. })));
    assert_eq!(http.calls(), 1);
}
