use crate::SawService;
use crate::envelope;
use crate::error::SawError;
use crate::responses::ExportReply;
use core_types::Report;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A concrete `SawService` over HTTP: hand-built SOAP envelopes POSTed to the
/// two service endpoints, blocking until the server responds.
pub struct HttpSawClient {
    http: reqwest::blocking::Client,
    session_endpoint: String,
    export_endpoint: String,
}

impl HttpSawClient {
    /// The client factory: fetches the service description from `wsdl_url`,
    /// verifies it is a WSDL we can work with, and derives the session and
    /// export endpoints from it. Fails with a connection-class error if the
    /// description cannot be fetched or does not look like a WSDL.
    pub fn connect(wsdl_url: &str) -> Result<Self, SawError> {
        Self::connect_with_timeout(wsdl_url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn connect_with_timeout(wsdl_url: &str, http_timeout: Duration) -> Result<Self, SawError> {
        let http = build_http(http_timeout)?;

        tracing::debug!("Fetching service description from {wsdl_url}...");
        let description = http.get(wsdl_url).send()?.error_for_status()?.text()?;
        if let Err(reason) = validate_wsdl(&description) {
            return Err(SawError::ServiceDescription(format!(
                "document at {wsdl_url} is not a WSDL: {reason}"
            )));
        }

        let (session_endpoint, export_endpoint) = derive_endpoints(wsdl_url)?;
        tracing::debug!("Session endpoint: {session_endpoint}");
        tracing::debug!("Export endpoint: {export_endpoint}");

        Ok(Self {
            http,
            session_endpoint,
            export_endpoint,
        })
    }

    /// Builds a client for already-known endpoints, skipping the WSDL fetch.
    pub fn with_endpoints(
        session_endpoint: impl Into<String>,
        export_endpoint: impl Into<String>,
    ) -> Result<Self, SawError> {
        Ok(Self {
            http: build_http(DEFAULT_HTTP_TIMEOUT)?,
            session_endpoint: session_endpoint.into(),
            export_endpoint: export_endpoint.into(),
        })
    }

    /// POSTs one envelope and returns the response body. SOAP servers report
    /// faults with a 500 status and a fault body, so a non-success status is
    /// passed through for the caller to extract the fault from; only a
    /// faultless non-success response is treated as a transport problem.
    fn call(&self, endpoint: &str, action: &str, body: String) -> Result<String, SawError> {
        let response = self
            .http
            .post(endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"#{action}\""))
            .body(body)
            .send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() && envelope::parse_fault(&text)?.is_none() {
            return Err(SawError::Decode(format!(
                "{action} returned HTTP {status} with no SOAP fault"
            )));
        }
        Ok(text)
    }
}

impl SawService for HttpSawClient {
    fn logon(&self, username: &str, password: &str) -> Result<String, SawError> {
        let xml = self.call(
            &self.session_endpoint,
            "logon",
            envelope::logon_request(username, password),
        )?;
        if let Some(fault) = envelope::parse_fault(&xml)? {
            return Err(SawError::Authentication(fault.to_string()));
        }
        envelope::parse_session_id(&xml)
    }

    fn logoff(&self, session_id: &str) -> Result<(), SawError> {
        let xml = self.call(
            &self.session_endpoint,
            "logoff",
            envelope::logoff_request(session_id),
        )?;
        if let Some(fault) = envelope::parse_fault(&xml)? {
            return Err(SawError::Fault(fault.to_string()));
        }
        Ok(())
    }

    fn initiate_export(&self, session_id: &str, report: &Report) -> Result<String, SawError> {
        let xml = self.call(
            &self.export_endpoint,
            "initiateAnalysisExport",
            envelope::initiate_export_request(report, session_id),
        )?;
        if let Some(fault) = envelope::parse_fault(&xml)? {
            return Err(SawError::Export(format!(
                "'{}': {fault}",
                report.catalog_path()
            )));
        }
        envelope::parse_query_id(&xml)
    }

    fn complete_export(&self, session_id: &str, query_id: &str) -> Result<ExportReply, SawError> {
        let xml = self.call(
            &self.export_endpoint,
            "completeAnalysisExport",
            envelope::complete_export_request(query_id, session_id),
        )?;
        if let Some(fault) = envelope::parse_fault(&xml)? {
            return Err(SawError::Export(fault.to_string()));
        }
        envelope::parse_export_reply(&xml)
    }
}

fn build_http(timeout: Duration) -> Result<reqwest::blocking::Client, SawError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?)
}

/// A WSDL is an XML document whose root element is `definitions`. Anything
/// else (an HTML error page, plain text) is rejected here rather than failing
/// obscurely on the first SOAP call.
fn validate_wsdl(document: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return if e.local_name().as_ref() == b"definitions" {
                    Ok(())
                } else {
                    Err(format!(
                        "root element is '{}', not 'definitions'",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                };
            }
            Ok(Event::Eof) => return Err("document has no root element".to_string()),
            // Declarations, comments and processing instructions may precede the root.
            Ok(_) => {}
            Err(e) => return Err(format!("not well-formed XML: {e}")),
        }
    }
}

/// The analytics WSDL lives at `.../saw.dll/wsdl/vN`; the services themselves
/// are addressed through `SoapImpl` query parameters on `.../saw.dll`.
fn derive_endpoints(wsdl_url: &str) -> Result<(String, String), SawError> {
    let base = wsdl_url
        .split_once("/wsdl")
        .map(|(base, _)| base)
        .ok_or_else(|| {
            SawError::ServiceDescription(format!(
                "cannot derive SOAP endpoints from '{wsdl_url}': expected a '/wsdl/vN' suffix"
            ))
        })?;
    Ok((
        format!("{base}?SoapImpl=nQSessionService"),
        format!("{base}?SoapImpl=analysisExportViewsService"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_endpoints_from_wsdl_url() {
        let (session, export) =
            derive_endpoints("http://bi:9502/analytics-ws/saw.dll/wsdl/v12").unwrap();
        assert_eq!(
            session,
            "http://bi:9502/analytics-ws/saw.dll?SoapImpl=nQSessionService"
        );
        assert_eq!(
            export,
            "http://bi:9502/analytics-ws/saw.dll?SoapImpl=analysisExportViewsService"
        );
    }

    #[test]
    fn rejects_urls_without_wsdl_suffix() {
        let err = derive_endpoints("http://bi:9502/analytics-ws/saw.dll").unwrap_err();
        assert!(matches!(err, SawError::ServiceDescription(_)));
    }

    #[test]
    fn accepts_a_wsdl_document() {
        let wsdl = r#"<?xml version="1.0" encoding="UTF-8"?>
            <wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
                targetNamespace="urn://oracle.bi.webservices/v12">
              <wsdl:service name="SAWSessionService"/>
            </wsdl:definitions>"#;
        assert!(validate_wsdl(wsdl).is_ok());
    }

    #[test]
    fn rejects_an_html_page_mentioning_definitions() {
        let html = "<html><body>No definitions here, check the server logs.</body></html>";
        let reason = validate_wsdl(html).unwrap_err();
        assert!(reason.contains("root element is 'html'"));
    }

    #[test]
    fn rejects_documents_that_are_not_xml() {
        assert!(validate_wsdl("503 Service Unavailable: definitions").is_err());
        assert!(validate_wsdl("").is_err());
    }
}
