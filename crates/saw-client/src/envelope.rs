//! SOAP 1.1 envelope construction and response parsing for the SAW web
//! services. Requests are built as strings with all interpolated text
//! XML-escaped; responses are scanned by local element name so the parser is
//! indifferent to whatever namespace prefixes the server chooses.

use crate::error::SawError;
use crate::responses::{ExportReply, ExportStatus, SoapFault};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use core_types::Report;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

/// Namespace of the SAW web services this client speaks.
pub const SAW_NAMESPACE: &str = "urn://oracle.bi.webservices/v12";

fn soap_envelope(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         xmlns:sawsoap=\"{SAW_NAMESPACE}\">\
         <soapenv:Body>{body}</soapenv:Body></soapenv:Envelope>"
    )
}

pub fn logon_request(username: &str, password: &str) -> String {
    soap_envelope(&format!(
        "<sawsoap:logon><sawsoap:name>{}</sawsoap:name>\
         <sawsoap:password>{}</sawsoap:password></sawsoap:logon>",
        escape(username),
        escape(password)
    ))
}

pub fn logoff_request(session_id: &str) -> String {
    soap_envelope(&format!(
        "<sawsoap:logoff><sawsoap:sessionID>{}</sawsoap:sessionID></sawsoap:logoff>",
        escape(session_id)
    ))
}

/// The export is always initiated asynchronously (`async=true`), matching the
/// poll-until-done completion loop in the exporter. MTOM attachments are not
/// used; the payload comes back base64-encoded in `viewData`.
pub fn initiate_export_request(report: &Report, session_id: &str) -> String {
    soap_envelope(&format!(
        "<sawsoap:initiateAnalysisExport>\
         <sawsoap:report><sawsoap:reportPath>{}</sawsoap:reportPath></sawsoap:report>\
         <sawsoap:outputFormat>{}</sawsoap:outputFormat>\
         <sawsoap:executionOptions>\
         <sawsoap:async>true</sawsoap:async>\
         <sawsoap:useMtom>false</sawsoap:useMtom>\
         <sawsoap:refresh>{}</sawsoap:refresh>\
         </sawsoap:executionOptions>\
         <sawsoap:sessionID>{}</sawsoap:sessionID>\
         </sawsoap:initiateAnalysisExport>",
        escape(report.catalog_path()),
        report.format().wire_id(),
        report.refresh(),
        escape(session_id)
    ))
}

pub fn complete_export_request(query_id: &str, session_id: &str) -> String {
    soap_envelope(&format!(
        "<sawsoap:completeAnalysisExport>\
         <sawsoap:queryID>{}</sawsoap:queryID>\
         <sawsoap:sessionID>{}</sawsoap:sessionID>\
         </sawsoap:completeAnalysisExport>",
        escape(query_id),
        escape(session_id)
    ))
}

/// Returns the text content of the first element whose local name matches,
/// wherever it sits in the document.
fn first_text(xml: &str, local: &str) -> Result<Option<String>, SawError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == local.as_bytes() => {
                let text = reader
                    .read_text(e.name())
                    .map_err(|e| SawError::Decode(e.to_string()))?;
                return Ok(Some(text.into_owned()));
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(SawError::Decode(e.to_string())),
        }
    }
}

/// Extracts a SOAP fault from a response body, if one is present.
pub fn parse_fault(xml: &str) -> Result<Option<SoapFault>, SawError> {
    let message = first_text(xml, "faultstring")?;
    match message {
        Some(message) => {
            let code = first_text(xml, "faultcode")?.unwrap_or_default();
            Ok(Some(SoapFault { code, message }))
        }
        None => Ok(None),
    }
}

pub fn parse_session_id(xml: &str) -> Result<String, SawError> {
    first_text(xml, "sessionID")?
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SawError::Decode("logon response carried no sessionID".to_string()))
}

pub fn parse_query_id(xml: &str) -> Result<String, SawError> {
    first_text(xml, "queryID")?
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SawError::Decode("initiate response carried no queryID".to_string()))
}

pub fn parse_export_reply(xml: &str) -> Result<ExportReply, SawError> {
    let status = first_text(xml, "exportStatus")?
        .ok_or_else(|| SawError::Decode("completion response carried no exportStatus".to_string()))?;
    let mime_type = first_text(xml, "mimeType")?.filter(|m| !m.is_empty());
    let data = match first_text(xml, "viewData")? {
        Some(encoded) => {
            // Servers are free to wrap base64 text; strip whitespace before decoding.
            let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
            BASE64
                .decode(cleaned)
                .map_err(|e| SawError::Decode(format!("viewData is not valid base64: {e}")))?
        }
        None => Vec::new(),
    };
    Ok(ExportReply {
        status: ExportStatus::from_wire(&status),
        mime_type,
        data,
    })
}
