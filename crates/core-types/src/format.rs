use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;

/// The closed set of export formats the SAW export service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Pdf,
    Excel2007,
    Mhtml,
    Xml,
}

impl OutputFormat {
    /// The identifier the server expects in the `outputFormat` request element.
    pub fn wire_id(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "CSV",
            OutputFormat::Pdf => "PDF",
            OutputFormat::Excel2007 => "EXCEL2007",
            OutputFormat::Mhtml => "MHTML",
            OutputFormat::Xml => "XML",
        }
    }

    /// The canonical file extension for this format, dot included.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => ".csv",
            OutputFormat::Pdf => ".pdf",
            OutputFormat::Excel2007 => ".xlsx",
            OutputFormat::Mhtml => ".mhtml",
            OutputFormat::Xml => ".xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_id())
    }
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    /// Accepts both the friendly lowercase names and the server's wire identifiers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "pdf" => Ok(OutputFormat::Pdf),
            "excel2007" | "xlsx" => Ok(OutputFormat::Excel2007),
            "mhtml" => Ok(OutputFormat::Mhtml),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(CoreError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_friendly_and_wire_names() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("PDF".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!(
            "EXCEL2007".parse::<OutputFormat>().unwrap(),
            OutputFormat::Excel2007
        );
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Excel2007);
        assert_eq!(" mhtml ".parse::<OutputFormat>().unwrap(), OutputFormat::Mhtml);
    }

    #[test]
    fn rejects_unknown_format_strings() {
        let err = "docx".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownFormat(s) if s == "docx"));
    }

    #[test]
    fn extension_matches_wire_id() {
        assert_eq!(OutputFormat::Csv.extension(), ".csv");
        assert_eq!(OutputFormat::Excel2007.extension(), ".xlsx");
        assert_eq!(OutputFormat::Excel2007.wire_id(), "EXCEL2007");
    }
}
