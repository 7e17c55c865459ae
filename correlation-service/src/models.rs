use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marker stored in the structured fields that a PDF upload cannot fill.
pub const PDF_PLACEHOLDER: &str = "Extracted from PDF";

/// Structured patient data submitted for correlation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalInput {
    pub radiology_report: String,
    pub lab_values: String,
    pub clinical_notes: String,
}

impl MedicalInput {
    /// Input for a document upload: the extracted text becomes the clinical notes.
    pub fn from_document_text(text: String) -> Self {
        Self {
            radiology_report: PDF_PLACEHOLDER.to_string(),
            lab_values: PDF_PLACEHOLDER.to_string(),
            clinical_notes: text,
        }
    }

    /// Labeled fields joined by newlines, used for retrieval and the prompt.
    pub fn combined_text(&self) -> String {
        format!(
            "Radiology: {}\nLabs: {}\nNotes: {}",
            self.radiology_report, self.lab_values, self.clinical_notes
        )
    }
}

/// Normalized key to trimmed value, in the order the backend first wrote each key
pub type AnalysisResult = IndexMap<String, String>;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis_result: AnalysisResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_text_labels_each_field() {
        let input = MedicalInput {
            radiology_report: "No fracture".to_string(),
            lab_values: "WBC 11.2".to_string(),
            clinical_notes: "Fever for 3 days".to_string(),
        };

        assert_eq!(
            input.combined_text(),
            "Radiology: No fracture\nLabs: WBC 11.2\nNotes: Fever for 3 days"
        );
    }

    #[test]
    fn document_input_uses_placeholders() {
        let input = MedicalInput::from_document_text(String::new());

        assert_eq!(input.radiology_report, PDF_PLACEHOLDER);
        assert_eq!(input.lab_values, PDF_PLACEHOLDER);
        assert_eq!(input.clinical_notes, "");
    }

    #[test]
    fn missing_field_is_rejected() {
        let result = serde_json::from_str::<MedicalInput>(
            r#"{"radiology_report": "x", "lab_values": "y"}"#,
        );
        assert!(result.is_err());
    }
}
