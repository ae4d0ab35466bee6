//! Contract enforcement at the model boundary.
//!
//! Inbound: `validate_request` rejects empty text before any call is made.
//! Outbound: `validate_result` and friends deserialize the model's JSON
//! strictly; any missing, extra or mistyped field is a `SchemaMismatch`.
//! The JSON schemas below are what the model is told to produce.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::analysis::models::{
    AnalysisRequest, AnalysisResult, AtsCompatibility, Section, SummaryRewriteRequest,
};
use crate::analysis::AnalysisError;
use crate::llm_client::{strip_json_fences, ToolDeclaration};

pub const IMPROVED_SUMMARY_TOOL: &str = "generateImprovedSummary";

/// Rejects whitespace-only resume text. A blank job role is treated as absent.
///
/// No length cap: arbitrarily long text is passed through.
pub fn validate_request(request: AnalysisRequest) -> Result<AnalysisRequest, AnalysisError> {
    require_text("Resume text", &request.resume_text)?;

    let job_role = request
        .job_role
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty());

    Ok(AnalysisRequest {
        resume_text: request.resume_text,
        job_role,
    })
}

pub fn validate_rewrite_request(request: &SummaryRewriteRequest) -> Result<(), AnalysisError> {
    require_text("Resume text", &request.resume_text)?;
    require_text("Improved summary", &request.improved_summary)
}

pub fn require_text(field: &'static str, text: &str) -> Result<(), AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::InvalidInput { field });
    }
    Ok(())
}

/// Parses the model's text reply as JSON, tolerating markdown fences.
pub fn parse_reply_json(text: &str) -> Result<Value, AnalysisError> {
    serde_json::from_str(strip_json_fences(text))
        .map_err(|e| AnalysisError::SchemaMismatch(format!("reply is not valid JSON: {e}")))
}

pub fn validate_result(raw: Value) -> Result<AnalysisResult, AnalysisError> {
    validate_output(raw)
}

/// Strict deserialization of any model-produced record.
pub fn validate_output<T: DeserializeOwned>(raw: Value) -> Result<T, AnalysisError> {
    serde_json::from_value(raw).map_err(|e| AnalysisError::SchemaMismatch(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Schemas handed to the model
// ────────────────────────────────────────────────────────────────────────────

fn string_array(description: &str) -> Value {
    json!({
        "type": "array",
        "items": {"type": "string"},
        "description": description
    })
}

fn section_suggestions_schema() -> Value {
    let mut properties = Map::new();
    for section in Section::ALL {
        properties.insert(
            section.as_str().to_string(),
            string_array(&format!("Suggestions for the {} section.", section.as_str())),
        );
    }
    let required: Vec<&str> = Section::ALL.iter().map(|s| s.as_str()).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "description": "Section-wise suggestions for the resume."
    })
}

pub fn analysis_result_schema() -> Value {
    let ats_labels: Vec<&str> = AtsCompatibility::ALL.iter().map(|a| a.as_str()).collect();

    json!({
        "type": "object",
        "properties": {
            "resumeStrengthScore": {
                "type": "string",
                "description": "A score out of 10, e.g. \"7/10\"."
            },
            "atsCompatibility": {
                "type": "string",
                "enum": ats_labels,
                "description": "ATS compatibility classification."
            },
            "originalSummary": {
                "type": "string",
                "description": "The original professional summary from the resume."
            },
            "improvedSummary": {
                "type": "string",
                "description": "An improved professional summary, 3-4 lines long."
            },
            "skillsToAddOrImprove": string_array("A list of skills to add or improve."),
            "atsKeywordsMissing": string_array("A list of missing ATS keywords."),
            "sectionWiseSuggestions": section_suggestions_schema()
        },
        "required": [
            "resumeStrengthScore",
            "atsCompatibility",
            "originalSummary",
            "improvedSummary",
            "skillsToAddOrImprove",
            "atsKeywordsMissing",
            "sectionWiseSuggestions"
        ]
    })
}

pub fn improved_summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "improvedSummary": {
                "type": "string",
                "description": "An improved professional summary for the resume."
            }
        },
        "required": ["improvedSummary"]
    })
}

pub fn improved_resume_text_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "improvedResumeText": {
                "type": "string",
                "description": "The full text of the resume with the summary replaced."
            }
        },
        "required": ["improvedResumeText"]
    })
}

/// The sub-capability the analysis call may invoke to regenerate the summary.
pub fn improved_summary_tool() -> ToolDeclaration {
    ToolDeclaration {
        name: IMPROVED_SUMMARY_TOOL,
        description: "Generates an improved 3-4 line professional summary for the given resume \
            text, or returns the existing summary unchanged if it is already strong.",
        parameters: json!({
            "type": "object",
            "properties": {
                "resumeText": {
                    "type": "string",
                    "description": "The text of the resume to analyze."
                }
            },
            "required": ["resumeText"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::ImprovedSummaryInput;

    fn valid_result_json() -> Value {
        json!({
            "resumeStrengthScore": "7/10",
            "atsCompatibility": "Average",
            "originalSummary": "Experienced Software Engineer.",
            "improvedSummary": "Software engineer who ships reliable web apps.",
            "skillsToAddOrImprove": ["TypeScript", "Docker"],
            "atsKeywordsMissing": ["CI/CD", "REST APIs"],
            "sectionWiseSuggestions": {
                "summary": ["Lead with impact."],
                "skills": ["Group by category."],
                "experience": ["Quantify results."],
                "projects": ["Add a project section."],
                "education": ["List relevant coursework."]
            }
        })
    }

    #[test]
    fn test_validate_request_rejects_empty_text() {
        for text in ["", "   ", "\n\t  \n"] {
            let request = AnalysisRequest {
                resume_text: text.to_string(),
                job_role: Some("Engineer".to_string()),
            };
            assert!(matches!(
                validate_request(request),
                Err(AnalysisError::InvalidInput { field: "Resume text" })
            ));
        }
    }

    #[test]
    fn test_validate_request_keeps_text_verbatim_and_trims_role() {
        let request = AnalysisRequest {
            resume_text: "  Jane Doe\n".to_string(),
            job_role: Some("  Data Scientist ".to_string()),
        };
        let validated = validate_request(request).unwrap();
        assert_eq!(validated.resume_text, "  Jane Doe\n");
        assert_eq!(validated.job_role.as_deref(), Some("Data Scientist"));
    }

    #[test]
    fn test_validate_request_blank_role_becomes_none() {
        let request = AnalysisRequest {
            resume_text: "Jane".to_string(),
            job_role: Some("   ".to_string()),
        };
        assert!(validate_request(request).unwrap().job_role.is_none());
    }

    #[test]
    fn test_validate_rewrite_request_requires_both_fields() {
        let missing_summary = SummaryRewriteRequest {
            resume_text: "Jane".into(),
            improved_summary: " ".into(),
        };
        assert!(matches!(
            validate_rewrite_request(&missing_summary),
            Err(AnalysisError::InvalidInput { field: "Improved summary" })
        ));
    }

    #[test]
    fn test_validate_result_accepts_complete_record() {
        let result = validate_result(valid_result_json()).unwrap();
        assert_eq!(result.ats_compatibility, AtsCompatibility::Average);
        assert_eq!(result.resume_strength_score.as_str(), "7/10");
        assert_eq!(result.section_wise_suggestions.education.len(), 1);
    }

    #[test]
    fn test_validate_result_rejects_unknown_ats_label() {
        let mut raw = valid_result_json();
        raw["atsCompatibility"] = json!("Excellent");
        assert!(matches!(
            validate_result(raw),
            Err(AnalysisError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_validate_result_rejects_missing_field() {
        let mut raw = valid_result_json();
        raw.as_object_mut().unwrap().remove("improvedSummary");
        assert!(matches!(
            validate_result(raw),
            Err(AnalysisError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_validate_result_rejects_wrong_types() {
        let mut numeric_score = valid_result_json();
        numeric_score["resumeStrengthScore"] = json!(7);
        assert!(validate_result(numeric_score).is_err());

        let mut string_suggestions = valid_result_json();
        string_suggestions["sectionWiseSuggestions"]["skills"] = json!("Group by category.");
        assert!(validate_result(string_suggestions).is_err());

        let mut comma_keywords = valid_result_json();
        comma_keywords["atsKeywordsMissing"] = json!("CI/CD, REST APIs");
        assert!(validate_result(comma_keywords).is_err());
    }

    #[test]
    fn test_validate_result_rejects_extra_fields() {
        let mut extra_top = valid_result_json();
        extra_top["confidence"] = json!("high");
        assert!(validate_result(extra_top).is_err());

        let mut extra_section = valid_result_json();
        extra_section["sectionWiseSuggestions"]["awards"] = json!([]);
        assert!(validate_result(extra_section).is_err());
    }

    #[test]
    fn test_validate_result_round_trips_byte_identical() {
        let raw = valid_result_json();
        let result = validate_result(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), raw);
    }

    #[test]
    fn test_parse_reply_json_strips_fences() {
        let value = parse_reply_json("```json\n{\"improvedSummary\": \"x\"}\n```").unwrap();
        assert_eq!(value["improvedSummary"], "x");
    }

    #[test]
    fn test_parse_reply_json_rejects_prose() {
        assert!(matches!(
            parse_reply_json("Here is your analysis!"),
            Err(AnalysisError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_analysis_schema_requires_all_seven_fields() {
        let schema = analysis_result_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 7);
        assert_eq!(
            schema["properties"]["atsCompatibility"]["enum"],
            json!(["Poor", "Average", "Strong"])
        );
        assert_eq!(
            schema["properties"]["sectionWiseSuggestions"]["required"],
            json!(["summary", "skills", "experience", "projects", "education"])
        );
    }

    #[test]
    fn test_tool_arguments_validate_against_their_own_schema() {
        let ok: ImprovedSummaryInput = validate_output(json!({"resumeText": "Jane"})).unwrap();
        assert_eq!(ok.resume_text, "Jane");
        assert!(validate_output::<ImprovedSummaryInput>(json!({"text": "Jane"})).is_err());
        assert_eq!(improved_summary_tool().name, IMPROVED_SUMMARY_TOOL);
    }
}
