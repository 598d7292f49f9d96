/// Type names accepted by [`generate_typescript_definitions`], in export order.
pub const ALL_TYPE_NAMES: &[&str] = &[
    "LoginRequest",
    "LoginResponse",
    "UserRole",
    "UserInfo",
    "QuestionnaireSummary",
    "QuestionnaireListResponse",
    "QuestionType",
    "QuestionView",
    "DraftValue",
    "QuestionnaireFormResponse",
    "SubmitAnswersRequest",
    "SubmitAnswersResponse",
    "CompletionSummary",
    "CompletionListResponse",
    "AnsweredQuestion",
    "QuestionnaireAnswers",
    "UserAnswersResponse",
    "ErrorResponse",
    "HealthResponse",
];

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;

    let result = match name {
        "LoginRequest" => LoginRequest::export_to_string()?,
        "LoginResponse" => LoginResponse::export_to_string()?,
        "UserRole" => UserRole::export_to_string()?,
        "UserInfo" => UserInfo::export_to_string()?,

        "QuestionnaireSummary" => QuestionnaireSummary::export_to_string()?,
        "QuestionnaireListResponse" => QuestionnaireListResponse::export_to_string()?,
        "QuestionType" => QuestionType::export_to_string()?,
        "QuestionView" => QuestionView::export_to_string()?,
        "DraftValue" => DraftValue::export_to_string()?,
        "QuestionnaireFormResponse" => QuestionnaireFormResponse::export_to_string()?,
        "SubmitAnswersRequest" => SubmitAnswersRequest::export_to_string()?,
        "SubmitAnswersResponse" => SubmitAnswersResponse::export_to_string()?,

        "CompletionSummary" => CompletionSummary::export_to_string()?,
        "CompletionListResponse" => CompletionListResponse::export_to_string()?,
        "AnsweredQuestion" => AnsweredQuestion::export_to_string()?,
        "QuestionnaireAnswers" => QuestionnaireAnswers::export_to_string()?,
        "UserAnswersResponse" => UserAnswersResponse::export_to_string()?,

        "ErrorResponse" => ErrorResponse::export_to_string()?,
        "HealthResponse" => HealthResponse::export_to_string()?,

        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in intake-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .cloned()
        .collect();

    filtered.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_single_type() {
        let result = generate_typescript_definitions(&["QuestionnaireSummary"]).unwrap();
        assert!(result.contains("QuestionnaireSummary"));
        assert!(result.contains("name: string"));
    }

    #[test]
    fn test_generate_multiple_types() {
        let result =
            generate_typescript_definitions(&["CompletionSummary", "QuestionType"]).unwrap();
        assert!(result.contains("CompletionSummary"));
        assert!(result.contains("\"multi_choice\""));
    }

    #[test]
    fn test_every_listed_type_exports() {
        assert!(generate_typescript_definitions(ALL_TYPE_NAMES).is_ok());
    }

    #[test]
    fn test_unknown_type_error() {
        let result = generate_typescript_definitions(&["NonExistentType"]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown type"));
    }

    #[test]
    fn test_empty_type_names() {
        let result = generate_typescript_definitions(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cleaned_output() {
        let result = generate_typescript_definitions(&["LoginResponse"]).unwrap();
        assert!(!result.contains("import type"));
        assert!(!result.contains("This file was generated"));
    }
}
