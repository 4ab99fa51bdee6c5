use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::AppError;

/// Form label used when the submission carries no `roistat.formName`.
pub const DEFAULT_FORM_NAME: &str = "Форма обратной связи";
/// Source label used when the submission carries no `roistat.source`.
pub const DEFAULT_SOURCE: &str = "Support360";
/// Pipeline status used when the submission carries no `roistat.status`.
pub const DEFAULT_PIPELINE_STATUS: &str = "C11:NEW";
/// Prefix of the lead comment; the form name is appended to it.
pub const COMMENT_PREFIX: &str = "Заявка с формы: ";

/// CRM custom field holding the form name.
pub const FORM_NAME_FIELD: &str = "UF_CRM_1685464673696";
/// CRM custom field holding the traffic source.
pub const SOURCE_FIELD: &str = "UF_CRM_1697621364";

/// Contact form submission as posted by the landing page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    /// Roistat tracking context collected by the front-end counter
    #[serde(default)]
    pub roistat: Option<RoistatContext>,
}

/// Free-form Roistat context. Known keys are forwarded verbatim, whatever
/// their JSON type; anything else is kept in `extra` and ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RoistatContext {
    /// Roistat visit number (`roistat_visit` cookie)
    #[serde(default)]
    pub visit: Option<Value>,

    #[serde(default, rename = "formName")]
    pub form_name: Option<Value>,

    #[serde(default)]
    pub source: Option<Value>,

    /// Pipeline status code, e.g. "C11:NEW"
    #[serde(default)]
    pub status: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A submission whose required fields passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLead {
    pub name: String,
    pub phone: String,
    pub roistat: RoistatContext,
}

impl LeadSubmission {
    /// Decodes a raw request body.
    ///
    /// Syntax errors, an empty body and an object whose fields do not fit the
    /// submission shape are reported as `Invalid JSON received`. Valid JSON
    /// that is not an object (an array, `null`, a scalar) carries no fields
    /// and decodes to an empty submission, which validation then rejects.
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("Failed to parse lead submission: {}", e);
            AppError::invalid_json()
        })?;

        // Only objects: derived structs would also accept arrays positionally
        let Value::Object(fields) = value else {
            tracing::debug!("Lead submission is not a JSON object");
            return Ok(Self::default());
        };

        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            tracing::debug!("Failed to decode lead submission: {}", e);
            AppError::invalid_json()
        })
    }

    /// Trims `name` and `phone` and requires both to be non-empty.
    pub fn validate(self) -> Result<ValidatedLead, AppError> {
        match (non_blank(self.name), non_blank(self.phone)) {
            (Some(name), Some(phone)) => Ok(ValidatedLead {
                name,
                phone,
                roistat: self.roistat.unwrap_or_default(),
            }),
            _ => Err(AppError::missing_required_fields()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Body of the Roistat `leads/add` call.
#[derive(Clone, PartialEq, Serialize)]
pub struct LeadPayload {
    pub api_key: String,
    pub lead: Lead,
    pub pipeline: Pipeline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    /// `null` when the visitor has no Roistat visit
    pub visit_id: Value,
    pub name: String,
    pub phone: String,
    pub comment: String,
    pub custom_fields: CustomFields,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomFields {
    #[serde(rename = "UF_CRM_1685464673696")]
    pub form_name: Value,

    #[serde(rename = "UF_CRM_1697621364")]
    pub source: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
    pub status: Value,
}

impl LeadPayload {
    /// Builds the upstream payload, filling absent Roistat context with the
    /// fixed defaults. Present values (including empty strings) win.
    pub fn build(api_key: &str, lead: ValidatedLead) -> Self {
        let RoistatContext {
            visit,
            form_name,
            source,
            status,
            ..
        } = lead.roistat;

        let form_name = form_name.unwrap_or_else(|| Value::from(DEFAULT_FORM_NAME));
        let comment = format!("{}{}", COMMENT_PREFIX, value_as_text(&form_name));

        Self {
            api_key: api_key.to_string(),
            lead: Lead {
                visit_id: visit.unwrap_or(Value::Null),
                name: lead.name,
                phone: lead.phone,
                comment,
                custom_fields: CustomFields {
                    form_name,
                    source: source.unwrap_or_else(|| Value::from(DEFAULT_SOURCE)),
                },
            },
            pipeline: Pipeline {
                status: status.unwrap_or_else(|| Value::from(DEFAULT_PIPELINE_STATUS)),
            },
        }
    }
}

impl fmt::Debug for LeadPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadPayload")
            .field("api_key", &"[REDACTED]")
            .field("lead", &self.lead)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

/// Strings are used as-is; other JSON values in their compact text form.
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
