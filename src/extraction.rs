use crate::error::{extraction_error, AppResult};
use crate::schedule::models::{ExtractionResult, ReminderSpec};
use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::gemini::Client as GeminiClient;
use schemars::schema_for;
use serde_json::from_str;
use tracing::{error, info};

const SYSTEM_PROMPT: &str = "You are an assistant that extracts structured medication reminder data from natural language voice notes. \
Read the user's statement and output a single JSON object with a key \"reminders\" holding a list of reminder objects.

Each reminder object has exactly these fields (use null for anything not mentioned):
1. \"medication_name\": (string | null) name of the medicine, e.g. \"Metformin\", \"thyroid pill\".
2. \"description\": (string | null) a concise summary built from the user's keywords (medicine + frequency + duration + time).
3. \"dosage\": (string | null) dosage info, e.g. \"500mg\", \"1 tablet\".
4. \"times\": (array of strings | null) specific clock times in 24-hour \"HH:MM\" format. Use ONLY when the user names a specific time, e.g. \"at 5 pm\" becomes [\"17:00\"].
5. \"frequency\": (string | null) repetition pattern, e.g. \"daily\", \"twice a day\", \"every alternate day\", \"weekly\".
6. \"days_of_week\": (array of strings | null) full English day names, e.g. [\"Monday\", \"Wednesday\"].
7. \"duration\": (string | null) treatment length, e.g. \"5 days\", \"2 months\".
8. \"relative_time\": (string | null) time-of-day or meal keywords: \"morning\", \"afternoon\", \"noon\", \"evening\", \"night\", \"breakfast\", \"lunch\", \"dinner\", \"bedtime\"; also relative offsets like \"30 mins before dinner\" or \"2 hours after breakfast\".
9. \"notes\": (string | null) extra conditions, e.g. \"take with food\".

Rules:
- If the user gives a specific clock time, fill \"times\" and leave \"relative_time\" for vague phrasing only.
- If the user mentions several medicines or distinct time slots, emit SEPARATE objects in the \"reminders\" list.
- If the user corrects themselves, keep only the final value.
- Never invent values; unmentioned fields are strict null.
- Output pure JSON only, no markdown.";

/// Extraction collaborator: free text in, structured reminders out
#[async_trait]
pub trait ReminderExtractor: Send + Sync + 'static {
    async fn extract(&self, prompt: &str) -> AppResult<Vec<ReminderSpec>>;
}

/// Full preamble sent to the model: the instructions plus the generated
/// JSON schema of the expected output shape
fn extraction_preamble() -> String {
    let schema = schema_for!(ExtractionResult);
    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_default();
    format!("{SYSTEM_PROMPT}\n\nThe response must validate against this JSON schema:\n{schema_json}")
}

/// Gemini-backed extractor
pub struct GeminiExtractor {
    api_key: String,
    model: String,
}

impl GeminiExtractor {
    pub fn new(api_key: String, model: String) -> Self {
        Self { api_key, model }
    }
}

#[async_trait]
impl ReminderExtractor for GeminiExtractor {
    async fn extract(&self, prompt: &str) -> AppResult<Vec<ReminderSpec>> {
        info!("Extracting reminders with Gemini model: {}", self.model);

        let gemini_client = GeminiClient::new(&self.api_key);

        let agent = gemini_client
            .agent(&self.model)
            .preamble(&extraction_preamble())
            .temperature(0.2)
            .build();

        let response = agent
            .chat(prompt.to_string(), Vec::<Message>::new())
            .await
            .map_err(|e| extraction_error(&format!("Gemini request failed: {}", e)))?;

        info!("Received response from Gemini");

        let result = parse_json_from_response(&response)?;
        Ok(result.reminders)
    }
}

/// Attempt to parse the reminders JSON object from the model response
fn parse_json_from_response(response: &str) -> AppResult<ExtractionResult> {
    // Try to extract a JSON object from the text
    if let (Some(json_start), Some(json_end)) = (response.find('{'), response.rfind('}')) {
        if json_start < json_end {
            let json_str = &response[json_start..=json_end];
            match from_str::<ExtractionResult>(json_str) {
                Ok(result) => return Ok(result),
                Err(e) => {
                    error!("Failed to parse JSON from response: {}", e);
                    error!("JSON string: {}", json_str);
                }
            }
        }
    }

    // Try to parse the entire response as JSON (in case it's already clean JSON)
    match from_str::<ExtractionResult>(response) {
        Ok(result) => Ok(result),
        Err(e) => {
            error!("Could not extract valid JSON from response: {}", e);
            Err(extraction_error(
                "Could not extract valid JSON from the model response",
            ))
        }
    }
}
