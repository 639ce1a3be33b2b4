// Prompt constants for résumé enhancement.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION};

/// System prompt for enhancement. JSON-only, same shape in as out.
pub fn enhance_system() -> String {
    format!("You are an expert resume writer. {JSON_ONLY_SYSTEM}")
}

/// Enhancement prompt template. Replace `{job_description}` and `{resume_json}` before sending.
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"Enhance this resume to better match the job description while keeping it truthful and professional.

1. Experience descriptions:
   - open each line with a strong action verb
   - quantify achievements where the input already gives numbers
   - surface responsibilities that matter for this job

2. Skills:
   - put skills named in the job description first
   - drop skills with no bearing on the job

3. Professional summary:
   - lead with the qualifications that match the job
   - use the job description's own keywords where they are true of the candidate

Keep one achievement per line in every description, separated by "\n".

{no_fabrication}

Job description:
{job_description}

Current resume (JSON):
{resume_json}

Return the enhanced resume as a JSON object with exactly the same fields and nesting as the input."#;

pub fn build_enhance_prompt(resume_json: &str, job_description: &str) -> String {
    ENHANCE_PROMPT_TEMPLATE
        .replace("{no_fabrication}", NO_FABRICATION)
        .replace("{job_description}", job_description.trim())
        .replace("{resume_json}", resume_json)
}
