// Prompt fragments shared by every caller of the LLM client.

/// System prompt that pins the model to a bare JSON answer.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to any prompt that rewrites user-supplied facts.
pub const NO_FABRICATION: &str = "\
    CRITICAL: Do not invent employers, titles, dates, degrees, metrics or technologies. \
    Only rephrase, reorder and tighten what the input already says. \
    If a detail is not in the input, leave it out.";
