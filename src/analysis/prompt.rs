//! Instruction sent to the model for a single URL.

pub const SYSTEM_INSTRUCTION: &str =
    "You are a world-class cybersecurity analyst specialising in phishing detection. \
     Judge only from the URL text you are given and answer strictly in the requested JSON shape.";

/// Domains younger than this are called out as a significant risk factor
pub const YOUNG_DOMAIN_MONTHS: u32 = 6;

pub fn build_prompt(url: &str) -> String {
    format!(r#"Analyze the following URL for potential phishing threats: {url}

Act as a world-class cybersecurity analyst. Evaluate the URL based on the following criteria:

1. DOMAIN ANALYSIS:
   - CRITICAL: Determine the domain's registration date/age. If the domain is less than {months} months old, flag it as a significant risk factor. State the approximate age or registration date if found.
   - Check TLD reputation (.zip, .mov are suspicious), subdomain complexity, and character impersonation (homoglyphs).

2. URL STRUCTURE:
   Look for excessive length, use of IP addresses, unnecessary redirection, keyword stuffing ('login', 'secure', 'account'), and brand impersonation.

3. CONTENT CLUES (HYPOTHETICAL):
   Infer potential content. Does it suggest urgency, credential harvesting, or fake offers?

4. THREAT INTELLIGENCE CONTEXT:
   Cross-reference with known phishing patterns, even if you don't have a live database.

Based on your analysis, provide a risk level (SAFE, SUSPICIOUS, MALICIOUS), a confidence score (0-100), a concise summary, and a detailed breakdown."#,
        url = url,
        months = YOUNG_DOMAIN_MONTHS,
    )
}
