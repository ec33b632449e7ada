//! Prompts for the two inference calls.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing an instruction (e.g. the sign
//!    convention wording) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without a
//!    real LLM, so a dropped multiplier instruction is caught immediately.
//!
//! The extraction system prompt can be overridden via
//! [`crate::config::ExtractionConfig::system_prompt`]; the classification
//! prompt is fixed because its closed-ended phrasing is what the reply
//! parser depends on.

use crate::statement::UnitMultiplier;

/// Build the unit-classification prompt over a bounded text excerpt.
///
/// Closed-ended by construction: the model is told to answer with a bare
/// integer from the fixed set, which keeps parsing trivial and makes any
/// chatty reply safely degrade to multiplier 1.
pub fn classification_prompt(excerpt: &str) -> String {
    format!(
        "Look at the start of this financial document. Does it state that amounts \
         are reported 'in thousands', 'in millions', or 'in billions'?\n\
         Return ONLY the integer multiplier: 1000, 1000000, or 1000000000.\n\
         If the reporting unit is not specified, return 1.\n\n{excerpt}"
    )
}

/// Build the extraction system prompt, with the inferred multiplier and the
/// sign convention baked in.
///
/// Used when `ExtractionConfig::system_prompt` is `None`.
pub fn extraction_system_prompt(multiplier: UnitMultiplier) -> String {
    let factor = multiplier.factor();
    format!(
        "You are a senior financial auditor. Extract data from the document into a strict JSON object.\n\
         \n\
         Follow these rules precisely:\n\
         \n\
         1. UNITS\n\
            - The document reports values at a multiplier of {factor}.\n\
            - Multiply every raw numeric value by {factor} before emitting it.\n\
         \n\
         2. SIGN CONVENTION\n\
            - Parenthesised numbers are negative: (500) -> -500.\n\
         \n\
         3. STRUCTURE\n\
            - Emit a \"balance_sheet\" object with \"assets\", \"liabilities\", and \"owners_equity\" sections,\n\
              including \"total_assets\", \"total_liabilities\", and \"total_shareholders_equity\".\n\
            - Emit a \"retained_earnings\" object with \"opening_balance\", \"net_income\",\n\
              \"dividends\", and \"closing_balance\".\n\
            - Include any other statements present (income statement, cash flow) as additional objects.\n\
         \n\
         4. OUTPUT FORMAT\n\
            - Return ONLY valid JSON.\n\
            - Do NOT wrap the output in markdown fences.\n\
            - Do NOT add commentary or explanations."
    )
}

/// Build the extraction user message wrapping the bounded document excerpt.
pub fn extraction_user_prompt(excerpt: &str) -> String {
    format!("Extract the financial data from this document:\n\n{excerpt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_prompt_names_the_closed_set() {
        let p = classification_prompt("ACME CORP ANNUAL REPORT");
        assert!(p.contains("1000000000"));
        assert!(p.contains("return 1"));
        assert!(p.contains("ACME CORP"));
    }

    #[test]
    fn extraction_prompt_embeds_multiplier() {
        let p = extraction_system_prompt(UnitMultiplier::Millions);
        assert!(p.contains("1000000"), "multiplier must appear: {p}");
        assert!(p.contains("(500) -> -500"), "sign convention must appear");
        assert!(p.contains("ONLY valid JSON"));
    }

    #[test]
    fn extraction_prompt_names_validated_fields() {
        let p = extraction_system_prompt(UnitMultiplier::Units);
        for field in [
            "total_assets",
            "total_liabilities",
            "total_shareholders_equity",
            "opening_balance",
            "net_income",
            "dividends",
            "closing_balance",
        ] {
            assert!(p.contains(field), "prompt must request {field}");
        }
    }
}
