//! Prompt template for document summaries.
//!
//! The template lives here and nowhere else, so changing the wording never
//! touches the HTTP code in [`super::ollama`].

use crate::models::SummaryStyle;

fn style_guidance(style: SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::Concise => "Brief overview of the main points only, in one or two paragraphs.",
        SummaryStyle::Detailed => {
            "Comprehensive coverage of the key details, in three to five paragraphs."
        }
        SummaryStyle::Bullets => {
            "Structured bullet points covering the main sections and findings."
        }
    }
}

/// Build the summarization prompt for one document
///
/// `max_words` is guidance for the model; nothing checks the reply against it.
pub fn summary_prompt(style: SummaryStyle, max_words: usize, content: &str) -> String {
    format!(
        "# DOCUMENT SUMMARIZATION TASK\n\
         \n\
         You are a research assistant who writes accurate summaries of scholarly \
         documents, reports and papers.\n\
         \n\
         ## REQUIREMENTS\n\
         - Style: {style} ({guidance})\n\
         - Word limit: at most {max_words} words\n\
         - Focus: main ideas, methodology, key findings and conclusions\n\
         - Tone: professional and objective; keep technical terms as written\n\
         - Use complete sentences unless bullet points were requested\n\
         - Include key quantitative results when present\n\
         - End with the main conclusions or implications\n\
         \n\
         ## TEXT TO SUMMARIZE\n\
         {content}\n\
         \n\
         ## SUMMARY\n",
        style = style.as_str(),
        guidance = style_guidance(style),
        max_words = max_words,
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_all_parameters() {
        let prompt = summary_prompt(SummaryStyle::Bullets, 120, "Transformers scale well.");
        assert!(prompt.contains("Style: bullets"));
        assert!(prompt.contains("at most 120 words"));
        assert!(prompt.contains("Transformers scale well."));
        assert!(prompt.contains("bullet points covering"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = summary_prompt(SummaryStyle::Concise, 250, "text");
        let b = summary_prompt(SummaryStyle::Concise, 250, "text");
        assert_eq!(a, b);
    }

    #[test]
    fn content_with_braces_is_not_reinterpreted() {
        let prompt = summary_prompt(SummaryStyle::Detailed, 50, "f(x) = {max_words}");
        assert!(prompt.contains("f(x) = {max_words}"));
        assert!(prompt.contains("at most 50 words"));
    }

    #[test]
    fn content_follows_requirements() {
        let prompt = summary_prompt(SummaryStyle::Concise, 250, "BODY");
        assert!(prompt.find("## REQUIREMENTS").unwrap() < prompt.find("BODY").unwrap());
    }
}
