//! Prompt templates for industry insight reports
//!
//! Rendering is pure: the same records, industry and variant always produce
//! the same prompt text.

use std::fmt;

use insights_core::{NewsRecord, RecordLayout, ReportStyle, TemplateVariant};

/// A fully assembled prompt, sent to a generator exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPrompt(String);

impl FormattedPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FormattedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const INSIGHTS_SECTIONS: &[(&str, &str)] = &[
    (
        "Key Trends",
        "List at least **5 major trends** shaping this industry, with detailed explanations and examples.",
    ),
    (
        "Challenges & Risks",
        "Discuss **critical barriers** including regulatory, ethical, and technological concerns.",
    ),
    (
        "Future Predictions",
        "Forecast **how this industry will evolve** over the next 5 years. Highlight upcoming **technologies, business models, and trends**.",
    ),
];

const EXECUTIVE_SECTIONS: &[(&str, &str)] = &[
    (
        "Executive Summary",
        "Summarize the state of the industry in **3-4 sentences** a senior executive can read in one minute.",
    ),
    (
        "Market Landscape",
        "Describe the **key players, market movements and investment activity** visible in the news.",
    ),
    (
        "Key Trends & Emerging Technologies",
        "List at least **5 major trends or technologies**, each with a concrete example from the articles.",
    ),
    (
        "Challenges & Risks",
        "Discuss **regulatory, ethical, competitive and technological risks** and who they affect most.",
    ),
    (
        "Outlook & Recommendations",
        "Forecast the **next 3-5 years** and give **actionable recommendations** for companies in this industry.",
    ),
];

/// Render a single record in the chosen layout
pub fn format_record(record: &NewsRecord, layout: RecordLayout) -> String {
    match layout {
        RecordLayout::Plain => format!(
            "Title: {}\nPublished: {}\nContent: {}\nSource: {}",
            record.title, record.published, record.content, record.link
        ),
        RecordLayout::Markdown => format!(
            "### [{}]({})\n*Published: {}*\n\n{}",
            record.title, record.link, record.published, record.content
        ),
        RecordLayout::Html => format!(
            "<div class=\"news-card\">\n    <b>Title:</b> {}<br>\n    <b>Summary:</b> {}<br>\n    <b>Source:</b> <a class='news-source-link' href='{}' target='_blank'>Read more</a>\n</div>",
            record.title, record.content, record.link
        ),
    }
}

/// Render all records, separated by a blank line, in aggregation order
pub fn format_news_block(records: &[NewsRecord], layout: RecordLayout) -> String {
    records
        .iter()
        .map(|record| format_record(record, layout))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn section_heading(index: usize, heading: &str, layout: RecordLayout) -> String {
    match layout {
        RecordLayout::Html => format!("<div class='section-header'>{}. {}</div>", index, heading),
        RecordLayout::Plain | RecordLayout::Markdown => format!("### {}. {}", index, heading),
    }
}

fn format_sections(variant: TemplateVariant) -> String {
    let sections = match variant.report {
        ReportStyle::Insights => INSIGHTS_SECTIONS,
        ReportStyle::Executive => EXECUTIVE_SECTIONS,
    };

    sections
        .iter()
        .enumerate()
        .map(|(i, (heading, instruction))| {
            format!(
                "{}\n- {}",
                section_heading(i + 1, heading, variant.layout),
                instruction
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Embed the news block in the instructional report template
///
/// An empty `records` slice yields an empty news block; whether such a
/// prompt is worth sending is decided by the caller.
pub fn format_prompt(
    records: &[NewsRecord],
    industry: &str,
    variant: TemplateVariant,
) -> FormattedPrompt {
    let industry = industry.trim();
    let news_block = format_news_block(records, variant.layout);

    let task = match variant.report {
        ReportStyle::Insights => format!(
            "You are an AI analyst. Based on the following recent news articles about the {} industry, generate a **detailed report** on key trends, emerging technologies, challenges, and predictions for the future.",
            industry
        ),
        ReportStyle::Executive => format!(
            "You are a senior industry analyst preparing an executive report on the {} industry. Use the following recent news articles as your primary evidence and cite article titles where relevant.",
            industry
        ),
    };

    FormattedPrompt(format!(
        "{}\n\n{}\n\n**Output:**\n{}\n\nFormat your response with **bold** for key insights.",
        task,
        news_block,
        format_sections(variant)
    ))
}

/// Prompt for the second stage that condenses a generated report
pub fn format_summary_prompt(industry: &str, insights: &str) -> FormattedPrompt {
    FormattedPrompt(format!(
        "Summarize the following {} industry report into a concise brief of at most 5 bullet points. Keep the most important trends, risks and predictions, and keep **bold** emphasis on key insights.\n\n{}",
        industry.trim(),
        insights
    ))
}
