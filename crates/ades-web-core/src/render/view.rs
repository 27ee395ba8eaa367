//! Builds the results fragment for a [`RenderState`].
//!
//! Every call produces a brand new root element; nothing is patched.

use crate::analysis::model::Violation;
use crate::config::ViewConfig;
use crate::render::node::{Element, Node};
use crate::render::state::RenderState;
use crate::rules::catalog::RuleId;

pub const WORKING_TEXT: &str = "Working...";
pub const NO_PROBLEMS_TEXT: &str = "No problems detected";

/// Results container holding the fragment for `state`.
pub fn render(state: &RenderState, config: &ViewConfig) -> Element {
    let children = match state {
        RenderState::Idle => Vec::new(),
        RenderState::Working => working(),
        RenderState::Error { summary, details } => error(summary, details),
        RenderState::Result(violations) => result(violations),
    };

    let root = Element::new("div").attr("id", config.results_id.clone());
    children.into_iter().fold(root, Element::child)
}

pub fn working() -> Vec<Node> {
    vec![Element::new("p").class("working").text(WORKING_TEXT).into()]
}

pub fn error(summary: &str, details: &str) -> Vec<Node> {
    let block = Element::new("div")
        .class("error")
        .child(Element::new("span").class("title").text("Error:"))
        .text(" ")
        .child(Element::new("span").class("what").text(summary))
        .child(Element::new("p").class("details").text(details));

    vec![block.into()]
}

pub fn result(violations: &[Violation]) -> Vec<Node> {
    if violations.is_empty() {
        return vec![Element::new("span").text(NO_PROBLEMS_TEXT).into()];
    }

    let title = Element::new("span")
        .class("title")
        .text(found_header(violations.len()));

    let list = violations
        .iter()
        .map(violation_item)
        .fold(Element::new("ul"), Element::child);

    vec![title.into(), list.into()]
}

pub fn found_header(count: usize) -> String {
    let noun = if count == 1 { "problem" } else { "problems" };
    format!("Found {count} {noun}")
}

/// Link to the rule's documentation, opened in a new tab without giving
/// the new page a handle on this window.
pub fn rule_link(rule_id: &RuleId) -> Element {
    Element::new("a")
        .attr("href", rule_id.doc_url())
        .attr("rel", "noopener")
        .attr("target", "_blank")
        .text(rule_id.as_str())
}

/// `[RULE] In job 'JOB', step 'STEP', found 'PROBLEM'.`
pub fn violation_item(violation: &Violation) -> Element {
    let mut li = Element::new("li")
        .text("[")
        .child(rule_link(violation.rule_id()))
        .text("]");

    if let Some(job) = violation.job() {
        li = li
            .text(" In job '")
            .child(Element::new("code").text(job))
            .text("',");
    }

    li.text(" step '")
        .child(Element::new("code").text(violation.step()))
        .text("',")
        .text(" found '")
        .child(Element::new("code").text(violation.problem()))
        .text("'.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: &str, job: Option<&str>, step: &str, problem: &str) -> Violation {
        Violation::new(RuleId::new(id).unwrap(), job.map(String::from), step, problem)
    }

    #[test]
    fn empty_result_is_single_message_without_list() {
        let root = render(&RenderState::Result(vec![]), &ViewConfig::default());
        assert_eq!(root.text_content(), "No problems detected");
        assert!(root.find_all("ul").is_empty());
        assert!(root.find_all("li").is_empty());
    }

    #[test]
    fn header_pluralizes() {
        assert_eq!(found_header(1), "Found 1 problem");
        assert_eq!(found_header(2), "Found 2 problems");
        assert_eq!(found_header(10), "Found 10 problems");
    }

    #[test]
    fn entry_without_job_has_no_job_clause() {
        let li = violation_item(&v("ADES100", None, "Greet", "${{ inputs.name }}"));
        assert_eq!(
            li.text_content(),
            "[ADES100] step 'Greet', found '${{ inputs.name }}'."
        );
    }

    #[test]
    fn entry_with_job_includes_job_clause() {
        let li = violation_item(&v(
            "ADES101",
            Some("build"),
            "Script",
            "${{ github.head_ref }}",
        ));
        assert_eq!(
            li.text_content(),
            "[ADES101] In job 'build', step 'Script', found '${{ github.head_ref }}'."
        );
    }

    #[test]
    fn rule_link_attributes() {
        let id = RuleId::new("ADES200").unwrap();
        let a = rule_link(&id);
        assert_eq!(
            a.get_attr("href"),
            Some("https://github.com/ericcornelissen/ades/blob/main/RULES.md#ADES200")
        );
        assert_eq!(a.get_attr("rel"), Some("noopener"));
        assert_eq!(a.get_attr("target"), Some("_blank"));
        assert_eq!(a.text_content(), "ADES200");
    }

    #[test]
    fn markup_in_fields_stays_inert() {
        let root = render(
            &RenderState::Result(vec![v(
                "ADES100",
                Some("<b>job</b>"),
                "<script>alert(1)</script>",
                "<img src=x onerror=alert(1)>",
            )]),
            &ViewConfig::default(),
        );
        let html = root.to_html();

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));

        // The text itself survives untouched.
        let codes: Vec<String> = root
            .find_all("code")
            .iter()
            .map(|c| c.text_content())
            .collect();
        assert_eq!(
            codes,
            vec![
                "<b>job</b>",
                "<script>alert(1)</script>",
                "<img src=x onerror=alert(1)>"
            ]
        );
    }

    #[test]
    fn entries_keep_received_order_and_duplicates() {
        let violations = vec![
            v("ADES201", None, "z", "p"),
            v("ADES100", None, "a", "p"),
            v("ADES201", None, "z", "p"),
        ];
        let root = render(&RenderState::Result(violations), &ViewConfig::default());

        let links: Vec<String> = root.find_all("a").iter().map(|a| a.text_content()).collect();
        assert_eq!(links, vec!["ADES201", "ADES100", "ADES201"]);
        assert_eq!(root.find_all("span")[0].text_content(), "Found 3 problems");
    }

    #[test]
    fn error_block_shape() {
        let root = render(
            &RenderState::Error {
                summary: "Parsing failure".into(),
                details: "<details>".into(),
            },
            &ViewConfig::default(),
        );
        assert_eq!(
            root.to_html(),
            concat!(
                r#"<div id="results"><div class="error">"#,
                r#"<span class="title">Error:</span> <span class="what">Parsing failure</span>"#,
                r#"<p class="details">&lt;details&gt;</p></div></div>"#
            )
        );
    }

    #[test]
    fn working_placeholder() {
        let root = render(&RenderState::Working, &ViewConfig::default());
        assert_eq!(
            root.to_html(),
            r#"<div id="results"><p class="working">Working...</p></div>"#
        );
    }

    #[test]
    fn idle_is_empty_container() {
        let root = render(&RenderState::Idle, &ViewConfig::default());
        assert!(root.children().is_empty());
        assert_eq!(root.get_attr("id"), Some("results"));
    }

    #[test]
    fn rule_links_ignore_container_config() {
        let config = ViewConfig {
            results_id: "report".into(),
        };
        let root = render(&RenderState::Result(vec![v("ADES100", None, "s", "p")]), &config);
        assert_eq!(root.get_attr("id"), Some("report"));
        assert_eq!(
            root.find_all("a")[0].get_attr("href"),
            Some("https://github.com/ericcornelissen/ades/blob/main/RULES.md#ADES100")
        );
    }
}
