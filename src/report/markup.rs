use std::fmt::Write as FmtWrite;

use chrono::SecondsFormat;

use super::StructuredReport;
use crate::types::{ComparisonResult, Geometry};

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;color:#1f2933}\
table{border-collapse:collapse;margin:.5rem 0}\
td,th{border:1px solid #cbd2d9;padding:.25rem .5rem;text-align:left}\
.critical{color:#b42318}.ok{color:#027a48}.muted{color:#616e7c}";

/// Renders the report as a standalone HTML document.
///
/// Output depends only on `report`; the timestamp shown is
/// `report.generated_at`.
pub fn render_markup(report: &StructuredReport) -> String {
    let mut buf = String::new();
    let summary = &report.summary;
    let generated = report
        .generated_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    writeln!(buf, "<!DOCTYPE html>").ok();
    writeln!(buf, "<html lang=\"en\">").ok();
    writeln!(buf, "<head>").ok();
    writeln!(buf, "<meta charset=\"utf-8\">").ok();
    writeln!(buf, "<title>Design conformance report</title>").ok();
    writeln!(buf, "<style>{}</style>", STYLE).ok();
    writeln!(buf, "</head>").ok();
    writeln!(buf, "<body>").ok();
    writeln!(buf, "<h1>Design conformance report</h1>").ok();
    writeln!(
        buf,
        "<p class=\"muted\">Generated at <time datetime=\"{0}\">{0}</time></p>",
        escape(&generated)
    )
    .ok();

    writeln!(buf, "<section id=\"summary\">").ok();
    writeln!(buf, "<h2>Summary</h2>").ok();
    writeln!(buf, "<ul>").ok();
    writeln!(buf, "<li>Comparisons: {}</li>", summary.total_comparisons).ok();
    writeln!(buf, "<li>Differences: {}</li>", summary.total_differences).ok();
    let critical_class = if summary.critical_issues > 0 { "critical" } else { "ok" };
    writeln!(
        buf,
        "<li class=\"{}\">Critical issues: {}</li>",
        critical_class, summary.critical_issues
    )
    .ok();
    let viewports: Vec<String> = summary
        .viewports_covered
        .iter()
        .map(|name| escape(name))
        .collect();
    let viewports = if viewports.is_empty() {
        "none".to_string()
    } else {
        viewports.join(", ")
    };
    writeln!(buf, "<li>Viewports: {}</li>", viewports).ok();
    for (viewport, count) in &report.unmatched_elements {
        writeln!(
            buf,
            "<li class=\"muted\">Unmatched elements ({}): {}</li>",
            escape(viewport),
            count
        )
        .ok();
    }
    writeln!(buf, "</ul>").ok();
    writeln!(buf, "</section>").ok();

    writeln!(buf, "<section id=\"results\">").ok();
    writeln!(buf, "<h2>Results</h2>").ok();
    if report.results.is_empty() {
        writeln!(buf, "<p class=\"muted\">No comparisons were recorded.</p>").ok();
    }
    for (index, result) in report.results.iter().enumerate() {
        render_result(&mut buf, index + 1, result);
    }
    writeln!(buf, "</section>").ok();
    writeln!(buf, "</body>").ok();
    writeln!(buf, "</html>").ok();
    buf
}

fn render_result(buf: &mut String, index: usize, result: &ComparisonResult) {
    let node = &result.design_node;
    let element = &result.element;

    writeln!(buf, "<article class=\"result\">").ok();
    writeln!(
        buf,
        "<h3>#{} {} <span class=\"muted\">@ {}</span></h3>",
        index,
        escape(&node.name),
        escape(&result.viewport.to_string())
    )
    .ok();
    writeln!(
        buf,
        "<p>Design node: {} <code>{}</code> ({}) {}</p>",
        escape(&node.name),
        escape(&node.id),
        escape(&node.kind),
        node.geometry
            .as_ref()
            .map(format_geometry)
            .unwrap_or_else(|| "no geometry".to_string())
    )
    .ok();
    writeln!(
        buf,
        "<p>Element: {} <code>{}</code> {} (device px)</p>",
        escape(&element.display_name),
        escape(&element.selector),
        format_geometry(&element.geometry)
    )
    .ok();

    if result.differences.is_empty() {
        writeln!(buf, "<p class=\"ok\">No differences</p>").ok();
    } else {
        writeln!(buf, "<table>").ok();
        writeln!(
            buf,
            "<tr><th>Property</th><th>Design</th><th>Actual</th><th>Delta</th></tr>"
        )
        .ok();
        for diff in &result.differences {
            writeln!(
                buf,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&diff.property),
                escape(&diff.design_value.to_string()),
                escape(&diff.actual_value.to_string()),
                escape(&diff.delta.to_string())
            )
            .ok();
        }
        writeln!(buf, "</table>").ok();
    }

    match &result.screenshot {
        Some(shot) => {
            let shot = escape(shot);
            writeln!(buf, "<p>Screenshot: <a href=\"{0}\">{0}</a></p>", shot).ok();
        }
        None => {
            writeln!(buf, "<p class=\"muted\">Screenshot: none</p>").ok();
        }
    }
    writeln!(buf, "</article>").ok();
}

fn format_geometry(geometry: &Geometry) -> String {
    escape(&geometry.to_string())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregate;
    use crate::report::build_report;
    use crate::types::{DesignNode, Difference, RenderedElement, Summary};
    use crate::Viewport;
    use chrono::{TimeZone, Utc};

    fn report_with(results: Vec<ComparisonResult>) -> StructuredReport {
        let summary = aggregate(&results);
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        build_report(&results, &summary, at)
    }

    fn result(differences: Vec<Difference>) -> ComparisonResult {
        ComparisonResult {
            design_node: DesignNode::new("1:2", "Submit Button", "FRAME")
                .with_geometry(Geometry::sized(120.0, 40.0)),
            element: RenderedElement::new(
                "form > button",
                "button.submit-btn",
                Geometry::sized(123.0, 40.0),
            ),
            viewport: Viewport::new("Desktop", 1440, 900),
            differences,
            screenshot: Some("desktop.png".to_string()),
        }
    }

    #[test]
    fn markup_is_deterministic_and_uses_report_timestamp() {
        let report = report_with(vec![result(vec![Difference::numeric("width", 120.0, 123.0)])]);
        let first = render_markup(&report);
        let second = render_markup(&report);
        assert_eq!(first, second);
        assert!(first.contains("2024-01-02T03:04:05Z"));
        assert!(first.contains("Desktop (1440x900)"));
        assert!(first.contains("<td>width</td><td>120</td><td>123</td><td>3</td>"));
        assert!(first.contains("desktop.png"));
        assert!(first.contains("(device px)</p>"));
    }

    #[test]
    fn empty_difference_list_renders_marker() {
        let report = report_with(vec![result(vec![])]);
        assert!(render_markup(&report).contains("No differences"));
    }

    #[test]
    fn empty_report_renders_without_results() {
        let report = build_report(
            &[],
            &Summary::default(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        let html = render_markup(&report);
        assert!(html.contains("Comparisons: 0"));
        assert!(html.contains("Viewports: none"));
        assert!(html.contains("No comparisons were recorded."));
        assert!(!html.contains("<article"));
    }

    #[test]
    fn text_is_escaped() {
        let mut r = result(vec![]);
        r.design_node.name = "<script>alert('x')</script>".to_string();
        r.element.selector = "a[href=\"#\"] & b".to_string();
        let html = render_markup(&report_with(vec![r]));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("a[href=&quot;#&quot;] &amp; b"));
    }
}
