use docbox_core::{
    display_name, known_names, render_infobox, HelperError, InfoboxKind, TemplateRenderer,
};
use serde_json::json;

#[test]
fn warning_scenario_matches_reference_output() {
    let html = render_infobox("warning", None, "- first\n- second").expect("valid category");
    insta::assert_snapshot!(html.trim_end(), @r#"
    <div class="docbox infobox"><h3>Warning</h3><ul><li>first</li>
    <li>second</li></ul></div>
    "#);
    assert!(html.ends_with("</div>\n\n"));
}

#[test]
fn every_category_renders_through_templates() {
    let renderer = TemplateRenderer::new();
    for kind in InfoboxKind::ALL {
        let html = renderer
            .render_str(
                "box.html",
                "{% filter infobox(kind) %}\n- a\n- b\n- c\n{% endfilter %}",
                json!({ "kind": kind.key() }),
            )
            .expect("render succeeds");
        assert!(html.contains(&format!("<h3>{}</h3>", kind.label())));
        assert_eq!(html.matches("<li>").count(), 3);
    }
}

#[test]
fn invalid_categories_always_fail() {
    for category in ["error", "", "WARNING", "note", "info "] {
        assert_eq!(
            render_infobox(category, Some("Header"), "- item"),
            Err(HelperError::UnknownCategory(category.to_string()))
        );
    }
}

#[test]
fn replace_scenarios() {
    assert_eq!(display_name("client-js"), "JavaScript Client");
    assert_eq!(display_name("unknown-key"), "unknown-key");
    assert_eq!(known_names().count(), 5);
}

#[test]
fn header_from_context_variable() {
    let html = TemplateRenderer::new()
        .render_str(
            "box.html",
            "{{ body|infobox(\"info\", header) }}",
            json!({ "body": "- only", "header": "Heads up" }),
        )
        .expect("render succeeds");
    assert_eq!(
        html,
        "<div class=\"docbox infobox\"><h3>Heads up</h3><ul><li>only</li></ul></div>\n\n"
    );
}
