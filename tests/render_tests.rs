//! Integration tests for page rendering.
//!
//! These tests exercise `render` through the public API the way a caller
//! embedding the library would.

use cloudflare_error_page::params::{fill_params, from_value, get_group, get_str};
use cloudflare_error_page::status::{ERROR_COLOR, ERROR_SOURCE_CLASS, OK_COLOR};
use cloudflare_error_page::{prepare_status, render, Component, ParameterBag, RenderOptions};
use serde_json::json;

/// Helper to render with escaping enabled and local assets.
fn strict_options() -> RenderOptions {
    RenderOptions {
        allow_html: false,
        use_cdn: false,
    }
}

/// Extracts the ray id from the page footer.
fn ray_id_of(html: &str) -> String {
    let marker = "Ray ID: <strong class=\"font-semibold\">";
    let start = html.find(marker).expect("ray id marker missing") + marker.len();
    let end = start + html[start..].find('<').expect("unterminated ray id");
    html[start..end].to_string()
}

#[test]
fn test_empty_bag_renders_defaults() {
    let html = render(&ParameterBag::new(), None).unwrap();

    assert!(html.contains("Internal server error"));
    assert!(html.contains("Error code 500"));
    assert!(html.contains("<title>500: Internal server error</title>"));
    for component in Component::ALL {
        assert!(
            html.contains(&format!("id=\"cf-{}-status\"", component.id())),
            "missing section for {}",
            component
        );
    }
    assert!(html.contains("Browser"));
    assert!(html.contains("San Francisco"));
    assert!(html.contains("Website"));
}

#[test]
fn test_ray_id_format_and_uniqueness() {
    let first = ray_id_of(&render(&ParameterBag::new(), None).unwrap());
    let second = ray_id_of(&render(&ParameterBag::new(), None).unwrap());

    for id in [&first, &second] {
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()), "not hex: {}", id);
    }
    assert_ne!(first, second);
}

#[test]
fn test_supplied_ray_id_and_time_are_kept() {
    let params = from_value(json!({
        "ray_id": "feedfacecafebeef",
        "time": "2025-01-01 00:00:00 UTC",
    }));
    let html = render(&params, None).unwrap();

    assert_eq!(ray_id_of(&html), "feedfacecafebeef");
    assert!(html.contains("2025-01-01 00:00:00 UTC"));
}

#[test]
fn test_status_text_defaults_and_overrides() {
    let params = from_value(json!({
        "browser_status": { "status": "ok" },
        "cloudflare_status": { "status": "error" },
        "host_status": { "status": "error", "status_text": "On Fire" },
    }));

    let browser = prepare_status(&params, Component::Browser, "");
    assert_eq!(browser.status_text, "Working");
    assert_eq!(browser.status_text_color, OK_COLOR);

    let cloudflare = prepare_status(&params, Component::Cloudflare, "");
    assert_eq!(cloudflare.status_text, "Error");
    assert_eq!(cloudflare.status_text_color, ERROR_COLOR);

    let host = prepare_status(&params, Component::Host, "");
    assert_eq!(host.status_text, "On Fire");

    let html = render(&params, None).unwrap();
    assert!(html.contains("Working"));
    assert!(html.contains("On Fire"));
}

#[test]
fn test_normalizing_is_idempotent() {
    let params = from_value(json!({
        "error_code": "502",
        "title": 42,
        "more_information": { "for": "details", "hidden": "yes" },
        "host_status": { "status": "error" },
    }));

    let once = fill_params(&params);
    let twice = fill_params(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_render_does_not_mutate_input() {
    let params = from_value(json!({
        "title": "Partial",
        "more_information": { "for": "something" },
        "perf_sec_by": {},
        "browser_status": { "status": "ok" },
    }));
    let before = params.clone();

    render(&params, None).unwrap();
    render(&params, Some(&strict_options())).unwrap();

    assert_eq!(params, before);
    let info = get_group(&params, "more_information").unwrap();
    assert_eq!(info.len(), 1);
    assert!(get_group(&params, "perf_sec_by").unwrap().is_empty());
    assert!(params.get("ray_id").is_none());
}

#[test]
fn test_escaping_when_html_not_allowed() {
    let params = from_value(json!({
        "what_happened": "<script>alert(1)</script>",
    }));

    let html = render(&params, Some(&strict_options())).unwrap();
    assert!(html.contains("&lt;script&gt;alert(1)"));
    assert!(!html.contains("<script>alert"));

    // The library's own default for the other body field stays markup
    assert!(html.contains("<p>Please try again in a few minutes.</p>"));
}

#[test]
fn test_html_passes_through_when_allowed() {
    let params = from_value(json!({
        "what_happened": "<p>Down for <b>maintenance</b>.</p>",
    }));

    let html = render(&params, None).unwrap();
    assert!(html.contains("<p>Down for <b>maintenance</b>.</p>"));
}

#[test]
fn test_title_is_always_escaped() {
    let params = from_value(json!({ "title": "<img src=x>" }));

    let html = render(&params, None).unwrap();
    assert!(html.contains("&lt;img src=x&gt;"));
    assert!(!html.contains("<img src=x>"));
}

#[test]
fn test_asset_base_toggle() {
    let local = render(&ParameterBag::new(), Some(&strict_options())).unwrap();
    assert!(local.contains("href=\"/cdn-cgi/styles/main.css\""));

    let cdn = render(&ParameterBag::new(), None).unwrap();
    assert!(cdn.contains("href=\"https://cloudflare.com/cdn-cgi/styles/main.css\""));
}

#[test]
fn test_only_error_source_is_flagged() {
    let params = from_value(json!({ "error_source": "cloudflare" }));
    let html = render(&params, None).unwrap();

    assert_eq!(html.matches(ERROR_SOURCE_CLASS).count(), 1);
    assert!(html.contains(&format!(
        "id=\"cf-cloudflare-status\" class=\"{} ",
        ERROR_SOURCE_CLASS
    )));

    let html = render(&ParameterBag::new(), None).unwrap();
    assert_eq!(html.matches(ERROR_SOURCE_CLASS).count(), 0);
}

#[test]
fn test_unsafe_link_is_neutralized() {
    let params = from_value(json!({
        "more_information": { "link": "javascript:alert(1)" },
    }));
    let html = render(&params, None).unwrap();

    assert!(!html.contains("javascript:"));
    assert!(html.contains("href=\"#\""));
}

#[test]
fn test_creator_info_hidden_by_default() {
    let html = render(&ParameterBag::new(), None).unwrap();
    assert!(!html.contains("Generated by"));

    let params = from_value(json!({ "creator_info": { "hidden": false } }));
    let html = render(&params, None).unwrap();
    assert!(html.contains("Generated by"));
    assert!(html.contains("cloudflare-error-page"));
}

#[test]
fn test_custom_title_and_code() {
    let params = from_value(json!({
        "title": "Custom Error",
        "error_code": 404,
    }));
    let html = render(&params, None).unwrap();

    assert!(html.contains("Custom Error"));
    assert!(html.contains("404"));
    assert!(html.contains("There is an internal server error on Cloudflare"));
    assert!(html.contains("<p>Please try again in a few minutes.</p>"));

    let filled = fill_params(&params);
    assert_eq!(get_str(&filled, "html_title"), Some("404: Custom Error"));
}

#[test]
fn test_script_color_is_dropped() {
    let params = from_value(json!({
        "host_status": { "status": "error", "status_text_color": "expression(alert(1))" },
        "browser_status": { "status": "ok", "status_text_color": "rgb(0, 128, 0)" },
    }));
    let html = render(&params, None).unwrap();

    assert!(!html.contains("expression"));
    assert!(html.contains("style=\"color: rgb(0, 128, 0)\""));
    assert!(html.contains("style=\"color: \""));
}
