//! Error page rendering.
//!
//! [`render`] is the entry point: it fills in defaults, derives the three
//! component presentations and executes the page template. The template is
//! compiled into the crate by askama, so there is no runtime parse step and
//! the compiled form is shared read-only by every call.
//!
//! # Escaping
//!
//! Every value is HTML-escaped except the two body fields `what_happened` and
//! `what_can_i_do`. Those are emitted verbatim when [`RenderOptions::allow_html`]
//! is set, or when they still hold the built-in default snippet. Links go
//! through [`filters::safe_url`] and the status color through
//! [`filters::css_color`].

use askama::Template;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::params::{
    fill_params, get_bool, get_error_code, get_group, get_str, ParameterBag,
    DEFAULT_CLIENT_IP, DEFAULT_ERROR_CODE, DEFAULT_TITLE, DEFAULT_WHAT_CAN_I_DO,
    DEFAULT_WHAT_HAPPENED,
};
use crate::status::{prepare_all, StatusPresentation};

/// Base URL for assets when [`RenderOptions::use_cdn`] is set.
pub const CDN_BASE_URL: &str = "https://cloudflare.com";

/// Per-call rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Emit caller-supplied body HTML verbatim instead of escaping it.
    pub allow_html: bool,
    /// Reference assets on [`CDN_BASE_URL`] instead of root-relative paths.
    pub use_cdn: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            allow_html: true,
            use_cdn: true,
        }
    }
}

impl RenderOptions {
    /// Prefix prepended to `/cdn-cgi/...` asset paths.
    pub fn resources_base(&self) -> &'static str {
        if self.use_cdn {
            CDN_BASE_URL
        } else {
            ""
        }
    }
}

/// The only failure mode of rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template execution failed: {0}")]
    Template(#[from] askama::Error),
}

/// Body text plus whether it may be emitted unescaped.
struct BodyText<'a> {
    text: &'a str,
    raw: bool,
}

impl<'a> BodyText<'a> {
    fn new(text: &'a str, default: &str, allow_html: bool) -> Self {
        Self {
            text,
            raw: allow_html || text == default,
        }
    }
}

struct Link<'a> {
    hidden: bool,
    link: &'a str,
    text: &'a str,
    for_what: &'a str,
}

impl<'a> Link<'a> {
    fn from_group(bag: &'a ParameterBag, key: &str, hidden_default: bool) -> Self {
        match get_group(bag, key) {
            Some(group) => Self {
                hidden: get_bool(group, "hidden").unwrap_or(hidden_default),
                link: get_str(group, "link").unwrap_or_default(),
                text: get_str(group, "text").unwrap_or_default(),
                for_what: get_str(group, "for").unwrap_or_default(),
            },
            None => Self {
                hidden: hidden_default,
                link: "",
                text: "",
                for_what: "",
            },
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPageTemplate<'a> {
    html_title: &'a str,
    title: &'a str,
    error_code: i64,
    time: &'a str,
    ray_id: &'a str,
    client_ip: &'a str,
    what_happened: BodyText<'a>,
    what_can_i_do: BodyText<'a>,
    more_information: Link<'a>,
    perf_sec_by: Link<'a>,
    creator_info: Link<'a>,
    statuses: &'a [StatusPresentation; 3],
    resources_base: &'static str,
}

/// Executes the page template against an already normalized bag.
///
/// Fields missing from `params` render as their defaults, but callers are
/// expected to pass the output of [`fill_params`].
pub fn render_page(
    params: &ParameterBag,
    statuses: &[StatusPresentation; 3],
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let title = get_str(params, "title").unwrap_or(DEFAULT_TITLE);

    let page = ErrorPageTemplate {
        html_title: get_str(params, "html_title").unwrap_or(title),
        title,
        error_code: get_error_code(params).unwrap_or(DEFAULT_ERROR_CODE),
        time: get_str(params, "time").unwrap_or_default(),
        ray_id: get_str(params, "ray_id").unwrap_or_default(),
        client_ip: get_str(params, "client_ip").unwrap_or(DEFAULT_CLIENT_IP),
        what_happened: BodyText::new(
            get_str(params, "what_happened").unwrap_or(DEFAULT_WHAT_HAPPENED),
            DEFAULT_WHAT_HAPPENED,
            options.allow_html,
        ),
        what_can_i_do: BodyText::new(
            get_str(params, "what_can_i_do").unwrap_or(DEFAULT_WHAT_CAN_I_DO),
            DEFAULT_WHAT_CAN_I_DO,
            options.allow_html,
        ),
        more_information: Link::from_group(params, "more_information", false),
        perf_sec_by: Link::from_group(params, "perf_sec_by", false),
        creator_info: Link::from_group(params, "creator_info", true),
        statuses,
        resources_base: options.resources_base(),
    };

    Ok(page.render()?)
}

/// Renders a customized error page.
///
/// `params` is never modified. `None` options behave like
/// [`RenderOptions::default`].
pub fn render(params: &ParameterBag, options: Option<&RenderOptions>) -> Result<String, RenderError> {
    let options = options.copied().unwrap_or_default();
    let filled = fill_params(params);

    let error_source = get_str(&filled, "error_source").unwrap_or_default();
    let statuses = prepare_all(&filled, error_source);

    trace!(
        error_code = get_error_code(&filled).unwrap_or(DEFAULT_ERROR_CODE),
        error_source,
        allow_html = options.allow_html,
        use_cdn = options.use_cdn,
        "rendering error page"
    );

    render_page(&filled, &statuses, &options)
}

pub mod filters {
    //! Template filters for attribute and style contexts.

    use std::fmt::Display;

    /// Passes http(s), mailto and relative URLs, replaces anything else with `#`.
    pub fn safe_url<T: Display>(url: T) -> ::askama::Result<String> {
        let url = url.to_string();
        let trimmed = url.trim();
        let scheme = trimmed
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .filter(|s| !s.contains(|c: char| matches!(c, '/' | '?' | '#')));

        let allowed = match scheme {
            None => true,
            Some(s) => matches!(
                s.to_ascii_lowercase().as_str(),
                "http" | "https" | "mailto"
            ),
        };

        Ok(if allowed { url } else { "#".to_string() })
    }

    /// Keeps hex, named and `rgb()`/`hsl()` colors, drops everything else.
    pub fn css_color<T: Display>(color: T) -> ::askama::Result<String> {
        let color = color.to_string();
        Ok(if is_css_color(color.trim()) {
            color
        } else {
            String::new()
        })
    }

    fn is_css_color(color: &str) -> bool {
        if let Some(hex) = color.strip_prefix('#') {
            return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
        }

        if let Some((func, rest)) = color.split_once('(') {
            let func = func.trim().to_ascii_lowercase();
            let Some(args) = rest.strip_suffix(')') else {
                return false;
            };
            // digits, separators and the `deg` unit
            return matches!(func.as_str(), "rgb" | "rgba" | "hsl" | "hsla")
                && args.chars().all(|c| c.is_ascii_digit() || ".,%/ deg".contains(c));
        }

        !color.is_empty() && color.chars().all(|c| c.is_ascii_alphabetic())
    }
}
