//! Per-component status presentation.
//!
//! The page shows three components in a row: the visitor's browser, the
//! Cloudflare edge and the origin host. Each gets a [`StatusPresentation`]
//! derived from the `<component>_status` group of the parameter bag.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::params::{get_group, get_str, ParameterBag};

/// Status keyword for a healthy component.
pub const STATUS_OK: &str = "ok";
/// Status keyword for a failing component.
pub const STATUS_ERROR: &str = "error";

/// Text color used for `ok` components.
pub const OK_COLOR: &str = "#9bca3e";
/// Text color used for `error` components.
pub const ERROR_COLOR: &str = "#bd2426";

/// CSS class marking the component that caused the error.
pub const ERROR_SOURCE_CLASS: &str = "cf-error-source";

/// One of the three components shown on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Browser,
    Cloudflare,
    Host,
}

impl Component {
    /// All components in page order.
    pub const ALL: [Component; 3] = [Component::Browser, Component::Cloudflare, Component::Host];

    pub fn id(self) -> &'static str {
        match self {
            Component::Browser => "browser",
            Component::Cloudflare => "cloudflare",
            Component::Host => "host",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Component::Browser => "browser",
            Component::Cloudflare => "cloud",
            Component::Host => "server",
        }
    }

    pub fn default_location(self) -> &'static str {
        match self {
            Component::Browser => "You",
            Component::Cloudflare => "San Francisco",
            Component::Host => "Website",
        }
    }

    pub fn default_name(self) -> &'static str {
        match self {
            Component::Browser => "Browser",
            Component::Cloudflare => "Cloudflare",
            Component::Host => "Host",
        }
    }

    /// Key of the nested status group in the parameter bag.
    pub fn params_key(self) -> String {
        format!("{}_status", self.id())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown component '{0}', expected browser, cloudflare or host")]
pub struct UnknownComponent(pub String);

impl FromStr for Component {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| UnknownComponent(s.to_string()))
    }
}

/// Everything the template needs to draw one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPresentation {
    pub component: Component,
    pub icon: &'static str,
    pub default_location: &'static str,
    pub default_name: &'static str,
    pub location: String,
    pub name: String,
    /// Status keyword, conventionally "ok" or "error". Any string is kept.
    pub status: String,
    pub status_text: String,
    /// Empty when the status is neither "ok" nor "error" and no color was given.
    pub status_text_color: String,
    pub is_error_source: bool,
}

impl StatusPresentation {
    /// CSS class for the component container.
    pub fn error_class(&self) -> &'static str {
        if self.is_error_source {
            ERROR_SOURCE_CLASS
        } else {
            ""
        }
    }
}

/// Builds the presentation for `component` from the bag.
///
/// A missing or malformed status group behaves like an empty one. Empty
/// `status_text` and `status_text_color` strings count as not supplied.
pub fn prepare_status(
    params: &ParameterBag,
    component: Component,
    error_source: &str,
) -> StatusPresentation {
    let empty = ParameterBag::new();
    let item = get_group(params, &component.params_key()).unwrap_or(&empty);

    let status = get_str(item, "status").unwrap_or(STATUS_OK).to_string();
    let location = get_str(item, "location")
        .unwrap_or(component.default_location())
        .to_string();
    let name = get_str(item, "name")
        .unwrap_or(component.default_name())
        .to_string();

    let status_text = match get_str(item, "status_text").filter(|s| !s.is_empty()) {
        Some(text) => text.to_string(),
        None if status == STATUS_OK => "Working".to_string(),
        None => "Error".to_string(),
    };

    let status_text_color = match get_str(item, "status_text_color").filter(|s| !s.is_empty()) {
        Some(color) => color.to_string(),
        None => match status.as_str() {
            STATUS_OK => OK_COLOR.to_string(),
            STATUS_ERROR => ERROR_COLOR.to_string(),
            _ => String::new(),
        },
    };

    StatusPresentation {
        component,
        icon: component.icon(),
        default_location: component.default_location(),
        default_name: component.default_name(),
        location,
        name,
        status,
        status_text,
        status_text_color,
        is_error_source: component.id() == error_source,
    }
}

/// Presentations for all three components, in page order.
pub fn prepare_all(params: &ParameterBag, error_source: &str) -> [StatusPresentation; 3] {
    Component::ALL.map(|c| prepare_status(params, c, error_source))
}
