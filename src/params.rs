//! Parameter bag handling and default filling.
//!
//! Callers describe a page with a loosely typed key/value bag. This module
//! provides typed accessors over that bag and [`fill_params`], which returns a
//! copy with every known key present. Values of the wrong type are treated as
//! absent and replaced by the default; nothing in here can fail.

use chrono::Utc;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;
use std::mem::discriminant;
use tracing::warn;

/// Loosely typed page parameters.
pub type ParameterBag = serde_json::Map<String, Value>;

/// Timestamp layout used for the `time` field.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Number of random bytes behind a ray identifier.
pub const RAY_ID_BYTES: usize = 8;

/// Ray identifier used when the OS random source is unavailable.
pub const FALLBACK_RAY_ID: &str = "0000000000000000";

pub const DEFAULT_ERROR_CODE: i64 = 500;
pub const DEFAULT_TITLE: &str = "Internal server error";
pub const DEFAULT_WHAT_HAPPENED: &str =
    "<p>There is an internal server error on Cloudflare's network.</p>";
pub const DEFAULT_WHAT_CAN_I_DO: &str = "<p>Please try again in a few minutes.</p>";
pub const DEFAULT_CLIENT_IP: &str = "1.1.1.1";

/// Field defaults for the `more_information` group.
pub static MORE_INFORMATION_DEFAULTS: Lazy<Vec<(&'static str, Value)>> = Lazy::new(|| {
    vec![
        ("hidden", Value::Bool(false)),
        ("link", Value::from("https://www.cloudflare.com/")),
        ("text", Value::from("cloudflare.com")),
        ("for", Value::from("more information")),
    ]
});

/// Field defaults for the `perf_sec_by` group.
pub static PERF_SEC_BY_DEFAULTS: Lazy<Vec<(&'static str, Value)>> = Lazy::new(|| {
    vec![
        ("link", Value::from("https://www.cloudflare.com/")),
        ("text", Value::from("Cloudflare")),
    ]
});

/// Field defaults for the `creator_info` group.
pub static CREATOR_INFO_DEFAULTS: Lazy<Vec<(&'static str, Value)>> = Lazy::new(|| {
    vec![
        ("hidden", Value::Bool(true)),
        (
            "link",
            Value::from("https://github.com/donlon/cloudflare-error-page"),
        ),
        ("text", Value::from("cloudflare-error-page")),
    ]
});

/// Converts any JSON value into a bag. Non-object values yield an empty bag.
pub fn from_value(value: Value) -> ParameterBag {
    match value {
        Value::Object(map) => map,
        _ => ParameterBag::new(),
    }
}

/// Returns the string stored under `key`, if it is a string.
pub fn get_str<'a>(bag: &'a ParameterBag, key: &str) -> Option<&'a str> {
    bag.get(key).and_then(Value::as_str)
}

/// Returns the boolean stored under `key`, if it is a boolean.
pub fn get_bool(bag: &ParameterBag, key: &str) -> Option<bool> {
    bag.get(key).and_then(Value::as_bool)
}

/// Returns the nested group stored under `key`, if it is an object.
pub fn get_group<'a>(bag: &'a ParameterBag, key: &str) -> Option<&'a ParameterBag> {
    bag.get(key).and_then(Value::as_object)
}

/// Reads `error_code` as an integer.
///
/// Integral numbers are taken as is and strings are accepted when they parse
/// as an integer, so `"404"` and `404` are equivalent.
pub fn get_error_code(bag: &ParameterBag) -> Option<i64> {
    match bag.get("error_code")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Current UTC time in [`TIME_FORMAT`].
pub fn current_timestamp() -> String {
    Utc::now().format(TIME_FORMAT).to_string()
}

/// Generates a random 16 character lowercase hex identifier.
///
/// Falls back to [`FALLBACK_RAY_ID`] if the OS random source fails.
pub fn generate_ray_id() -> String {
    let mut bytes = [0u8; RAY_ID_BYTES];
    if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
        warn!("OS random source unavailable, using placeholder ray id: {}", e);
        return FALLBACK_RAY_ID.to_string();
    }

    hex::encode(bytes)
}

/// Returns a copy of `params` with every known key filled in.
///
/// Nested groups are merged field by field, so a caller supplying only
/// `more_information.for` keeps the default link and text. Running this on an
/// already filled bag returns an identical bag.
pub fn fill_params(params: &ParameterBag) -> ParameterBag {
    let mut bag = params.clone();

    if get_str(&bag, "time").is_none() {
        bag.insert("time".into(), Value::String(current_timestamp()));
    }
    if get_str(&bag, "ray_id").is_none() {
        bag.insert("ray_id".into(), Value::String(generate_ray_id()));
    }

    let error_code = get_error_code(&bag).unwrap_or(DEFAULT_ERROR_CODE);
    bag.insert("error_code".into(), Value::from(error_code));

    let title = ensure_str(&mut bag, "title", DEFAULT_TITLE);
    if get_str(&bag, "html_title").is_none() {
        bag.insert(
            "html_title".into(),
            Value::String(format!("{}: {}", error_code, title)),
        );
    }

    ensure_str(&mut bag, "what_happened", DEFAULT_WHAT_HAPPENED);
    ensure_str(&mut bag, "what_can_i_do", DEFAULT_WHAT_CAN_I_DO);
    ensure_str(&mut bag, "client_ip", DEFAULT_CLIENT_IP);

    fill_group(&mut bag, "more_information", &MORE_INFORMATION_DEFAULTS);
    fill_group(&mut bag, "perf_sec_by", &PERF_SEC_BY_DEFAULTS);
    fill_group(&mut bag, "creator_info", &CREATOR_INFO_DEFAULTS);

    bag
}

/// Makes sure `key` holds a string and returns it.
fn ensure_str(bag: &mut ParameterBag, key: &str, default: &str) -> String {
    match get_str(bag, key) {
        Some(s) => s.to_string(),
        None => {
            bag.insert(key.to_string(), Value::from(default));
            default.to_string()
        }
    }
}

/// Replaces `bag[key]` with a copy of the group where every missing or
/// mistyped field takes its default. Unknown fields are kept.
fn fill_group(bag: &mut ParameterBag, key: &str, defaults: &[(&'static str, Value)]) {
    let mut group = get_group(bag, key).cloned().unwrap_or_default();

    for (field, default) in defaults {
        let supplied = group
            .get(*field)
            .is_some_and(|v| discriminant(v) == discriminant(default));
        if !supplied {
            group.insert((*field).to_string(), default.clone());
        }
    }

    bag.insert(key.to_string(), Value::Object(group));
}
