//! OSC payloads that embed elements
//!
//! - `1337;File=name=<b64>;width=..;height=..;inline=1:<b64 data>` inline image
//! - `1338;url=..;alt=..;width=..;height=..` external image
//! - `1339;url=..;content=..` link
//!
//! Every other OSC (titles, OSC 8 hyperlinks, palette changes) is dropped.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::core::Element;

/// Parse a complete OSC payload (without introducer and terminator)
pub(crate) fn parse_element(payload: &str) -> Option<Element> {
    let (command, rest) = payload.split_once(';')?;

    match command {
        "1337" => parse_inline_image(rest),
        "1338" => parse_external_image(rest),
        "1339" => parse_link(rest),
        _ => {
            tracing::trace!("ignoring OSC {}", command);
            None
        }
    }
}

/// Split `k=v;k=v` into a map. Parts without `=` are skipped.
fn parse_args(args: &str) -> HashMap<&str, &str> {
    args.split(';')
        .filter_map(|part| part.split_once('='))
        .collect()
}

fn parse_inline_image(rest: &str) -> Option<Element> {
    let rest = rest.strip_prefix("File=")?;
    let Some((args, data)) = rest.split_once(':') else {
        tracing::debug!("ignoring inline image without data");
        return None;
    };
    let args = parse_args(args);

    // Without inline=1 the file would be a download, not an image
    if args.get("inline") != Some(&"1") {
        tracing::debug!("ignoring non-inline file transfer");
        return None;
    }

    let data = data.trim();
    if data.is_empty() {
        return None;
    }

    let name = args
        .get("name")
        .and_then(|n| STANDARD.decode(n).ok())
        .map(|n| String::from_utf8_lossy(&n).into_owned())
        .unwrap_or_default();

    let Some(mime) = mime_from_name(&name).or_else(|| sniff_mime(data)) else {
        tracing::debug!("ignoring inline file {:?} of unknown type", name);
        return None;
    };

    Some(Element::Image {
        url: format!("data:{};base64,{}", mime, data),
        alt: name,
        width: args.get("width").map(|w| w.to_string()),
        height: args.get("height").map(|h| h.to_string()),
    })
}

fn parse_external_image(rest: &str) -> Option<Element> {
    let args = parse_args(rest);
    let url = safe_url(args.get("url")?)?;

    Some(Element::Image {
        url,
        alt: args.get("alt").copied().unwrap_or_default().to_string(),
        width: args.get("width").map(|w| w.to_string()),
        height: args.get("height").map(|h| h.to_string()),
    })
}

fn parse_link(rest: &str) -> Option<Element> {
    let args = parse_args(rest);
    let url = safe_url(args.get("url")?)?;
    let content = match args.get("content") {
        Some(content) if !content.is_empty() => content.to_string(),
        _ => url.clone(),
    };

    Some(Element::Link { url, content })
}

/// Accept relative URLs and http(s) URLs only
fn safe_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let scheme = url
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.contains('/'));

    match scheme {
        None => Some(url.to_string()),
        Some(s) if s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https") => {
            Some(url.to_string())
        }
        Some(s) => {
            tracing::debug!("rejecting URL with scheme {:?}", s);
            None
        }
    }
}

fn mime_from_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "svg" => Some("image/svg+xml"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Recognise common image formats from the first bytes of the payload
fn sniff_mime(data: &str) -> Option<&'static str> {
    // 16 base64 characters decode to 12 bytes, enough for every signature
    let prefix = data.get(..16)?;
    let bytes = STANDARD.decode(prefix).ok()?;

    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP") {
        Some("image/webp")
    } else {
        None
    }
}
