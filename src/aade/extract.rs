//! Namespace-prefix stripping and field extraction for registry responses.
//!
//! The registry answers with prefixed SOAP XML. Rather than registering
//! namespaces everywhere, the client strips the prefixes from the body once
//! and the extractors below match on bare element names.

use std::sync::LazyLock;

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;

use crate::soap::local_name;

static START_TAG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<\s*)\w+:").expect("valid regex"));
static END_TAG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(</\s*)\w+:").expect("valid regex"));

/// Drop namespace prefixes from start and end tags.
///
/// Two passes: open tags (`<ns:elem` → `<elem`), then close tags
/// (`</ns:elem>` → `</elem>`). Attribute names keep their prefixes; the
/// extractors never look at them.
#[must_use]
pub fn strip_namespace_prefixes(xml: &str) -> String {
    let opened = START_TAG_PREFIX.replace_all(xml, "$1");
    END_TAG_PREFIX.replace_all(&opened, "$1").into_owned()
}

/// Extract the first `field_name` value found directly under a `basic_rec`
/// element.
///
/// Returns `None` when the document is malformed or the field is absent —
/// a provider error page must not take the caller down, it just reads as
/// "no record". Prefixed element names are tolerated in case the body was
/// never cleaned.
#[must_use]
pub fn extract_field(xml: &str, field_name: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => path.push(local_name(e.name().as_ref())),
            Ok(Event::Text(ref e)) => {
                let under_basic_rec = path.len() >= 2
                    && path[path.len() - 1] == field_name
                    && path[path.len() - 2] == "basic_rec";
                if under_basic_rec {
                    return Some(e.unescape().unwrap_or_default().trim().to_string());
                }
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {}
        }
    }
}

/// Extract every registered business-activity description
/// (`firm_act_tab/item/firm_act_descr`), in document order.
///
/// Empty when the record lists none or the document cannot be read.
#[must_use]
pub fn extract_activities(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut activities = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => path.push(local_name(e.name().as_ref())),
            Ok(Event::Text(ref e)) => {
                let in_activity = path.len() >= 3
                    && path[path.len() - 1] == "firm_act_descr"
                    && path[path.len() - 2] == "item"
                    && path[path.len() - 3] == "firm_act_tab";
                if in_activity {
                    let text = e.unescape().unwrap_or_default().trim().to_string();
                    if !text.is_empty() {
                        activities.push(text);
                    }
                }
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }
    activities
}
