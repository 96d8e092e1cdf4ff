use std::path::Path;

use davtester_rfc::rfc::xml::Element;

use super::{features, read_root};
use crate::error::{RunnerError, RunnerResult};
use crate::server_info::ServerInfo;

/// ## Summary
/// Loads the server description from `path`.
///
/// ## Errors
/// Returns an error if the file cannot be read, is not XML, has a root
/// other than `serverinfo` or carries an invalid port or repeat count.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_server_info(path: &Path, ssl: bool) -> RunnerResult<ServerInfo> {
    let root = read_root(path, "serverinfo")?;
    parse_server_info(&root, ssl).map_err(|reason| RunnerError::invalid_config(path, reason))
}

/// ## Summary
/// Builds a [`ServerInfo`] from a parsed `serverinfo` element.
///
/// `$host:` and `$hostssl:` are derived first so that configured
/// substitutions can refer to them; each substitution value is expanded
/// with the keys defined before it. `$uid1:` to `$uid9:` are seeded.
///
/// ## Errors
/// Returns a description of the first invalid value.
pub fn parse_server_info(root: &Element, ssl: bool) -> Result<ServerInfo, String> {
    let mut info = ServerInfo {
        ssl,
        ..ServerInfo::default()
    };

    for child in root.child_elements() {
        match child.local_name() {
            "host" => info.host = child.text(),
            "nonsslport" => info.nonssl_port = port(child)?,
            "sslport" => info.ssl_port = port(child)?,
            "features" => {
                for feature in features(child) {
                    info.features.insert(feature);
                }
            }
            "calendardatafilter" => info.calendar_filters.push(child.text()),
            "xmldatafilter" => info.xml_filters.push(child.text()),
            _ => {}
        }
    }

    info.add_host_substitutions();

    if let Some(substitutions) = root.child("substitutions") {
        for child in substitutions.child_elements() {
            match child.local_name() {
                "substitution" => add_substitution(&mut info, child, None),
                "repeat" => {
                    let count: usize = child
                        .attr("count")
                        .unwrap_or("1")
                        .trim()
                        .parse()
                        .map_err(|_| format!("invalid repeat count {:?}", child.attr("count")))?;
                    for i in 1..=count {
                        for sub in child.children_named("substitution") {
                            add_substitution(&mut info, sub, Some(i));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    info.new_uids();

    tracing::debug!(
        host = %info.host,
        port = info.port(),
        features = info.features.len(),
        substitutions = info.substitutions.len(),
        "Server info loaded"
    );
    Ok(info)
}

fn port(element: &Element) -> Result<u16, String> {
    let text = element.text();
    text.parse()
        .map_err(|_| format!("invalid {} {text:?}", element.local_name()))
}

fn add_substitution(info: &mut ServerInfo, element: &Element, counter: Option<usize>) {
    let (Some(key), Some(value)) = (element.child_text("key"), element.child_text("value")) else {
        tracing::warn!("Substitution without key or value skipped");
        return;
    };
    let (key, value) = match counter {
        Some(i) => (format_counter(&key, i), format_counter(&value, i)),
        None => (key, value),
    };
    let value = info.substitute(&value);
    info.substitutions.insert(key, value);
}

/// Expands `%d` and zero-padded `%0Nd` placeholders with `counter`.
fn format_counter(template: &str, counter: usize) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let spec = &rest[pos + 1..];
        let digits = spec.chars().take_while(char::is_ascii_digit).count();
        if spec[digits..].starts_with('d') {
            let width: usize = spec[..digits].parse().unwrap_or(0);
            out.push_str(&format!("{counter:0width$}"));
            rest = &spec[digits + 1..];
        } else {
            out.push('%');
            rest = spec;
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use davtester_rfc::rfc::xml::parse_document;

    use super::*;

    const SERVERINFO: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<serverinfo>
  <host>cal.example.com</host>
  <nonsslport>8008</nonsslport>
  <sslport>8443</sslport>
  <features>
    <feature>caldav</feature>
    <feature>EMAIL parameter</feature>
  </features>
  <calendardatafilter>PRODID</calendardatafilter>
  <xmldatafilter>{DAV:}getetag</xmldatafilter>
  <substitutions>
    <substitution><key>$root:</key><value>/dav/</value></substitution>
    <substitution><key>$calendars:</key><value>$host:$root:calendars/</value></substitution>
    <repeat count="2">
      <substitution><key>$userid%d:</key><value>user%02d</value></substitution>
    </repeat>
  </substitutions>
</serverinfo>"#;

    #[test]
    fn parses_hosts_features_and_filters() {
        let info = parse_server_info(&parse_document(SERVERINFO).unwrap(), false).unwrap();

        assert_eq!(info.base_url(), "http://cal.example.com:8008");
        assert!(info.features.supports("EMAIL parameter"));
        assert_eq!(info.calendar_filters, ["PRODID"]);
        assert_eq!(info.xml_filters, ["{DAV:}getetag"]);
    }

    #[test]
    fn substitutions_expand_earlier_keys_and_repeats() {
        let info = parse_server_info(&parse_document(SERVERINFO).unwrap(), false).unwrap();

        assert_eq!(
            info.substitute("$calendars:"),
            "http://cal.example.com:8008/dav/calendars/"
        );
        assert_eq!(info.substitute("$userid1: $userid2:"), "user01 user02");
        assert_eq!(info.substitute("$uid1:").len(), 36);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let root = parse_document("<serverinfo><nonsslport>http</nonsslport></serverinfo>").unwrap();
        assert!(parse_server_info(&root, false).is_err());
    }

    #[test]
    fn wrong_root_is_an_invalid_config_file() {
        let path = std::env::temp_dir().join(format!("davtester-si-{}.xml", std::process::id()));
        std::fs::write(&path, "<caldavtest/>").unwrap();
        let err = load_server_info(&path, false).unwrap_err();
        assert!(err.to_string().starts_with("Invalid Config File"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn counter_formats() {
        assert_eq!(format_counter("user%02d", 3), "user03");
        assert_eq!(format_counter("$u%d:", 12), "$u12:");
        assert_eq!(format_counter("100%", 1), "100%");
    }
}
