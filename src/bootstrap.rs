use std::sync::LazyLock;

use askama::Template;
use regex::Regex;

/// Host page used when no `STAFFDESK_INDEX_PATH` is configured.
pub const DEFAULT_HOST_DOCUMENT: &str = include_str!("../static/index.html");

static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(<body\b[^>]*>).*</body>").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    MissingMountPoint(String),
    Unclosed(String),
    Render(String),
}

impl std::fmt::Display for MountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MountError::MissingMountPoint(id) => write!(f, "Mount element #{id} not found!"),
            MountError::Unclosed(id) => write!(f, "Mount element #{id} is never closed"),
            MountError::Render(msg) => write!(f, "Failed to render app: {msg}"),
        }
    }
}

impl std::error::Error for MountError {}

impl From<askama::Error> for MountError {
    fn from(err: askama::Error) -> Self {
        MountError::Render(err.to_string())
    }
}

#[derive(Template)]
#[template(path = "bootstrap/fallback.html")]
struct FallbackTemplate<'a> {
    message: &'a str,
}

/// Where the component goes inside the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MountSlot {
    /// Byte range of the mount element's children.
    Children { inner_start: usize, inner_end: usize },
    /// `<div id="root"/>`: the tag spans `start..end` and is rewritten as an
    /// open/close pair around the component.
    SelfClosing { start: usize, end: usize, tag_end: usize },
}

fn locate(host: &str, mount_id: &str) -> Result<MountSlot, MountError> {
    let id = regex::escape(mount_id);
    let open_re = Regex::new(&format!(
        r#"<([a-zA-Z][a-zA-Z0-9-]*)\s(?:[^>]*?\s)?(?i:id)\s*=\s*(?:"{id}"|'{id}'|{id})(?:[\s/][^>]*)?>"#
    ))
    .map_err(|e| MountError::Render(e.to_string()))?;

    let open = open_re
        .captures(host)
        .ok_or_else(|| MountError::MissingMountPoint(mount_id.to_string()))?;
    let (Some(whole), Some(tag)) = (open.get(0), open.get(1)) else {
        return Err(MountError::MissingMountPoint(mount_id.to_string()));
    };

    if whole.as_str().ends_with("/>") {
        return Ok(MountSlot::SelfClosing {
            start: whole.start(),
            end: whole.end(),
            tag_end: tag.end(),
        });
    }

    let tag_re = Regex::new(&format!(
        r"(?i)<(/?){}(\s[^>]*?)?(/?)>",
        regex::escape(tag.as_str())
    ))
    .map_err(|e| MountError::Render(e.to_string()))?;

    let inner_start = whole.end();
    let mut depth = 1usize;
    for caps in tag_re.captures_iter(&host[inner_start..]) {
        let is_close = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        if self_closing && !is_close {
            continue;
        }
        if !is_close {
            depth += 1;
            continue;
        }
        depth -= 1;
        if depth == 0 {
            let offset = caps.get(0).map(|m| m.start()).unwrap_or_default();
            return Ok(MountSlot::Children {
                inner_start,
                inner_end: inner_start + offset,
            });
        }
    }

    Err(MountError::Unclosed(mount_id.to_string()))
}

/// Replace the children of the element with `id == mount_id` by the
/// rendered component. `render` only runs once the mount point is found.
pub fn mount<F>(host: &str, mount_id: &str, render: F) -> Result<String, MountError>
where
    F: FnOnce() -> Result<String, MountError>,
{
    let slot = locate(host, mount_id)?;
    let content = render()?;

    let mut page = String::with_capacity(host.len() + content.len() + 16);
    match slot {
        MountSlot::Children {
            inner_start,
            inner_end,
        } => {
            page.push_str(&host[..inner_start]);
            page.push_str(&content);
            page.push_str(&host[inner_end..]);
        }
        MountSlot::SelfClosing { start, end, tag_end } => {
            let open = host[start..end].trim_end_matches("/>").trim_end();
            page.push_str(&host[..start]);
            page.push_str(open);
            page.push('>');
            page.push_str(&content);
            page.push_str("</");
            page.push_str(&host[start + 1..tag_end]);
            page.push('>');
            page.push_str(&host[end..]);
        }
    }
    Ok(page)
}

/// Error panel shown in place of the app.
pub fn fallback_panel(message: &str) -> String {
    FallbackTemplate { message }.render().unwrap_or_else(|e| {
        tracing::error!("Failed to render fallback panel: {e}");
        let Ok(message) = askama::filters::escape(message, askama::filters::Html);
        format!(
            "<div style=\"padding: 20px; color: red;\">\n  <h1>Error Loading App</h1>\n  \
             <p>{message}</p>\n  <p>Check console for details</p>\n</div>"
        )
    })
}

/// Swap the whole `<body>` content for `panel`, keeping the body's attributes.
pub fn replace_body(host: &str, panel: &str) -> String {
    if BODY_RE.is_match(host) {
        BODY_RE
            .replace(host, |caps: &regex::Captures| format!("{}{panel}</body>", &caps[1]))
            .into_owned()
    } else {
        format!("<!DOCTYPE html>\n<html>\n<body>{panel}</body>\n</html>\n")
    }
}

/// Mount the app, or fall back to a page that only carries the error.
pub fn bootstrap<F>(host: &str, mount_id: &str, render: F) -> String
where
    F: FnOnce() -> Result<String, MountError>,
{
    tracing::debug!("Attempting to render app into #{mount_id}");
    match mount(host, mount_id, render) {
        Ok(page) => {
            tracing::debug!("App rendered successfully");
            page
        }
        Err(e) => {
            tracing::error!("Failed to render app: {e}");
            replace_body(host, &fallback_panel(&e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = r#"<!DOCTYPE html>
<html>
<head><title>Staff</title></head>
<body class="app">
  <nav><div class="brand">Laundry Co</div></nav>
  <div id="root"><div>loading</div></div>
  <script src="/static/app.js"></script>
</body>
</html>"#;

    #[test]
    fn mounts_into_root_replacing_children() {
        let page = mount(HOST, "root", || Ok("<section>form</section>".into())).unwrap();
        assert!(page.contains(r#"<div id="root"><section>form</section></div>"#));
        assert!(!page.contains("loading"));
        assert!(page.contains(r#"<div class="brand">Laundry Co</div>"#));
    }

    #[test]
    fn ignores_look_alike_attributes() {
        let host = r#"<body><p data-id="root">x</p><main id='root'></main></body>"#;
        let page = mount(host, "root", || Ok("app".into())).unwrap();
        assert_eq!(page, r#"<body><p data-id="root">x</p><main id='root'>app</main></body>"#);
    }

    #[test]
    fn missing_mount_point_fails_before_rendering() {
        let err = mount("<body><div id=\"app\"></div></body>", "root", || {
            panic!("render must not run")
        })
        .unwrap_err();
        assert_eq!(err, MountError::MissingMountPoint("root".into()));
    }

    #[test]
    fn unclosed_mount_point() {
        let err = mount("<body><div id=\"root\"><div></div></body>", "root", || Ok(String::new()))
            .unwrap_err();
        assert_eq!(err, MountError::Unclosed("root".into()));
    }

    #[test]
    fn fallback_replaces_body() {
        let host = "<html><body class=\"app\"><div id=\"other\"></div></body></html>";
        let page = bootstrap(host, "root", || Ok("<form></form>".into()));
        assert!(page.starts_with("<html><body class=\"app\">"));
        assert!(page.contains("<h1>Error Loading App</h1>"));
        assert!(page.contains("<p>Mount element #root not found!</p>"));
        assert!(page.contains("<p>Check console for details</p>"));
        assert!(!page.contains("<form>"));
        assert!(!page.contains("id=\"other\""));
    }

    #[test]
    fn fallback_escapes_message_and_handles_bodyless_hosts() {
        let page = replace_body("<div>no body</div>", &fallback_panel("<b>$1"));
        assert!(page.contains("<p>&#60;b&#62;$1</p>"));
        assert!(page.contains("<div style=\"padding: 20px; color: red;\">"));
        assert!(!page.contains("no body"));
    }

    #[test]
    fn mounts_into_unquoted_id() {
        let page = mount("<body><div class=app id=root>old</div></body>", "root", || {
            Ok("app".into())
        })
        .unwrap();
        assert_eq!(page, "<body><div class=app id=root>app</div></body>");
    }

    #[test]
    fn unquoted_id_must_match_whole_value() {
        let err = mount("<body><div id=rooted></div></body>", "root", || Ok(String::new()))
            .unwrap_err();
        assert_eq!(err, MountError::MissingMountPoint("root".into()));
    }

    #[test]
    fn self_closing_mount_point_is_expanded() {
        let page = mount(r#"<body><div id="root" /></body>"#, "root", || Ok("app".into())).unwrap();
        assert_eq!(page, r#"<body><div id="root">app</div></body>"#);
    }

    #[test]
    fn look_alike_tags_do_not_change_nesting() {
        let host = r#"<body><div id="root"><div-foo>x</div-foo><div class="a"/><div>y</div></div><p>after</p></body>"#;
        let page = mount(host, "root", || Ok("app".into())).unwrap();
        assert_eq!(page, r#"<body><div id="root">app</div><p>after</p></body>"#);
    }
}
