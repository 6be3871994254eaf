//! Page shown when neither the config nor the command line names one.

const DEMO_HTML: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>webhost</title>
<style>
  body { font: 14px system-ui, sans-serif; margin: 24px; color: #222; }
  button { margin: 4px 8px 4px 0; }
  pre { background: #f4f4f4; padding: 8px; min-height: 3em; }
</style>
</head>
<body>
<h1>webhost</h1>
<p>Each button calls a Rust binding and prints what came back.</p>
<button id="add">add(2, 3)</button>
<button id="echo">echo("hi", 42)</button>
<button id="title">set_title("renamed")</button>
<button id="fail">fail()</button>
<button id="quit">quit()</button>
<pre id="out"></pre>
<script>
  const out = document.getElementById("out");
  const show = (label) => (value) => { out.textContent = label + " -> " + JSON.stringify(value); };
  const wire = (id, call) => document.getElementById(id).addEventListener("click", () => {
    call().then(show("ok"), show("error"));
  });
  wire("add", () => window.add(2, 3));
  wire("echo", () => window.echo("hi", 42));
  wire("title", () => window.set_title("renamed"));
  wire("fail", () => window.fail());
  wire("quit", () => window.quit());
</script>
</body>
</html>
"#;

/// The demo page as a `data:` URL.
pub fn demo_page_url() -> String {
    format!("data:text/html,{}", urlencoding::encode(DEMO_HTML))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_url_is_fully_encoded() {
        let url = demo_page_url();
        assert!(url.starts_with("data:text/html,"));
        let payload = &url["data:text/html,".len()..];
        assert!(!payload.contains(' '));
        assert!(!payload.contains('<'));
        assert!(!payload.contains('#'));
        assert_eq!(urlencoding::decode(payload).unwrap(), DEMO_HTML);
    }

    #[test]
    fn demo_page_calls_every_binding() {
        for name in crate::bindings::NAMES {
            assert!(DEMO_HTML.contains(&format!("window.{name}(")), "{name}");
        }
    }
}
