//! Commented default config file.

pub(super) fn default_config_toml() -> &'static str {
    r##"# webhost configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

# Enable developer tools in the view.
# debug = false

[window]
# title = "webhost"
# x = 100                # omit to let the platform place the window
# y = 100
# width = 800            # 1-16384
# height = 600           # 1-16384
# size_hint = "none"     # none, min, max, fixed
# margin_top = 26        # 0-512, space kept above the web content
# background = "#ffffff" # #rrggbb, #rrggbbaa or rgba(r,g,b,a)
# visible = true
# hide_from_dock = false

[content]
# url = "https://example.com"
# init_scripts = ["console.log('page starting')"]
"##
}
