//! Client page assets, embedded at compile time using `include_str!`.

/// The client page. `TODO_LIST_SLOT` marks where the initial list goes.
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Browser controller script.
pub const APP_JS: &str = include_str!("templates/app.js");

/// Page styles.
pub const STYLE_CSS: &str = include_str!("templates/style.css");

pub const TODO_LIST_SLOT: &str = "<!-- todo-list -->";

/// Fill the list slot of the index page with pre-rendered markup.
pub fn render_index(list_html: &str) -> String {
    INDEX_TEMPLATE.replacen(TODO_LIST_SLOT, list_html, 1)
}
