#![forbid(unsafe_code)]

use lazy_static::lazy_static;
use tera::Tera;

use crate::utils::errors::Errors;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Template names used by the web route handlers.
pub const HOME_TEMPLATE             : &str = "home.html";
pub const FRIENDS_TEMPLATE          : &str = "friends.html";
pub const FRIEND_DETAIL_TEMPLATE    : &str = "friend_detail.html";
pub const FRIEND_NOT_FOUND_TEMPLATE : &str = "friend_not_found.html";

// Template bodies compiled into the binary, so the server needs no template
// directory at runtime.
const HOME_BODY: &str = "<h1>Hello, {{ name }}</h1>";

const FRIENDS_BODY: &str = "<ul>{% for friend in friends %}\
<li><a href=\"/friends/{{ friend.handle }}\">{{ friend.name }}</a></li>\
{% endfor %}</ul>";

const FRIEND_DETAIL_BODY: &str = "<h1>{{ name }}</h1>\n<h3>{{ handle }}</h3>\n<p>{{ skill }}</p>";

const FRIEND_NOT_FOUND_BODY: &str = "<h1>No friend found with handle: {{ handle }}</h1>";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Compile the templates once.  Tera html-escapes every substituted value,
// so handles and names render safely inside the page markup.
lazy_static! {
    pub static ref TEMPLATES: Tera = init_templates();
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_templates:
// ---------------------------------------------------------------------------
/** Compile the embedded templates.  The bodies are fixed at build time, so
 * a compilation failure is a programming error and the application aborts.
 */
fn init_templates() -> Tera {
    let mut tera = Tera::default();
    match tera.add_raw_templates(vec![
        (HOME_TEMPLATE, HOME_BODY),
        (FRIENDS_TEMPLATE, FRIENDS_BODY),
        (FRIEND_DETAIL_TEMPLATE, FRIEND_DETAIL_BODY),
        (FRIEND_NOT_FOUND_TEMPLATE, FRIEND_NOT_FOUND_BODY),
    ]) {
        Ok(_) => tera,
        Err(e) => {
            let s = format!("{}", Errors::TemplateInitialization(e.to_string()));
            panic!("{}", s);
        }
    }
}
