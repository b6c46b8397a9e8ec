use colored::*;

/// Turn colours on or off for everything printed afterwards.
pub fn set_color(enabled: bool) {
    if enabled {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

/// Green on black, for "everything is fine" lines.
pub fn ok(text: &str) -> String {
    text.green().on_black().to_string()
}

/// Red on black, for warnings the operator must not miss.
pub fn warn(text: &str) -> String {
    text.red().on_black().to_string()
}

pub fn header(text: &str) -> String {
    format!("==== {} ====", text)
}

pub fn print_header(text: &str) {
    println!("{}", header(text));
}
