use colored::*;
use unicode_width::UnicodeWidthStr;

pub const TOTAL_WIDTH: usize = 64;

pub fn banner() {
    let text_content: String = format!("⟦ FRONTER v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═"
        .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
        .bright_black();

    println!("{}{}{}", sep, text, sep);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    println!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right).bright_black()
    );
}

pub fn fat_separator() {
    println!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub fn centerln(msg: &str) {
    let width = console::measure_text_width(msg);
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(width) / 2);
    println!("{}{}", space, msg);
}
