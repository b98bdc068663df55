use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Render a line diff between two texts
///
/// Returns `None` when nothing differs.
pub fn line_diff(old: &str, new: &str) -> Option<String> {
    let diff = similar::TextDiff::from_lines(old, new);
    let mut out = String::new();

    for change in diff.iter_all_changes() {
        let line = change.to_string_lossy();
        let line = line.trim_end_matches('\n');
        match change.tag() {
            similar::ChangeTag::Delete => {
                out.push_str(&format!("    {}\n", format!("- {line}").red()));
            }
            similar::ChangeTag::Insert => {
                out.push_str(&format!("    {}\n", format!("+ {line}").green()));
            }
            similar::ChangeTag::Equal => {}
        }
    }

    if out.is_empty() { None } else { Some(out) }
}

/// Print a line diff, or a note when the texts match
pub fn show_diff(old: &str, new: &str) {
    match line_diff(old, new) {
        Some(diff) => print!("{diff}"),
        None => println!("    {}", "(no field changes)".dimmed()),
    }
}

// ============================================================================
// Tests
// ============================================================================
