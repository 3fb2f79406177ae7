use chrono::{DateTime, Local, Utc};
use crossterm::style::Stylize;

use crate::domain::pr::PullRequest;

const MAX_WIDTH: usize = 100;

pub fn info(msg: &str) {
    println!("{msg}");
}

pub fn success(msg: &str) {
    println!("{} {msg}", "✓".green());
}

pub fn error(msg: &str) {
    println!("{} {msg}", "✗".red());
}

pub fn dim(msg: &str) {
    println!("{}", msg.to_string().dim());
}

/// One-liner prefixed with the local wall-clock time, used by the watch loop.
pub fn timestamped(msg: &str) {
    let now = Local::now().format("%H:%M:%S");
    dim(&format!("[{now}] {msg}"));
}

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80)
        .min(MAX_WIDTH)
}

pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let mins = elapsed.num_minutes();
    if mins < 1 {
        return "just now".to_string();
    }
    if mins < 60 {
        return format!("{mins}m ago");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", elapsed.num_days())
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Render a titled box around one group of PRs, one line each:
/// `#number [D] title  owner/repo @author 3h ago`.
pub fn render_pr_box(title: &str, prs: &[PullRequest]) {
    let now = Utc::now();
    let width = terminal_width();
    let inner = width.saturating_sub(2);

    println!();
    print_top_border(&format!(" {title} ({}) ", prs.len()), inner);

    for pr in prs {
        let time_ago = format_time_ago(pr.updated_at, now);
        let draft = if pr.draft { "[D] " } else { "" };
        let number = format!("#{}", pr.number);

        // Visible length budget: 2 for padding, 2 spaces between title/meta.
        let meta_len = meta_width(&pr.repository, &pr.author.login, &time_ago);
        let fixed = number.len() + 1 + draft.len() + meta_len + 4;
        let max_title = inner.saturating_sub(fixed).max(20);
        let short_title = truncate(&pr.title, max_title);

        let visible = number.len() + 1 + draft.len() + short_title.chars().count() + 2 + meta_len;
        let padding = inner.saturating_sub(visible + 2);

        println!(
            "{border} {num} {draft}{title}  {repo} {author} {ago}{pad} {border}",
            border = "│".magenta(),
            num = number.clone().cyan(),
            draft = draft.dim(),
            title = short_title,
            repo = pr.repository.clone().cyan(),
            author = format!("@{}", pr.author.login).yellow(),
            ago = time_ago.dim(),
            pad = " ".repeat(padding),
        );
    }

    print_bottom_border(inner);
}

// Visible width of the `repo @author ago` tail, in chars: author logins and
// repository names are not guaranteed ASCII, so byte lengths would overpad.
fn meta_width(repository: &str, login: &str, time_ago: &str) -> usize {
    repository.chars().count() + login.chars().count() + time_ago.chars().count() + 4
}

fn print_top_border(title: &str, inner: usize) {
    let remaining = inner.saturating_sub(title.chars().count());
    let left = remaining / 2;
    let right = remaining - left;
    println!(
        "{}{}{}{}{}",
        "┌".magenta(),
        "─".repeat(left).magenta(),
        title.bold(),
        "─".repeat(right).magenta(),
        "┐".magenta(),
    );
}

fn print_bottom_border(inner: usize) {
    println!(
        "{}{}{}",
        "└".magenta(),
        "─".repeat(inner).magenta(),
        "┘".magenta(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn time_ago_buckets() {
        let now = at(100_000);
        assert_eq!(format_time_ago(now, now), "just now");
        assert_eq!(format_time_ago(now - chrono::Duration::minutes(5), now), "5m ago");
        assert_eq!(format_time_ago(now - chrono::Duration::hours(3), now), "3h ago");
        assert_eq!(format_time_ago(now - chrono::Duration::days(2), now), "2d ago");
    }

    #[test]
    fn truncate_keeps_short_text_and_marks_cut_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long title", 8), "a very …");
        assert_eq!(truncate("exact", 5), "exact");
    }

    #[test]
    fn meta_width_counts_chars_not_bytes() {
        let ascii = meta_width("acme/widgets", "reviewer", "3h ago");
        let accented = meta_width("acme/widgets", "révîewér", "3h ago");
        assert_eq!(ascii, accented);
        assert_eq!(ascii, 12 + 8 + 6 + 4);
    }
}
