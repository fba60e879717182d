//! Plain terminal rendering of engine output.

use std::sync::LazyLock;

use cb_core::Letter;
use cb_engine::{
    ActionView, CaseSummaryView, ContentBlock, Notification, RenderMode, RenderResult, Severity,
};
use colored::Colorize;
use regex::Regex;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));

/// Print a render result. Returns the dispatch ids in the order they were numbered.
pub fn print_result(result: &RenderResult) -> Vec<String> {
    if result.mode == RenderMode::Replace {
        println!();
    }
    print_blocks(&result.blocks);
    print_notifications(&result.notifications);
    print_actions(&result.actions)
}

/// Print content blocks.
pub fn print_blocks(blocks: &[ContentBlock]) {
    for block in blocks {
        match block {
            ContentBlock::Heading { text } => {
                println!("  {}", text.bold().underline());
                println!();
            }
            ContentBlock::Paragraph { text } => {
                for line in strip_tags(text).lines() {
                    println!("  {line}");
                }
                println!();
            }
            ContentBlock::Prompt { text, .. } => {
                for line in strip_tags(text).lines() {
                    println!("  {}", line.italic().cyan());
                }
                println!();
            }
            ContentBlock::Affordance { label, target } => {
                println!("  [{}] {}", label.magenta(), target.dimmed());
                println!();
            }
            ContentBlock::Separator => {
                println!("  {}", "~ ~ ~".dimmed());
                println!();
            }
        }
    }
}

/// Print notifications, one per line.
pub fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        println!("  {}", notice(notification));
    }
    if !notifications.is_empty() {
        println!();
    }
}

fn notice(notification: &Notification) -> String {
    let message = notification.message.as_str();
    match notification.severity {
        Severity::Info => format!("{} {message}", "*".blue()),
        Severity::Success => format!("{} {}", "+".green(), message.green()),
        Severity::Warning => format!("{} {}", "!".yellow(), message.yellow()),
        Severity::Error => format!("{} {}", "x".red(), message.red()),
    }
}

/// Print numbered actions. Returns the numbered dispatch ids.
pub fn print_actions(actions: &[ActionView]) -> Vec<String> {
    let mut numbered = Vec::new();
    for view in actions {
        if view.is_group() {
            if !view.prompt_hidden {
                println!("  {}", view.label.bold());
            }
            for choice in &view.choices {
                numbered.push(choice.id.clone());
                print_option(numbered.len(), &choice.label, choice.disabled_reason.as_deref());
            }
        } else {
            numbered.push(view.id.clone());
            print_option(numbered.len(), &view.label, view.disabled_reason.as_deref());
        }
    }
    if !numbered.is_empty() {
        println!();
    }
    numbered
}

fn print_option(number: usize, label: &str, disabled: Option<&str>) {
    match disabled {
        Some(reason) => println!(
            "  {} {} {}",
            format!("{number})").dimmed(),
            label.dimmed(),
            format!("({reason})").dimmed()
        ),
        None => println!("  {} {label}", format!("{number})").bold()),
    }
}

/// Print the end-of-case summary.
pub fn print_summary(summary: &CaseSummaryView) {
    println!();
    if let Some(title) = &summary.title {
        println!("  {}", title.bold().underline());
        println!();
    }
    println!("  {}", "Solution".bold());
    println!();
    print_blocks(&summary.outro);
    println!("  {}", "Holmes' solution".bold());
    println!("  {}", summary.description);
    for lead in &summary.canonical_leads {
        println!("    - {lead}");
    }
    println!();
    let verdict = if summary.matched_benchmark() {
        "You matched Holmes.".green()
    } else {
        format!(
            "Holmes needed {} fewer lead{}.",
            summary.leads_followed - summary.benchmark,
            if summary.leads_followed - summary.benchmark == 1 { "" } else { "s" }
        )
        .yellow()
    };
    println!(
        "  Leads followed: {} (Holmes: {})  {verdict}",
        summary.leads_followed, summary.benchmark
    );
}

/// Format circled letters against the case alphabet.
pub fn letter_line(alphabet: &[Letter], owned: &[Letter]) -> String {
    let shown: Vec<String> = if alphabet.is_empty() {
        owned.iter().map(|l| l.to_string().bold().to_string()).collect()
    } else {
        alphabet
            .iter()
            .map(|l| {
                if owned.contains(l) {
                    format!("({l})").green().bold().to_string()
                } else {
                    format!(" {l} ").dimmed().to_string()
                }
            })
            .collect()
    };
    shown.join(" ")
}

/// Remove inline HTML tags from narrative text.
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stripped() {
        assert_eq!(strip_tags("A <em>very</em> odd <b>man</b>."), "A very odd man.");
    }

    #[test]
    fn unclosed_angle_is_kept() {
        assert_eq!(strip_tags("3 < 4 <i>always</i>"), "3 < 4 always");
    }

    #[test]
    fn letter_line_marks_owned() {
        colored::control::set_override(false);
        let alphabet: Vec<Letter> = "BCF".chars().filter_map(Letter::new).collect();
        let owned = vec![Letter::new('C').unwrap()];
        assert_eq!(letter_line(&alphabet, &owned), " B  (C)  F ");
    }
}
