//! Plain-text rendering for tasks, cases, contacts and insights

use chrono::{DateTime, Local, Utc};
use crossterm::style::Stylize;

use crate::models::{Case, Contact, Insight, Task};

pub fn print_heading(text: &str) {
    println!("{}", text.bold());
}

pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Truncate by characters, not bytes, marking the cut with an ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

pub fn task_row(task: &Task) -> String {
    let due = task
        .due_date
        .as_ref()
        .map(format_date)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<24}  {:<8}  {:<11}  {:<10}  {}",
        task.id,
        task.priority.as_str(),
        task.status.as_str(),
        due,
        truncate(&task.title, 40)
    )
}

pub fn print_task(task: &Task, insights: &[&Insight]) {
    print_heading(&task.title);
    println!("  id:        {}", task.id);
    println!("  priority:  {}", task.priority.as_str());
    println!("  status:    {}", task.status.as_str());
    if let Some(ref due) = task.due_date {
        println!("  due:       {}", format_date(due));
    }
    if let Some(ref description) = task.description {
        println!("  notes:     {}", description);
    }
    if !task.tags.is_empty() {
        println!("  tags:      {}", task.tags.join(", "));
    }
    if !task.case_ids.is_empty() {
        println!("  cases:     {}", task.case_ids.join(", "));
    }
    if let Some(confidence) = task.ai_confidence {
        println!("  ai:        {:.0}% confidence", confidence * 100.0);
    }
    println!("  updated:   {}", format_datetime(&task.updated_at));
    print_insight_block(insights);
}

pub fn case_row(case: &Case) -> String {
    format!(
        "{:<24}  {:<7}  {:<14}  {:<20}  {}",
        case.id,
        case.status.as_str(),
        truncate(&case.case_type, 14),
        truncate(&case.client_name, 20),
        truncate(&case.title, 40)
    )
}

pub fn print_case(case: &Case, tasks: &[&Task], insights: &[&Insight]) {
    print_heading(&case.title);
    println!("  id:        {}", case.id);
    println!("  client:    {}", case.client_name);
    println!("  type:      {}", case.case_type);
    println!("  status:    {}", case.status.as_str());
    if let Some(ref description) = case.description {
        println!("  notes:     {}", description);
    }
    if let Some(ref analysis) = case.ai_analysis {
        println!("  analysis:  {} complexity", analysis.complexity.as_str());
        if let Some(p) = analysis.success_probability {
            println!("             {:.0}% success probability", p * 100.0);
        }
        for risk in &analysis.risk_factors {
            println!("             risk: {}", risk);
        }
    }
    println!("  updated:   {}", format_datetime(&case.updated_at));

    if !tasks.is_empty() {
        println!();
        println!("  Tasks:");
        for task in tasks {
            println!("    [{}] {}", task.status.as_str(), task.title);
        }
    }
    print_insight_block(insights);
}

pub fn contact_row(contact: &Contact) -> String {
    format!(
        "{:<24}  {:<16}  {:<24}  {}",
        contact.id,
        contact.contact_type.as_str(),
        truncate(&contact.display_name(), 24),
        contact
            .email
            .as_deref()
            .or(contact.phone.as_deref())
            .unwrap_or("-")
    )
}

pub fn insight_row(insight: &Insight) -> String {
    let state = if insight.is_applied() {
        "applied"
    } else if insight.dismissed {
        "dismissed"
    } else {
        "open"
    };
    format!(
        "{:<24}  {:<19}  {:<7} {:<24}  {:>3.0}%  {:<9}  {}",
        insight.id,
        insight.payload.kind(),
        insight.entity_type.as_str(),
        insight.entity_id,
        insight.confidence * 100.0,
        state,
        truncate(&insight.payload.summary(), 50)
    )
}

fn print_insight_block(insights: &[&Insight]) {
    if insights.is_empty() {
        return;
    }
    println!();
    println!("  Insights:");
    for insight in insights {
        println!(
            "    {} ({}, {:.0}%): {}",
            insight.id,
            insight.payload.kind(),
            insight.confidence * 100.0,
            insight.payload.summary()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("much longer text", 5), "much…");
        assert_eq!(truncate("日本語のテキスト", 4), "日本語…");
    }

    #[test]
    fn test_task_row_contains_fields() {
        let task = Task::new("Review contract".to_string());
        let row = task_row(&task);
        assert!(row.contains(&task.id));
        assert!(row.contains("P3"));
        assert!(row.contains("inbox"));
        assert!(row.contains("Review contract"));
    }
}
