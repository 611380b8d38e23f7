//! Terminal presentation: toasts, the login hint and record formatting

use toolrec_client::{
    Navigator, PageResult, Review, Tool, ToastKind, ToastPhase, ToastRenderer, ToastSnapshot,
};

/// Prints each toast once, when it is raised
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalRenderer;

impl ToastRenderer for TerminalRenderer {
    fn render(&self, toast: &ToastSnapshot) {
        if toast.phase != ToastPhase::Created {
            return;
        }
        let label = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        };
        eprintln!("[{}] {}", label, toast.message);
    }
}

/// There is no login page in a terminal; tell the user how to sign in
#[derive(Debug, Default, Clone, Copy)]
pub struct LoginHint;

impl Navigator for LoginHint {
    fn navigate(&self, _target: &str) {
        eprintln!("Session ended. Sign in again with `toolrec login <account>`.");
    }
}

pub fn tool_line(tool: &Tool) -> String {
    let rating = tool
        .average_rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "#{:<4} {:<20} ★ {:<4} ▲ {:<6} {}",
        tool.id,
        tool.name,
        rating,
        tool.upvote_count.unwrap_or(0),
        tool.tagline.as_deref().unwrap_or("")
    )
}

pub fn print_tools(tools: &[Tool]) {
    for tool in tools {
        println!("{}", tool_line(tool));
    }
}

pub fn print_page(page: &PageResult<Tool>) {
    print_tools(&page.records);
    println!("page {} · {} per page · {} total", page.current, page.size, page.total);
}

pub fn print_tool(tool: &Tool) {
    println!("{}", tool_line(tool));
    if let Some(category) = &tool.category {
        println!("  category: {}", category);
    }
    if let Some(url) = &tool.website_url {
        println!("  website:  {}", url);
    }
    if !tool.tags.is_empty() {
        let tags: Vec<&str> = tool.tags.iter().map(|t| t.name.as_str()).collect();
        println!("  tags:     {}", tags.join(", "));
    }
    if let Some(description) = &tool.description {
        println!();
        println!("{}", description);
    }
}

pub fn print_reviews(page: &PageResult<Review>) {
    for review in &page.records {
        let stars = review.rating.map(|r| "★".repeat(r.clamp(0, 5) as usize)).unwrap_or_default();
        println!(
            "#{:<5} {:<5} {} ({} found helpful)",
            review.id,
            stars,
            review.content.as_deref().unwrap_or(""),
            review.helpful_count.unwrap_or(0)
        );
    }
    println!("page {} · {} total", page.current, page.total);
}
