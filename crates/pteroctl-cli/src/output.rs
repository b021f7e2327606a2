//! Terminal output for user records.

use anyhow::Result;
use pteroctl_core::{User, UserId};

/// Maximum width for the email column before truncation
const EMAIL_COLUMN_WIDTH: usize = 32;

pub fn print_users(users: &[User], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(users)?);
        return Ok(());
    }
    println!(
        "{:>6}  {:<20}  {:<width$}  {:<24}  {}",
        "ID",
        "USERNAME",
        "EMAIL",
        "NAME",
        "ADMIN",
        width = EMAIL_COLUMN_WIDTH
    );
    for user in users {
        println!("{}", table_row(user));
    }
    Ok(())
}

pub fn print_user(user: &User, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
        return Ok(());
    }
    let a = &user.attributes;
    println!("ID:          {}", a.id);
    println!("UUID:        {}", a.uuid);
    println!("External ID: {}", a.external_id.as_deref().unwrap_or("-"));
    println!("Username:    {}", a.username);
    println!("Email:       {}", a.email);
    println!("Name:        {}", user.full_name());
    println!("Language:    {}", a.language);
    println!("Root admin:  {}", yes_no(a.is_root_admin));
    println!("2FA:         {}", yes_no(a.two_factor_enabled));
    println!("Created:     {}", a.created_at.format("%b %d, %Y %H:%M UTC"));
    println!("Updated:     {}", a.updated_at.format("%b %d, %Y %H:%M UTC"));
    Ok(())
}

pub fn print_created(id: UserId, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "id": id }));
    } else {
        println!("Created user {}", id);
    }
    Ok(())
}

fn table_row(user: &User) -> String {
    let a = &user.attributes;
    format!(
        "{:>6}  {:<20}  {:<width$}  {:<24}  {}",
        a.id,
        truncate_string(&a.username, 20),
        truncate_string(&a.email, EMAIL_COLUMN_WIDTH),
        truncate_string(&user.full_name(), 24),
        yes_no(a.is_root_admin),
        width = EMAIL_COLUMN_WIDTH
    )
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
