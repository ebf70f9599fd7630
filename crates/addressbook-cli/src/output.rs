//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use serde::Serialize;

use addressbook_core::Contact;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single contact
    pub fn print_contact(&self, contact: &Contact) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("ID:           {}", contact.id);
                println!("First name:   {}", or_dash(contact.first_name.as_deref()));
                println!("Last name:    {}", or_dash(contact.last_name.as_deref()));
                println!("Phone number: {}", or_dash(contact.phone_number.as_deref()));
                println!("Email:        {}", or_dash(contact.email.as_deref()));
                println!(
                    "Birth date:   {}",
                    contact
                        .birth_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
                if !contact.image.is_empty() {
                    println!("Image:        {}", contact.image);
                }
            }
            OutputFormat::Json => print_json(contact)?,
            OutputFormat::Quiet => println!("{}", contact.id),
        }
        Ok(())
    }

    /// Print a list of contacts
    pub fn print_contacts(&self, contacts: &[Contact]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if contacts.is_empty() {
                    println!("No contacts found.");
                    return Ok(());
                }
                for contact in contacts {
                    println!(
                        "{:>5} | {:<30} | {:<18} | {}",
                        contact.id,
                        truncate(&contact.display_name(), 30),
                        truncate(contact.phone_number.as_deref().unwrap_or(""), 18),
                        truncate(contact.email.as_deref().unwrap_or(""), 40)
                    );
                }
                println!("\n{} contact(s)", contacts.len());
            }
            OutputFormat::Json => print_json(&contacts)?,
            OutputFormat::Quiet => {
                for contact in contacts {
                    println!("{}", contact.id);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Zoë Øyvindsdóttir", 8), "Zoë Ø...");
    }
}
