//! Terminal output helpers

/// Print a success line with optional follow-up hints
pub fn print_success(message: &str, next_steps: &[&str]) {
    println!("✓ {message}");
    if !next_steps.is_empty() {
        println!("\nNext steps:");
        for step in next_steps {
            println!("  {step}");
        }
    }
}

/// Print an error line with suggestions
pub fn print_error(message: &str, suggestions: &[&str]) {
    eprintln!("✗ {message}");
    if !suggestions.is_empty() {
        eprintln!();
        for suggestion in suggestions {
            eprintln!("  {suggestion}");
        }
    }
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
