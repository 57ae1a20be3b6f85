pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message); // Red color
}

pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message); // Green color
}

pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message); // Yellow color
}

pub fn display_summary(processed: usize, skipped: usize) {
    println!("\n\x1b[1mProcessed:\x1b[0m {}", processed);
    println!("\x1b[1mSkipped:\x1b[0m   {}\n", skipped);
}
