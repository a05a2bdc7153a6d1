//! List rules command implementation.

use openapi_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<7} {:<36} {:<16} {:<11} {:<8} Description",
        "Code", "Name", "Flavor", "Pass", "Severity"
    );
    println!("{}", "-".repeat(120));

    for rule in all_rules() {
        println!(
            "{:<7} {:<36} {:<16} {:<11} {:<8} {}",
            rule.id(),
            rule.name(),
            rule.flavor().to_string(),
            rule.pass_mode().as_str(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  all         - Every rule (default)");
    println!("  arm         - Rules for resource-manager documents");
    println!("  data-plane  - Rules for data-plane documents");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  openapi-lint validate --rules R2059,R3017");
    println!("  openapi-lint validate --rules UniqueResourcePaths,GuidUsage");
}
