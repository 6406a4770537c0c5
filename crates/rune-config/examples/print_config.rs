/// Example program to print the loaded style configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from rune-style.toml plus environment overrides
    let config = rune_config::StyleConfig::load();

    println!("=== Rune Style Configuration ===\n");

    println!("  Mutate Target: {}", config.mutate_target);
    println!("  Speed: {}", config.speed);
    println!("  Scale Duration: {}ms", config.scale_duration_ms);
    if config.units.is_empty() {
        println!("  Units: (defaults)");
    } else {
        println!("  Units:");
        for (property, unit) in &config.units {
            println!("    {property}: {unit:?}");
        }
    }
    println!();

    if let Err(e) = config.validate() {
        eprintln!("Configuration is invalid: {}", e);
    }

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
