use crate::config::Config;
use crate::log_debug;
use crate::ui::{self, rgb};
use anyhow::Result;
use colored::Colorize;

/// Show the configuration, applying any requested changes first
pub fn handle_config_command(
    backend_url: Option<String>,
    timeout: Option<u64>,
    retries: Option<usize>,
    export_path: Option<String>,
) -> Result<()> {
    log_debug!(
        "Starting 'config' command with backend_url: {:?}, timeout: {:?}, retries: {:?}, export_path: {:?}",
        backend_url,
        timeout,
        retries,
        export_path
    );

    let mut config = Config::load()?;

    let changes_made =
        backend_url.is_some() || timeout.is_some() || retries.is_some() || export_path.is_some();

    if changes_made {
        config.update(backend_url, timeout, retries, export_path)?;
        config.save()?;
        ui::print_success("Configuration updated successfully.");
        ui::print_message("");
    }

    print_configuration(&config);

    Ok(())
}

fn print_configuration(config: &Config) {
    let purple = rgb::ELECTRIC_PURPLE;
    let cyan = rgb::NEON_CYAN;
    let dim_sep = rgb::DIM_SEPARATOR;

    println!();
    println!(
        "{}  {}  {}",
        "━━━".truecolor(purple.0, purple.1, purple.2),
        "LINGUREPO CONFIGURATION".truecolor(cyan.0, cyan.1, cyan.2).bold(),
        "━━━".truecolor(purple.0, purple.1, purple.2)
    );
    println!();

    print_section_header("BACKEND");
    print_config_row("URL", &config.backend_url, true);
    print_config_row(
        "Connect",
        &format!("{}s", config.http.connect_timeout_secs),
        false,
    );
    print_config_row(
        "Timeout",
        &format!("{}s", config.http.request_timeout_secs),
        false,
    );

    println!();
    print_section_header("RETRY");
    if config.retry.attempts == 0 {
        print_config_row("Attempts", "disabled", false);
    } else {
        print_config_row("Attempts", &config.retry.attempts.to_string(), true);
        print_config_row(
            "Base Delay",
            &format!("{}ms", config.retry.base_delay_ms),
            false,
        );
    }

    println!();
    print_section_header("OUTPUT");
    print_config_row("Export", &config.export_path, true);
    print_config_row(
        "Verbose Log",
        if config.verbose_logging {
            "enabled"
        } else {
            "disabled"
        },
        false,
    );

    println!();
    println!("{}", "─".repeat(40).truecolor(dim_sep.0, dim_sep.1, dim_sep.2));
    println!();
}

/// Print a section header
fn print_section_header(name: &str) {
    let purple = rgb::ELECTRIC_PURPLE;
    let dim_sep = rgb::DIM_SEPARATOR;
    println!(
        "{} {} {}",
        "─".truecolor(purple.0, purple.1, purple.2),
        name.truecolor(purple.0, purple.1, purple.2).bold(),
        "─".repeat(30 - name.len().min(28)).truecolor(dim_sep.0, dim_sep.1, dim_sep.2)
    );
}

/// Print a config row with label and value
fn print_config_row(label: &str, value: &str, highlight: bool) {
    let dim = rgb::DIM_WHITE;
    let cyan = rgb::NEON_CYAN;
    let label_styled = format!("{label:>12}").truecolor(dim.0, dim.1, dim.2);

    let value_styled = if highlight {
        value.truecolor(cyan.0, cyan.1, cyan.2).bold()
    } else {
        value.truecolor(cyan.0, cyan.1, cyan.2)
    };

    println!("{label_styled}  {value_styled}");
}
