//! Upload command rendering.

use sd_coverage_core::SonarConfig;

/// Scanner download-and-run script. Placeholders: `$SD_SONAR_HOST`,
/// `$SD_UI_URL`, `$SD_SONAR_ENTERPRISE`.
pub const UPLOAD_TEMPLATE: &str = include_str!("../assets/upload-coverage.sh");

/// Render `template` as one shell invocation.
///
/// Placeholders are substituted, blank and comment lines dropped, and the
/// remaining lines joined with `&&` in order. The last line is suffixed with
/// `|| true` so a failing scanner never fails the build step.
pub fn render_upload_command(template: &str, config: &SonarConfig) -> String {
    let rendered = template
        .replace("$SD_SONAR_HOST", &config.sonar_host)
        .replace("$SD_UI_URL", &config.sd_ui_url)
        .replace("$SD_SONAR_ENTERPRISE", &config.sonar_enterprise.to_string());

    let lines: Vec<&str> = rendered
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    match lines.split_last() {
        Some((last, rest)) => {
            let mut commands: Vec<String> = rest.iter().map(|l| l.to_string()).collect();
            commands.push(format!("{last} || true"));
            commands.join(" && ")
        }
        None => String::new(),
    }
}
