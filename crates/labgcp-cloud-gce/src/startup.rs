//! Startup-script rendering

const SCRIPT_TEMPLATE: &str = include_str!("../startup/script_template.sh");

/// Render the instance bootstrap script for a user. The template carries
/// `${USER}` and `${R_PASS}` placeholders; everything else passes through
/// untouched.
pub fn render_startup_script(user: &str, rstudio_passwd: &str) -> String {
    SCRIPT_TEMPLATE
        .replace("${USER}", user)
        .replace("${R_PASS}", rstudio_passwd)
}
