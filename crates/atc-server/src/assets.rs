use atc_types::Mode;

/// The dashboards ship inside the binary; there is nothing to deploy next
/// to it.
pub(crate) fn dashboard_html(mode: Mode) -> &'static str {
    match mode {
        Mode::Planning => include_str!("../assets/planning.html"),
        Mode::Active => include_str!("../assets/active.html"),
        Mode::Experiment => include_str!("../assets/experiment.html"),
    }
}
