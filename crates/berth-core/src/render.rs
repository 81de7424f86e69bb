//! Column-aligned report rendering.
//!
//! Turns aggregated deployment groups into the final terminal report: one
//! summary line, an optional expansion hint, then one section per
//! application with a shared URL column width so rows line up across
//! sections. When styling is on, padding widths compensate for the
//! non-printing escape codes so the visible columns stay aligned.

use std::time::Duration;

use chrono::{DateTime, Utc};
use console::Style;

use crate::types::{Deployment, DeploymentGroup};

/// Rows shown per application when full output was not requested.
pub const DISPLAY_CAP: usize = 5;

/// Fixed gap between the URL column and the next one.
pub const URL_COL_PADDING: usize = 5;

/// Scheme prepended to every displayed URL.
pub const DEFAULT_URL_PREFIX: &str = "https://";

// Escape-code overhead per styled cell. Underline is `\x1b[4m` + `\x1b[0m`,
// red is `\x1b[31m` + `\x1b[0m`; tests pin these against the console crate.
const URL_STYLE_WIDTH: usize = 8;
const STATE_STYLE_WIDTH: usize = 9;

const INST_COL: usize = 8;
const STATE_COL: usize = 18;
const NO_SCALE: &str = "✖";

/// How one report should be rendered.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    /// List every group member instead of capping at [`DISPLAY_CAP`].
    pub show_all: bool,
    /// Whether the output stream supports escape-code styling.
    pub styled: bool,
    /// Scheme prepended to deployment and instance URLs.
    pub url_prefix: &'a str,
    /// Account scope shown in the summary line.
    pub scope: &'a str,
    /// Wall-clock time the resolution and aggregation took.
    pub elapsed: Duration,
    /// Reference point for the age column.
    pub now: DateTime<Utc>,
}

struct ReportStyles {
    scope: Style,
    hint: Style,
    app: Style,
    header: Style,
    url: Style,
    alarm: Style,
}

impl ReportStyles {
    fn new(styled: bool) -> Self {
        Self {
            scope: Style::new().bold().force_styling(styled),
            hint: Style::new().dim().force_styling(styled),
            app: Style::new().bold().force_styling(styled),
            header: Style::new().dim().force_styling(styled),
            url: Style::new().underlined().force_styling(styled),
            alarm: Style::new().red().force_styling(styled),
        }
    }
}

/// Render the whole report.
pub fn render(groups: &[DeploymentGroup], opts: &RenderOptions<'_>) -> String {
    let styles = ReportStyles::new(opts.styled);
    let total: usize = groups.iter().map(|group| group.deployments.len()).sum();
    let noun = if total == 1 { "deployment" } else { "deployments" };

    let mut out = String::new();
    out.push_str(&format!(
        "{total} {noun} found under {} [{}]\n",
        styles.scope.apply_to(opts.scope),
        short_duration(opts.elapsed),
    ));

    if !opts.show_all && wants_expansion_hint(groups) {
        let hint = format!(
            "To list more than {DISPLAY_CAP} deployments per application \
             or their instances, run `berth ls <app> --all`."
        );
        out.push_str(&format!("{}\n", styles.hint.apply_to(hint)));
    }

    let url_w = opts.url_prefix.chars().count() + url_column_width(groups);
    let url_pad = url_w + if opts.styled { URL_STYLE_WIDTH } else { 0 };

    for group in groups {
        let members = group.deployments.len();
        let shown = if opts.show_all {
            members
        } else {
            members.min(DISPLAY_CAP)
        };

        out.push('\n');
        out.push_str(&format!(
            "{} ({shown} of {members} total)\n",
            styles.app.apply_to(&group.app),
        ));
        let header = format!(
            "  {:<uw$}{:<iw$}{:<sw$}{}",
            "url",
            "inst #",
            "state",
            "age",
            uw = url_w,
            iw = INST_COL,
            sw = STATE_COL,
        );
        out.push_str(&format!("{}\n", styles.header.apply_to(header)));

        for deployment in group.deployments.iter().take(shown) {
            push_row(&mut out, deployment, &styles, opts, url_pad);
        }
    }

    out
}

/// Shared width of the URL column: the longest deployment URL across every
/// group plus [`URL_COL_PADDING`], so sections stay aligned with each other.
pub fn url_column_width(groups: &[DeploymentGroup]) -> usize {
    groups
        .iter()
        .flat_map(|group| group.deployments.iter())
        .map(|deployment| deployment.url.chars().count())
        .max()
        .unwrap_or(0)
        + URL_COL_PADDING
}

/// Whether the report should advertise the expansion flag: some group
/// overflows the display cap, or some deployment runs more than one
/// instance.
pub fn wants_expansion_hint(groups: &[DeploymentGroup]) -> bool {
    groups.iter().any(|group| {
        group.deployments.len() > DISPLAY_CAP
            || group
                .deployments
                .iter()
                .any(|deployment| deployment.scale.as_ref().is_some_and(|scale| scale.current > 1))
    })
}

fn push_row(
    out: &mut String,
    deployment: &Deployment,
    styles: &ReportStyles,
    opts: &RenderOptions<'_>,
    url_pad: usize,
) {
    let url_cell = styles
        .url
        .apply_to(format!("{}{}", opts.url_prefix, deployment.url))
        .to_string();
    let scale_cell = match &deployment.scale {
        Some(scale) => scale.current.to_string(),
        None => NO_SCALE.to_string(),
    };
    let state = display_state(deployment.state.as_deref());
    let alarming = is_alarming(state);
    let state_pad = STATE_COL
        + if opts.styled && alarming {
            STATE_STYLE_WIDTH
        } else {
            0
        };
    let state_cell = if alarming {
        styles.alarm.apply_to(state).to_string()
    } else {
        state.to_string()
    };
    let age_cell = match deployment.created {
        Some(created) => short_duration(
            opts.now
                .signed_duration_since(created)
                .to_std()
                .unwrap_or_default(),
        ),
        None => "n/a".to_string(),
    };

    out.push_str(&format!(
        "  {:<uw$}{:<iw$}{:<sw$}{}\n",
        url_cell,
        scale_cell,
        state_cell,
        age_cell,
        uw = url_pad,
        iw = INST_COL,
        sw = state_pad,
    ));

    if let Some(instances) = &deployment.instances {
        if !instances.is_empty() {
            for instance in instances {
                let cell = styles
                    .url
                    .apply_to(format!("{}{}", opts.url_prefix, instance.url))
                    .to_string();
                out.push_str(&format!("   - {cell:<url_pad$}\n"));
            }
            out.push('\n');
        }
    }
}

/// Absent states render as a literal error marker.
fn display_state(state: Option<&str>) -> &str {
    state.unwrap_or("DEPLOYMENT_ERROR")
}

fn is_alarming(state: &str) -> bool {
    state.contains("ERROR") || state == "FROZEN"
}

/// Compact single-unit duration, rounding down: `312ms`, `42s`, `7m`,
/// `2h`, `13d`.
fn short_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms < 1_000 {
        return format!("{ms}ms");
    }
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3_600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3_600)
    } else {
        format!("{}d", secs / 86_400)
    }
}
