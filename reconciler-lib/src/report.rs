use serde::Serialize;

/// Rendered when nothing but progress lines were recorded.
pub const NO_INCONSISTENCIES_MESSAGE: &str = "--- PROCESS COMPLETE --- \n\nNo inconsistencies found!";

/// Heading placed above the reported lines.
pub const INCONSISTENCIES_HEADER: &str =
    "--- PROCESS COMPLETE --- \n\nThe following inconsistencies were found:\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Detection success and other progress notes; never rendered.
    Progress,
    /// Informational note such as a match made by label instead of code.
    Advisory,
    /// Value or structural discrepancy between the two workbooks.
    Inconsistency,
    /// Soft failure; the sheet pair was skipped or read partially.
    Warning,
    /// A sheet pair could not be processed.
    Error,
    /// The run could not start at all.
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub kind: LineKind,
    pub text: String,
}

/// Append-only list of every line produced during a run, in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    lines: Vec<ReportLine>,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    pub fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(ReportLine {
            kind,
            text: text.into(),
        });
    }

    pub fn progress(&mut self, text: impl Into<String>) {
        self.push(LineKind::Progress, text);
    }

    pub fn advisory(&mut self, text: impl Into<String>) {
        self.push(LineKind::Advisory, text);
    }

    pub fn inconsistency(&mut self, text: impl Into<String>) {
        self.push(LineKind::Inconsistency, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(LineKind::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(LineKind::Error, text);
    }

    pub fn critical(&mut self, text: impl Into<String>) {
        self.push(LineKind::Critical, text);
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    /// Lines that make it into the rendered report.
    pub fn findings(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines
            .iter()
            .filter(|line| line.kind != LineKind::Progress)
    }

    pub fn count(&self, kind: LineKind) -> usize {
        self.lines.iter().filter(|line| line.kind == kind).count()
    }

    /// True when something other than progress was recorded.
    pub fn has_findings(&self) -> bool {
        self.findings().next().is_some()
    }

    /// Final report text: a fixed message when there are no findings,
    /// otherwise a header followed by one finding per line.
    pub fn render(&self) -> String {
        if !self.has_findings() {
            return NO_INCONSISTENCIES_MESSAGE.to_string();
        }

        let body = self
            .findings()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        format!("{INCONSISTENCIES_HEADER}{body}")
    }
}
