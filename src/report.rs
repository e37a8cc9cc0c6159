use thiserror::Error;

/// One diagnostic record from the tool's XML report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: String,
    pub message: String,
    pub file: String,
    /// Issues attributed to compiled artifacts carry no line number.
    pub line: Option<String>,
    /// Up to two supplementary source-context lines, printed verbatim.
    pub context: Vec<String>,
}

impl Issue {
    /// Primary diagnostic line in the documented format.
    pub fn render(&self) -> String {
        match &self.line {
            Some(line) => format!(
                "{}:{} {}: {} [warning]",
                self.file, line, self.message, self.id
            ),
            None => format!("{} {}: {} [warning]", self.file, self.message, self.id),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed report XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("issue element is missing required attribute `{0}`")]
    MissingAttribute(&'static str),
    #[error("issue `{0}` has no location element")]
    MissingLocation(String),
}

/// Walk the report tree and collect every `issue` element. Each must carry
/// `id` and `message` and a child `location` with a `file` attribute;
/// `line`, `errorLine1` and `errorLine2` are optional.
pub fn parse_issues(xml: &str) -> Result<Vec<Issue>, ReportError> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut issues = Vec::new();

    for node in doc.descendants().filter(|n| n.has_tag_name("issue")) {
        let id = node
            .attribute("id")
            .ok_or(ReportError::MissingAttribute("id"))?
            .to_string();
        let message = node
            .attribute("message")
            .ok_or(ReportError::MissingAttribute("message"))?
            .to_string();

        let location = node
            .children()
            .find(|c| c.has_tag_name("location"))
            .ok_or_else(|| ReportError::MissingLocation(id.clone()))?;
        let file = location
            .attribute("file")
            .ok_or(ReportError::MissingAttribute("file"))?
            .to_string();
        let line = location.attribute("line").map(str::to_string);

        let mut context = Vec::new();
        for attr in ["errorLine1", "errorLine2"] {
            if let Some(text) = node.attribute(attr) {
                if !text.is_empty() {
                    context.push(text.to_string());
                }
            }
        }

        issues.push(Issue {
            id,
            message,
            file,
            line,
            context,
        });
    }

    Ok(issues)
}

/// Render every issue to the diagnostic stream unless silent; return the
/// count either way.
pub fn show_issues(issues: &[Issue], silent: bool) -> usize {
    if !silent {
        eprintln!();
        for issue in issues {
            eprintln!("{}", issue.render());
            for line in &issue.context {
                eprintln!("{line}");
            }
        }
    }
    issues.len()
}
