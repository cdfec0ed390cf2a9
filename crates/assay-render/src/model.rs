#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Pass,
    Fail,
    /// The dispatcher faulted; results are partial.
    Incomplete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableResult {
    pub name: String,
    pub title: String,
    pub outcome: String,
    pub severity: String,
    pub successful: bool,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableStat {
    pub outcome: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableAssessment {
    pub id: String,
    pub uri: String,
    pub verdict: RenderableVerdict,
    pub severity: String,
    pub period: Option<(String, String)>,
    pub error_code: Option<i32>,
    /// Dispatch order.
    pub results: Vec<RenderableResult>,
    pub stats: Vec<RenderableStat>,
    /// `(accepted, total)` when known.
    pub dispatched: Option<(usize, usize)>,
}

impl RenderableVerdict {
    pub fn label(self) -> &'static str {
        match self {
            RenderableVerdict::Pass => "PASS",
            RenderableVerdict::Fail => "FAIL",
            RenderableVerdict::Incomplete => "INCOMPLETE",
        }
    }
}
