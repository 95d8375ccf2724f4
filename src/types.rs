use serde::Serialize;
use tabled::Tabled;

/// Text-valued attributes of a project record.
///
/// The source workbook gives no guarantee that any of these columns exist,
/// so reads go through [`ProjectRecord::text`], which yields `None` both for
/// an empty cell and for a column the sheet never had.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    ProjectId,
    ProjectName,
    VoluntaryRegistry,
    ArbProject,
    VoluntaryStatus,
    Scope,
    ProjectType,
    ReductionOrRemoval,
    MethodologyProtocol,
    Region,
    Country,
    State,
    IncomeLevel,
}

/// Credit-quantity attributes, all in tCO2eq.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    TotalCreditsIssued,
    TotalCreditsRetired,
    TotalCreditsRemaining,
    TotalBufferPoolDeposits,
}

/// One row of the registry workbook after normalization.
///
/// Every attribute is optional: a missing cell, an unparseable number, or a
/// column absent from the sheet all land as `None`. Missing is never zero:
/// sums treat it as the additive identity while counts and statistics skip
/// it entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectRecord {
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub voluntary_registry: Option<String>,
    pub arb_project: Option<String>,
    pub voluntary_status: Option<String>,
    pub scope: Option<String>,
    pub project_type: Option<String>,
    pub reduction_or_removal: Option<String>,
    pub methodology_protocol: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub income_level: Option<String>,
    pub total_credits_issued: Option<f64>,
    pub total_credits_retired: Option<f64>,
    pub total_credits_remaining: Option<f64>,
    pub total_buffer_pool_deposits: Option<f64>,
}

impl ProjectRecord {
    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::ProjectId => self.project_id.as_deref(),
            TextField::ProjectName => self.project_name.as_deref(),
            TextField::VoluntaryRegistry => self.voluntary_registry.as_deref(),
            TextField::ArbProject => self.arb_project.as_deref(),
            TextField::VoluntaryStatus => self.voluntary_status.as_deref(),
            TextField::Scope => self.scope.as_deref(),
            TextField::ProjectType => self.project_type.as_deref(),
            TextField::ReductionOrRemoval => self.reduction_or_removal.as_deref(),
            TextField::MethodologyProtocol => self.methodology_protocol.as_deref(),
            TextField::Region => self.region.as_deref(),
            TextField::Country => self.country.as_deref(),
            TextField::State => self.state.as_deref(),
            TextField::IncomeLevel => self.income_level.as_deref(),
        }
    }

    pub fn number(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::TotalCreditsIssued => self.total_credits_issued,
            NumericField::TotalCreditsRetired => self.total_credits_retired,
            NumericField::TotalCreditsRemaining => self.total_credits_remaining,
            NumericField::TotalBufferPoolDeposits => self.total_buffer_pool_deposits,
        }
    }

    pub fn set_text(&mut self, field: TextField, value: String) {
        let slot = match field {
            TextField::ProjectId => &mut self.project_id,
            TextField::ProjectName => &mut self.project_name,
            TextField::VoluntaryRegistry => &mut self.voluntary_registry,
            TextField::ArbProject => &mut self.arb_project,
            TextField::VoluntaryStatus => &mut self.voluntary_status,
            TextField::Scope => &mut self.scope,
            TextField::ProjectType => &mut self.project_type,
            TextField::ReductionOrRemoval => &mut self.reduction_or_removal,
            TextField::MethodologyProtocol => &mut self.methodology_protocol,
            TextField::Region => &mut self.region,
            TextField::Country => &mut self.country,
            TextField::State => &mut self.state,
            TextField::IncomeLevel => &mut self.income_level,
        };
        *slot = Some(value);
    }

    pub fn set_number(&mut self, field: NumericField, value: f64) {
        let slot = match field {
            NumericField::TotalCreditsIssued => &mut self.total_credits_issued,
            NumericField::TotalCreditsRetired => &mut self.total_credits_retired,
            NumericField::TotalCreditsRemaining => &mut self.total_credits_remaining,
            NumericField::TotalBufferPoolDeposits => &mut self.total_buffer_pool_deposits,
        };
        *slot = Some(value);
    }

    /// True when no cell on the row carried a value. The workbook tail often
    /// contains such rows and the loader drops them.
    pub fn is_empty(&self) -> bool {
        *self == ProjectRecord::default()
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ProjectExportRow {
    #[serde(rename = "Project ID")]
    #[tabled(rename = "Project ID")]
    pub project_id: String,
    #[serde(rename = "Project Name")]
    #[tabled(rename = "Project Name")]
    pub project_name: String,
    #[serde(rename = "Registry")]
    #[tabled(rename = "Registry")]
    pub registry: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub project_type: String,
    #[serde(rename = "Methodology")]
    #[tabled(rename = "Methodology")]
    pub methodology: String,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "CreditsIssued")]
    #[tabled(rename = "CreditsIssued")]
    pub credits_issued: String,
    #[serde(rename = "CreditsRetired")]
    #[tabled(rename = "CreditsRetired")]
    pub credits_retired: String,
    #[serde(rename = "CreditsRemaining")]
    #[tabled(rename = "CreditsRemaining")]
    pub credits_remaining: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct GroupCreditsRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Credits")]
    #[tabled(rename = "Credits")]
    pub credits: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct GroupCountRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Projects")]
    #[tabled(rename = "Projects")]
    pub projects: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StatusCreditsRow {
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "CreditsIssued")]
    #[tabled(rename = "CreditsIssued")]
    pub credits_issued: String,
    #[serde(rename = "CreditsRetired")]
    #[tabled(rename = "CreditsRetired")]
    pub credits_retired: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StatRow {
    #[serde(rename = "Statistic")]
    #[tabled(rename = "Statistic")]
    pub statistic: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_projects: usize,
    pub total_credits_issued: f64,
    pub total_credits_retired: f64,
    pub total_credits_remaining: f64,
    pub retirement_rate_pct: Option<f64>,
}
