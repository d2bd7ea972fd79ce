//! Onboarding wizard steps: Registration → Organization → Integration.

use crate::error::{Error, Result};
use crate::results::ScanSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Registration,
    Organization,
    Integration,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [Self::Registration, Self::Organization, Self::Integration];

    pub fn index(&self) -> usize {
        match self {
            Self::Registration => 0,
            Self::Organization => 1,
            Self::Integration => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Registration => "Registration",
            Self::Organization => "Organization",
            Self::Integration => "Integration",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Registration => "Create your account",
            Self::Organization => "Set up your company",
            Self::Integration => "Test and deploy",
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            Self::Registration => Some(Self::Organization),
            Self::Organization => Some(Self::Integration),
            Self::Integration => None,
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// How a step is drawn relative to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Done,
    Current,
    Upcoming,
}

impl StepMarker {
    /// Done and current steps are drawn in the primary colour
    pub fn is_highlighted(&self) -> bool {
        !matches!(self, Self::Upcoming)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    current: WizardStep,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(step: WizardStep) -> Self {
        Self { current: step }
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn marker(&self, step: WizardStep) -> StepMarker {
        match step.index().cmp(&self.current.index()) {
            std::cmp::Ordering::Less => StepMarker::Done,
            std::cmp::Ordering::Equal => StepMarker::Current,
            std::cmp::Ordering::Greater => StepMarker::Upcoming,
        }
    }

    /// Whether the connector drawn after `step` is filled
    pub fn connector_filled(&self, step: WizardStep) -> bool {
        step.next().is_some() && step.index() < self.current.index()
    }

    /// Move to the next step. Organization is left only once a page finished scanning.
    pub fn advance(&mut self, scan: &ScanSnapshot) -> Result<WizardStep> {
        let next = self
            .current
            .next()
            .ok_or_else(|| Error::transition(self.current, "beyond the last step"))?;
        if self.current == WizardStep::Organization && !scan.can_continue() {
            return Err(Error::StepBlocked {
                step: self.current.to_string(),
                reason: "no page has finished scanning yet".to_string(),
            });
        }
        ::log::debug!("Wizard advancing from {} to {}", self.current, next);
        self.current = next;
        Ok(next)
    }
}
